//! skillgauge-core — Data model, attempt lifecycle, and scoring.
//!
//! This crate defines the fundamental data model, question sources, and
//! scoring logic that the entire skillgauge system builds on.

pub mod attempt;
pub mod error;
pub mod history;
pub mod model;
pub mod parser;
pub mod result;
pub mod scoring;
pub mod source;
