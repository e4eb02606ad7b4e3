//! skillgauge-report — Markdown and HTML report generation.
//!
//! Renders an `AssessmentResult` into human-readable documents. JSON
//! persistence lives on the result type itself in `skillgauge-core`.

pub mod html;
pub mod markdown;
