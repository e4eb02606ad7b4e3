//! skillgauge-providers — Question source integrations.
//!
//! Implements the `QuestionSource` trait for Gemini, OpenAI, and the
//! built-in fallback bank, plus the ordered chain that ties them together.

pub mod chain;
pub mod config;
pub mod fallback;
pub mod gemini;
pub mod mock;
pub mod openai;

pub use chain::SourceChain;
pub use fallback::{builtin_roles, StaticFallback};
pub use config::{
    build_chain, create_source, load_config, load_config_from, ProviderConfig, SkillgaugeConfig,
};
