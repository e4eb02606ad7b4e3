//! Configuration and question-source factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use skillgauge_core::source::QuestionSource;

use crate::chain::SourceChain;
use crate::fallback::StaticFallback;
use crate::gemini::GeminiSource;
use crate::openai::OpenAiSource;

/// Configuration for a single question source.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    OpenAi {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
        #[serde(default)]
        org_id: Option<String>,
    },
    Fallback,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            ProviderConfig::OpenAi {
                api_key: _,
                base_url,
                model,
                org_id,
            } => f
                .debug_struct("OpenAi")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .field("org_id", org_id)
                .finish(),
            ProviderConfig::Fallback => f.debug_struct("Fallback").finish(),
        }
    }
}

impl ProviderConfig {
    /// Whether this source can actually be constructed and used.
    fn is_configured(&self) -> bool {
        match self {
            ProviderConfig::Gemini { api_key, .. } | ProviderConfig::OpenAi { api_key, .. } => {
                !api_key.trim().is_empty()
            }
            ProviderConfig::Fallback => true,
        }
    }
}

/// Top-level skillgauge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillgaugeConfig {
    /// Source configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Source names tried in order when generating questions.
    #[serde(default = "default_source_order")]
    pub source_order: Vec<String>,
    /// Role assumed when the command line does not name one.
    #[serde(default)]
    pub default_role: Option<String>,
    /// Questions per generated set.
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    /// Time allowed per attempt, in minutes.
    #[serde(default = "default_duration_mins")]
    pub duration_mins: u64,
    /// Output directory for question sets, results, and history.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// History file location, overriding `<output_dir>/history.json`.
    #[serde(default)]
    pub history_file: Option<PathBuf>,
}

fn default_source_order() -> Vec<String> {
    vec!["gemini".into(), "openai".into(), "fallback".into()]
}
fn default_question_count() -> usize {
    15
}
fn default_duration_mins() -> u64 {
    45
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./skillgauge-results")
}

impl Default for SkillgaugeConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            source_order: default_source_order(),
            default_role: None,
            question_count: default_question_count(),
            duration_mins: default_duration_mins(),
            output_dir: default_output_dir(),
            history_file: None,
        }
    }
}

impl SkillgaugeConfig {
    /// Where assessment history is stored: `history_file` when set,
    /// otherwise `<output_dir>/history.json`.
    pub fn history_path(&self) -> PathBuf {
        self.history_file
            .clone()
            .unwrap_or_else(|| self.output_dir.join("history.json"))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a source config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
        },
        ProviderConfig::OpenAi {
            api_key,
            base_url,
            model,
            org_id,
        } => ProviderConfig::OpenAi {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
            org_id: org_id.as_ref().map(|o| resolve_env_vars(o)),
        },
        ProviderConfig::Fallback => ProviderConfig::Fallback,
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `skillgauge.toml` in the current directory
/// 2. `~/.config/skillgauge/config.toml`
///
/// Environment variable overrides: `SKILLGAUGE_GEMINI_KEY`, `SKILLGAUGE_OPENAI_KEY`.
pub fn load_config() -> Result<SkillgaugeConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SkillgaugeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("skillgauge.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<SkillgaugeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => SkillgaugeConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("SKILLGAUGE_GEMINI_KEY") {
        config
            .providers
            .entry("gemini".into())
            .or_insert(ProviderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let Some(ProviderConfig::Gemini { api_key, .. }) = config.providers.get_mut("gemini") {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("SKILLGAUGE_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAi {
                api_key: String::new(),
                base_url: None,
                model: None,
                org_id: None,
            });
        if let Some(ProviderConfig::OpenAi { api_key, .. }) = config.providers.get_mut("openai") {
            *api_key = key;
        }
    }

    // Resolve env vars in all source configs
    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skillgauge"))
}

/// Create a question source from its configuration.
pub fn create_source(name: &str, config: &ProviderConfig) -> Result<Box<dyn QuestionSource>> {
    match config {
        ProviderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => Ok(Box::new(GeminiSource::new(
            api_key,
            base_url.clone(),
            model.clone(),
        ))),
        ProviderConfig::OpenAi {
            api_key,
            base_url,
            model,
            org_id,
        } => Ok(Box::new(OpenAiSource::new(
            api_key,
            base_url.clone(),
            model.clone(),
            org_id.clone(),
        ))),
        ProviderConfig::Fallback => {
            let _ = name;
            Ok(Box::new(StaticFallback::new()))
        }
    }
}

/// Build the generation chain from `source_order`.
///
/// Names without a usable configuration are skipped with a warning;
/// "fallback" needs no configuration entry. An empty result degrades to
/// the built-in bank so generation always has at least one source.
pub fn build_chain(config: &SkillgaugeConfig) -> Result<SourceChain> {
    let mut sources: Vec<Box<dyn QuestionSource>> = Vec::new();
    for name in &config.source_order {
        if name == "fallback" {
            sources.push(Box::new(StaticFallback::new()));
            continue;
        }
        match config.providers.get(name) {
            Some(pc) if pc.is_configured() => sources.push(create_source(name, pc)?),
            Some(_) => warn!(source = %name, "skipping source with empty API key"),
            None => warn!(source = %name, "skipping source with no configuration"),
        }
    }
    if sources.is_empty() {
        sources.push(Box::new(StaticFallback::new()));
    }
    Ok(SourceChain::new(sources))
}
