//! The `skillgauge generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use skillgauge_core::model::{Difficulty, QuestionSet};
use skillgauge_core::parser::write_question_set;
use skillgauge_core::source::GenerateRequest;
use skillgauge_providers::config::{build_chain, create_source, load_config_from};
use skillgauge_providers::{SourceChain, StaticFallback};

pub async fn execute(
    role: Option<String>,
    skills_str: Option<String>,
    count: Option<usize>,
    difficulty_str: Option<String>,
    output: Option<PathBuf>,
    source: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let role = role
        .or_else(|| config.default_role.clone())
        .context("no role given; pass --role or set default_role in the config")?;
    let count = count.unwrap_or(config.question_count);
    anyhow::ensure!(count >= 1, "count must be at least 1");

    let difficulty: Option<Difficulty> = difficulty_str
        .map(|d| d.parse().map_err(|e: String| anyhow::anyhow!("{e}")))
        .transpose()?;
    let skills: Vec<String> = skills_str
        .map(|s| {
            s.split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let chain = match &source {
        Some(name) if name == "fallback" => {
            SourceChain::new(vec![Box::new(StaticFallback::new())])
        }
        Some(name) => {
            let pc = config
                .providers
                .get(name)
                .with_context(|| format!("source '{name}' not found in config"))?;
            SourceChain::new(vec![create_source(name, pc)?])
        }
        None => build_chain(&config)?,
    };

    let request = GenerateRequest {
        role: role.clone(),
        skills: skills.clone(),
        count,
        difficulty,
        context: None,
    };

    eprintln!(
        "Generating {count} questions for {role} (sources: {})",
        chain.names().join(" -> ")
    );
    let (questions, source_name) = chain.generate(&request).await?;

    let slug = slugify(&role);
    let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");
    let set = QuestionSet {
        id: format!("{slug}-{}", chrono::Utc::now().format("%Y%m%d")),
        name: format!("{role} Assessment"),
        description: format!("Generated by the {source_name} source"),
        role: Some(role),
        skills,
        questions,
        duration_mins: config.duration_mins,
    };

    print_set_summary(&set, &source_name);

    let path =
        output.unwrap_or_else(|| config.output_dir.join(format!("{slug}-{timestamp}.toml")));
    write_question_set(&set, &path)?;
    eprintln!("Question set saved to: {}", path.display());

    Ok(())
}

fn print_set_summary(set: &QuestionSet, source_name: &str) {
    let mix = set.difficulty_mix();

    let mut table = Table::new();
    table.set_header(vec!["Questions", "Easy", "Medium", "Hard", "Categories", "Source"]);
    table.add_row(vec![
        Cell::new(set.questions.len()),
        Cell::new(mix.easy),
        Cell::new(mix.medium),
        Cell::new(mix.hard),
        Cell::new(set.categories().len()),
        Cell::new(source_name),
    ]);
    eprintln!("\n{table}");
}

fn slugify(role: &str) -> String {
    role.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
