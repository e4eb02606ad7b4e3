//! The `skillgauge init` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(dir: PathBuf) -> Result<()> {
    std::fs::create_dir_all(&dir)?;

    let config_path = dir.join("skillgauge.toml");
    if config_path.exists() {
        println!("skillgauge.toml already exists, skipping.");
    } else {
        std::fs::write(&config_path, SAMPLE_CONFIG)?;
        println!("Created skillgauge.toml");
    }

    let sets_dir = dir.join("question-sets");
    std::fs::create_dir_all(&sets_dir)?;
    let example_path = sets_dir.join("example.toml");
    if example_path.exists() {
        println!("question-sets/example.toml already exists, skipping.");
    } else {
        std::fs::write(&example_path, EXAMPLE_SET)?;
        println!("Created question-sets/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit skillgauge.toml with your API keys (the fallback bank needs none)");
    println!("  2. Run: skillgauge validate question-sets/example.toml");
    println!("  3. Run: skillgauge take question-sets/example.toml");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# skillgauge configuration

source_order = ["gemini", "openai", "fallback"]
default_role = "Frontend Developer"
question_count = 15
duration_mins = 45
output_dir = "./skillgauge-results"
# history_file = "./skillgauge-results/history.json"

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
"#;

const EXAMPLE_SET: &str = r#"[set]
id = "example"
name = "Example Assessment"
description = "A short example question set to get started"
role = "Frontend Developer"
skills = ["JavaScript", "CSS"]
duration_mins = 10

[[questions]]
id = "q1"
text = "Which method adds an element to the end of a JavaScript array?"
options = ["push()", "pop()", "shift()", "concat()"]
correct_option = 0
difficulty = "easy"
category = "JavaScript"
concept = "Array Methods"

[[questions]]
id = "q2"
text = "What does the CSS selector `.card > p` match?"
options = [
    "Every p inside .card",
    "Direct p children of .card",
    "The first p after .card",
    "Every p except those in .card",
]
correct_option = 1
difficulty = "medium"
category = "CSS"
concept = "Selectors"

[[questions]]
id = "q3"
text = "What does a Promise represent in JavaScript?"
options = [
    "A synchronous loop",
    "The eventual result of an async operation",
    "A CSS animation frame",
    "A type of closure",
]
correct_option = 1
difficulty = "medium"
category = "JavaScript"
concept = "Promises"

[[questions]]
id = "q4"
text = "Which CSS property controls the stacking order of positioned elements?"
options = ["order", "z-index", "stack-level", "layer"]
correct_option = 1
difficulty = "hard"
category = "CSS"
concept = "Stacking Context"
"#;
