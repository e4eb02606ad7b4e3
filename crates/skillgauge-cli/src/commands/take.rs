//! The `skillgauge take` command: an interactive timed attempt on stdin.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;

use skillgauge_core::attempt::{Attempt, SubmitTrigger};
use skillgauge_core::history::AssessmentHistory;
use skillgauge_core::parser;
use skillgauge_providers::config::load_config_from;

use super::summary::{fmt_duration, print_result_summary};

pub fn execute(
    set_path: PathBuf,
    duration_mins: Option<u64>,
    output: Option<PathBuf>,
    history_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut set = parser::parse_question_set(&set_path)?;
    if let Some(mins) = duration_mins {
        anyhow::ensure!(mins >= 1, "duration must be at least 1 minute");
        set.duration_mins = mins;
    }
    anyhow::ensure!(!set.questions.is_empty(), "question set has no questions");

    println!(
        "{} ({} questions, {} minutes)",
        set.name,
        set.questions.len(),
        set.duration_mins
    );
    if !set.description.is_empty() {
        println!("{}", set.description);
    }
    println!("Answer with the option number, or press Enter to skip.\n");

    let questions = set.questions.clone();
    let mut attempt = Attempt::new(set);
    attempt.start(Utc::now())?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut trigger = SubmitTrigger::Manual;

    for (i, question) in questions.iter().enumerate() {
        let now = Utc::now();
        if attempt.is_expired(now) {
            println!("\nTime is up.");
            trigger = SubmitTrigger::TimerExpired;
            break;
        }

        println!(
            "[{}/{}] ({} left) {}",
            i + 1,
            questions.len(),
            fmt_duration(attempt.remaining_secs(now)),
            question.text
        );
        for (j, option) in question.options.iter().enumerate() {
            println!("  {}. {option}", j + 1);
        }

        loop {
            print!("> ");
            io::stdout().flush()?;
            let line = match lines.next() {
                Some(line) => line.context("failed to read answer")?,
                // stdin closed; remaining questions stay unanswered
                None => String::new(),
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                break;
            }
            match trimmed.parse::<usize>() {
                Ok(n) if (1..=question.options.len()).contains(&n) => {
                    attempt.set_answer(&question.id, n - 1)?;
                    break;
                }
                _ => println!("Enter a number between 1 and {}.", question.options.len()),
            }
        }
        println!();
    }

    let result = attempt.submit(trigger, Utc::now())?.clone();
    if result.trigger == SubmitTrigger::TimerExpired {
        println!("Submitted automatically at the deadline.");
    }
    print_result_summary(&result);

    let result_path = output.unwrap_or_else(|| {
        let timestamp = result.completed_at.format("%Y-%m-%dT%H%M%S");
        config.output_dir.join(format!("result-{timestamp}.json"))
    });
    result.save_json(&result_path)?;
    eprintln!("\nResult saved to: {}", result_path.display());

    let history_path = history_path.unwrap_or_else(|| config.history_path());
    let mut history = AssessmentHistory::load_json(&history_path)?;
    history.record(&result);
    history.save_json(&history_path)?;
    eprintln!("History updated: {}", history_path.display());

    Ok(())
}
