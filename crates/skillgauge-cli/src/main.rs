//! skillgauge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "skillgauge", version, about = "Skill assessment and gap-analysis toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a question set for a job role
    Generate {
        /// Job role to target (e.g. "Frontend Developer")
        #[arg(long)]
        role: Option<String>,

        /// Skills to cover (comma-separated)
        #[arg(long)]
        skills: Option<String>,

        /// Number of questions to generate
        #[arg(long)]
        count: Option<usize>,

        /// Fix every question to one difficulty: easy, medium, hard
        #[arg(long)]
        difficulty: Option<String>,

        /// Output path for the question set TOML
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Use only this source instead of the configured chain
        #[arg(long)]
        source: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Take a timed assessment interactively
    Take {
        /// Path to the question set TOML
        set: PathBuf,

        /// Override the set's time limit, in minutes
        #[arg(long)]
        duration_mins: Option<u64>,

        /// Where to save the result JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// History file to append the result to
        #[arg(long)]
        history: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Score an attempt from an answers file, without a timer
    Score {
        /// Path to the question set TOML
        set: PathBuf,

        /// JSON file mapping question id to selected option index
        #[arg(long)]
        answers: PathBuf,

        /// Where to save the result JSON
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a saved result as markdown or HTML
    Report {
        /// Result JSON produced by take or score
        result: PathBuf,

        /// Output format: markdown, html
        #[arg(long, default_value = "markdown")]
        format: String,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show past assessments and aggregate stats
    History {
        /// History file to read
        #[arg(long)]
        history: Option<PathBuf>,

        /// Show only the most recent N entries
        #[arg(long)]
        limit: Option<usize>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Compare two results category by category
    Progress {
        /// Baseline result JSON
        baseline: PathBuf,

        /// Current result JSON
        current: PathBuf,

        /// Percentage-point change that counts as significant
        #[arg(long, default_value = "5")]
        threshold: u8,

        /// Exit code 1 if any category regressed
        #[arg(long)]
        fail_on_regression: bool,

        /// Output format: text, markdown, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate question set TOML files
    Validate {
        /// Question set file or directory
        set: PathBuf,
    },

    /// List roles served by the built-in question bank
    Roles,

    /// Create starter config and an example question set
    Init {
        /// Directory to initialize
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("skillgauge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            role,
            skills,
            count,
            difficulty,
            output,
            source,
            config,
        } => commands::generate::execute(role, skills, count, difficulty, output, source, config)
            .await,
        Commands::Take {
            set,
            duration_mins,
            output,
            history,
            config,
        } => commands::take::execute(set, duration_mins, output, history, config),
        Commands::Score {
            set,
            answers,
            output,
        } => commands::score::execute(set, answers, output),
        Commands::Report {
            result,
            format,
            output,
        } => commands::report::execute(result, format, output),
        Commands::History {
            history,
            limit,
            config,
        } => commands::history::execute(history, limit, config),
        Commands::Progress {
            baseline,
            current,
            threshold,
            fail_on_regression,
            format,
        } => commands::progress::execute(baseline, current, threshold, fail_on_regression, format),
        Commands::Validate { set } => commands::validate::execute(set),
        Commands::Roles => commands::roles::execute(),
        Commands::Init { dir } => commands::init::execute(dir),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
