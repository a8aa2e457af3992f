//! examranger CLI: grade exam attempts, rank users, and manage the catalog.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "examranger", version, about = "Exam grading and ranking engine")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example catalog
    Init,

    /// Validate catalog TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Import a catalog into the data file
    Import {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// List exams
    Exams {
        /// Only exams of this subject
        #[arg(long)]
        subject: Option<String>,
    },

    /// Grade and record an exam attempt
    Submit {
        /// User taking the exam
        #[arg(long)]
        user: String,

        /// Exam ID
        #[arg(long)]
        exam: String,

        /// Selected option per question, 0-based, comma-separated ("-" = unanswered)
        #[arg(long, allow_hyphen_values = true)]
        answers: String,
    },

    /// Show the standings for an exam
    Rankings {
        /// Exam ID
        #[arg(long)]
        exam: String,

        /// Output format: text, json, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Show a user's results and dashboard statistics
    Results {
        /// User ID
        #[arg(long)]
        user: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Review a result question by question
    Review {
        /// Result ID
        #[arg(long)]
        result: u64,

        /// Save the review (.html for HTML, otherwise JSON)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate questions from a subject's syllabus
    Generate {
        /// Subject ID
        #[arg(long)]
        subject: String,

        /// Number of questions (default from config)
        #[arg(long)]
        count: Option<usize>,

        /// Create an exam with this title from the generated questions
        #[arg(long)]
        exam_title: Option<String>,

        /// Duration in minutes of the created exam
        #[arg(long, default_value = "30")]
        duration: u32,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("examranger=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { catalog } => commands::validate::execute(catalog, config),
        Commands::Import { catalog } => commands::import::execute(catalog, config),
        Commands::Exams { subject } => commands::exams::execute(subject, config),
        Commands::Submit {
            user,
            exam,
            answers,
        } => commands::submit::execute(user, exam, answers, config),
        Commands::Rankings {
            exam,
            format,
            output,
        } => commands::rankings::execute(exam, format, output, config),
        Commands::Results { user, format } => commands::results::execute(user, format, config),
        Commands::Review { result, output } => commands::review::execute(result, output, config),
        Commands::Generate {
            subject,
            count,
            exam_title,
            duration,
        } => commands::generate::execute(subject, count, exam_title, duration, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
