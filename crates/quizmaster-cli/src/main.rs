//! quizmaster CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{ArgGroup, Args, Parser, Subcommand};

use quizmaster_core::model::Language;

mod commands;
mod console;

#[derive(Parser)]
#[command(
    name = "quizmaster",
    version,
    about = "AI-generated multiple-choice quizzes with negative marking"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// What a quiz or presentation is generated from.
#[derive(Args, Clone)]
pub struct InputArgs {
    /// Topic to generate questions about
    #[arg(long)]
    pub topic: Option<String>,

    /// File whose text the questions are based on
    #[arg(long)]
    pub text_file: Option<PathBuf>,

    /// Extra instructions for the generator (with --text-file)
    #[arg(long, requires = "text_file")]
    pub instructions: Option<String>,
}

/// Options shared by every command that talks to a question source.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// Question language: en or hi
    #[arg(long)]
    pub language: Option<Language>,

    /// Provider name from the config (default: config's default_provider)
    #[arg(long)]
    pub provider: Option<String>,

    /// Model identifier
    #[arg(long)]
    pub model: Option<String>,

    /// Config file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output directory (default: config's output_dir)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz and take it in the terminal
    #[command(group(ArgGroup::new("quiz_input").required(true).args(["topic", "text_file", "quiz_file"])))]
    Take {
        /// Take a quiz from a TOML quiz file instead of generating one
        #[arg(long)]
        quiz_file: Option<PathBuf>,

        #[command(flatten)]
        input: InputArgs,

        /// Number of questions (25, 50, 75 or 100)
        #[arg(long)]
        questions: Option<u32>,

        #[command(flatten)]
        source: SourceArgs,

        /// Don't export the quiz as HTML when it is ready
        #[arg(long)]
        no_export: bool,
    },

    /// Generate a quiz and write it as an HTML document and a TOML quiz file
    #[command(group(ArgGroup::new("quiz_input").required(true).args(["topic", "text_file"])))]
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Number of questions (25, 50, 75 or 100)
        #[arg(long)]
        questions: Option<u32>,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Generate a slide presentation as a standalone HTML deck
    #[command(group(ArgGroup::new("deck_input").required(true).args(["topic", "text_file"])))]
    Present {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Validate TOML quiz files
    Validate {
        /// Path to a quiz file or a directory of quiz files
        #[arg(long)]
        quiz: PathBuf,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and a sample quiz file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizmaster=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Take {
            quiz_file,
            input,
            questions,
            source,
            no_export,
        } => commands::take::execute(quiz_file, input, questions, source, no_export).await,
        Commands::Generate {
            input,
            questions,
            source,
        } => commands::generate::execute(input, questions, source).await,
        Commands::Present { input, source } => commands::present::execute(input, source).await,
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
