//! mathdrill CLI: practice and grade math/physics exercises in the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use mathdrill_core::model::ExponentStyle;

mod commands;

#[derive(Parser)]
#[command(name = "mathdrill", version, about = "Math and physics exercise trainer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Where to find the unit catalog and exercises.
#[derive(Args, Clone, Debug, Default)]
pub struct DataArgs {
    /// Unit catalog (.json or .toml)
    #[arg(long)]
    units: Option<PathBuf>,

    /// Exercise set file or directory
    #[arg(long)]
    exercises: Option<PathBuf>,

    /// How `<sup>` exponents are read: power or scientific
    #[arg(long)]
    exponent_style: Option<ExponentStyle>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Practice exercises interactively
    Practice {
        #[command(flatten)]
        data: DataArgs,

        /// Seed for the exercise order
        #[arg(long)]
        seed: Option<u64>,

        /// Stop after this many answers
        #[arg(long)]
        limit: Option<usize>,

        /// Read `^x` and `_x` in answers as superscript and subscript
        #[arg(long)]
        caret: bool,

        /// Output directory for the session report
        #[arg(long)]
        output: Option<PathBuf>,

        /// Report format: json, html, all, none
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Grade a single answer
    Grade {
        #[command(flatten)]
        data: DataArgs,

        /// Exercise id, or 1-based position in the set
        #[arg(long)]
        exercise: String,

        /// The answer, e.g. "1,5 * 10<sup>3</sup> m"
        #[arg(long, allow_hyphen_values = true)]
        answer: String,

        /// Read `^x` and `_x` in the answer as superscript and subscript
        #[arg(long)]
        caret: bool,

        /// Print the verdict as JSON
        #[arg(long)]
        json: bool,

        /// Exit code 1 if the answer is incorrect
        #[arg(long)]
        fail_on_incorrect: bool,
    },

    /// Convert a value between two units of the catalog
    Convert {
        #[command(flatten)]
        data: DataArgs,

        /// Unit of the value
        #[arg(long)]
        from: String,

        /// Target unit
        #[arg(long)]
        to: String,

        /// Value to convert
        #[arg(long, allow_negative_numbers = true)]
        value: f64,
    },

    /// Validate the unit catalog and exercise files
    Validate {
        #[command(flatten)]
        data: DataArgs,
    },

    /// Render a saved session report
    Report {
        /// Session report JSON
        #[arg(long)]
        session: PathBuf,

        /// Output format: text, markdown, html
        #[arg(long, default_value = "text")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Create starter config, unit catalog, and example exercises
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("mathdrill=info".parse().expect("valid directive")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Practice {
            data,
            seed,
            limit,
            caret,
            output,
            format,
        } => commands::practice::execute(data, seed, limit, caret, output, format),
        Commands::Grade {
            data,
            exercise,
            answer,
            caret,
            json,
            fail_on_incorrect,
        } => commands::grade::execute(data, exercise, answer, caret, json, fail_on_incorrect),
        Commands::Convert {
            data,
            from,
            to,
            value,
        } => commands::convert::execute(data, from, to, value),
        Commands::Validate { data } => commands::validate::execute(data),
        Commands::Report {
            session,
            format,
            output,
        } => commands::report::execute(session, format, output),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
