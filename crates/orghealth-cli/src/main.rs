#![forbid(unsafe_code)]

mod cmd;
mod output;
mod validate;

use clap::{CommandFactory, Parser, Subcommand};
use cmd::Session;
use output::{OutputMode, resolve_output_mode};
use std::env;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "orghealth: company subdivision health diagnostics",
    long_about = None
)]
struct Cli {
    /// Enable debug logging (ignored when ORGHEALTH_LOG is set).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors (ignored when ORGHEALTH_LOG is set).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Output format: pretty, text or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (alias for `--format json`).
    #[arg(long, global = true, hide = true)]
    json: bool,

    /// Path to the SQLite store (default: .orghealth/orghealth.db).
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Company to operate on (default: `store.default_company` from config).
    #[arg(long, global = true, value_name = "ID")]
    company: Option<i64>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Project",
        about = "Initialize an orghealth project",
        long_about = "Create .orghealth/ with a default config and an empty store.",
        after_help = "EXAMPLES:\n    # Initialize in the current directory\n    orghealth init\n\n    # Use a custom database location\n    orghealth --db /tmp/company.db init"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Records",
        about = "Manage subdivisions",
        after_help = "EXAMPLES:\n    # Add a subdivision\n    orghealth subdivision add --name Sales --resources 10000 --kpi 50 --state 0.3\n\n    # Change only the KPI\n    orghealth subdivision edit 1 --kpi 72\n\n    # Delete without prompting\n    orghealth subdivision delete 1 --force"
    )]
    Subdivision(cmd::subdivision::SubdivisionArgs),

    #[command(
        next_help_heading = "Records",
        about = "Manage links between subdivisions",
        after_help = "EXAMPLES:\n    # Sales depends on Logistics with weight 2 and a 4 h delay\n    orghealth link add --from 1 --to 2 --importance 2 --delay 4\n\n    # List links with names\n    orghealth link list"
    )]
    Link(cmd::link::LinkArgs),

    #[command(
        next_help_heading = "Analysis",
        about = "Compute metrics and diagnose every subdivision",
        long_about = "Compute centrality, cumulative delay and integral index per subdivision, flag low KPI, high load and slow links, and name the worst performer.",
        after_help = "EXAMPLES:\n    # Human-readable report\n    orghealth analyze\n\n    # Structured diagnosis\n    orghealth analyze --json"
    )]
    Analyze(cmd::analyze::AnalyzeArgs),

    #[command(next_help_heading = "Project", about = "Inspect configuration")]
    Config(cmd::config::ConfigArgs),

    #[command(
        next_help_heading = "Project",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    orghealth completions bash"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool, quiet: bool) {
    let filter = EnvFilter::try_from_env("ORGHEALTH_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "orghealth=debug,info"
        } else if quiet {
            "error"
        } else {
            "orghealth=info,warn"
        })
    });

    let format = env::var("ORGHEALTH_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let session = Session {
        project_root: env::current_dir()?,
        db_override: cli.db.clone(),
        company_override: cli.company,
        output: cli.output_mode(),
    };
    debug!(db = %session.db_path().display(), output = ?session.output, "session resolved");

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, &session),
        Commands::Subdivision(ref args) => cmd::subdivision::run_subdivision(args, &session),
        Commands::Link(ref args) => cmd::link::run_link(args, &session),
        Commands::Analyze(ref args) => cmd::analyze::run_analyze(args, &session),
        Commands::Config(ref args) => cmd::config::run_config(args, &session),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
