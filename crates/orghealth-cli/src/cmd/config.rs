use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use serde::Serialize;

use super::{Session, display_path};
use crate::output::render;
use orghealth_core::config::{ProjectConfig, config_path};

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Show the effective configuration (file values over defaults)
    Show,
}

#[derive(Debug, Serialize)]
struct ShowOutput {
    source: String,
    from_file: bool,
    config: ProjectConfig,
}

pub fn run_config(args: &ConfigArgs, session: &Session) -> Result<()> {
    match args.command {
        ConfigCommand::Show => run_show(session),
    }
}

fn run_show(session: &Session) -> Result<()> {
    let path = config_path(&session.project_root);
    let config = session.load_config()?;
    let payload = ShowOutput {
        source: display_path(&session.project_root, &path),
        from_file: path.exists(),
        config,
    };
    let toml_text = payload.config.to_toml_string()?;

    render(session.output, &payload, |p, w| {
        if p.from_file {
            writeln!(w, "# effective config (source: {})", p.source)?;
        } else {
            writeln!(w, "# effective config (defaults, {} not found)", p.source)?;
        }
        write!(w, "{toml_text}")
    })
}

