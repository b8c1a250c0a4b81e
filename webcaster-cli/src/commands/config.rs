use std::path::Path;

use crate::config::{ConfigLoader, RelayConfig};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (secrets masked)
    Show,
    /// Show the configuration file path in use
    Path,
}

pub fn run(args: ConfigArgs, config_path: Option<&Path>) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(config_path),
        ConfigCommands::Path => show_path(config_path),
    }
}

fn show_config(config_path: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    println!("{}", render(&config)?);
    Ok(())
}

fn show_path(config_path: Option<&Path>) -> Result<()> {
    let path = ConfigLoader::config_path(config_path);
    let note = if path.exists() { "" } else { " (not found, using defaults)" };
    println!("{}{}", path.display(), note);
    Ok(())
}

fn render(config: &RelayConfig) -> Result<String> {
    Ok(toml::to_string_pretty(&config.redacted())?)
}
