use clap::{Args, Subcommand};
use serde::Serialize;

use packsmith::defaults::{self, PacksmithConfig};

use super::CmdResult;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the configuration `new` and `template` run with
    Show {
        /// Ignore packsmith.json and print the built-in defaults
        #[arg(long)]
        builtin: bool,
    },
    /// Print where packsmith.json is read from
    Path,
}

/// Where the shown configuration came from.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConfigSource {
    Builtin,
    File { path: String },
}

#[derive(Debug, Serialize)]
#[serde(tag = "command")]
pub enum ConfigOutput {
    #[serde(rename = "config.show")]
    Show {
        source: ConfigSource,
        /// Templates directory after `~` expansion.
        templates_root: String,
        config: PacksmithConfig,
    },
    #[serde(rename = "config.path")]
    Path { path: String, exists: bool },
}

pub fn run(args: ConfigArgs) -> CmdResult<ConfigOutput> {
    let output = match args.command {
        ConfigCommand::Show { builtin } => show(builtin)?,
        ConfigCommand::Path => ConfigOutput::Path {
            path: defaults::config_path()?,
            exists: defaults::config_exists(),
        },
    };

    Ok((output, 0))
}

/// A malformed packsmith.json fails here instead of falling back silently.
fn show(builtin: bool) -> packsmith::Result<ConfigOutput> {
    let loaded = if builtin {
        None
    } else {
        defaults::load_config_from_file()?
    };

    let source = match loaded {
        Some(_) => ConfigSource::File {
            path: defaults::config_path()?,
        },
        None => ConfigSource::Builtin,
    };
    let config = loaded.unwrap_or_default();

    Ok(ConfigOutput::Show {
        source,
        templates_root: config.defaults.templates_root()?.display().to_string(),
        config,
    })
}
