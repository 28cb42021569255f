use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::GlobalArgs;

mod commands;
mod output;

use commands::{config, new, template, validate};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable holding a `tracing` filter directive.
const LOG_ENV: &str = "PACKSMITH_LOG";

#[derive(Parser)]
#[command(name = "packsmith")]
#[command(version = VERSION)]
#[command(about = "Scaffold package definitions from templates and validate package descriptors")]
struct Cli {
    /// Log every generated file and debug details to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new package definition
    New(new::NewArgs),
    /// Check a package descriptor for unsupported or invalid metadata
    Validate(validate::ValidateArgs),
    /// Inspect installed templates
    #[command(visible_alias = "templates")]
    Template(template::TemplateArgs),
    /// Show packsmith configuration
    Config(config::ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let global = GlobalArgs {
        verbose: cli.verbose,
    };

    let (json_result, exit_code) = commands::run_json(cli.command, &global);

    if let Err(err) = output::print_json_result(json_result) {
        tracing::error!("{}", err);
        return std::process::ExitCode::from(exit_code_to_u8(
            output::exit_code_for_error(err.code),
        ));
    }

    std::process::ExitCode::from(exit_code_to_u8(exit_code))
}

fn exit_code_to_u8(code: i32) -> u8 {
    if code <= 0 {
        0
    } else if code >= 255 {
        255
    } else {
        code as u8
    }
}
