mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use airenv::{AirEnvError, CancellationToken};
use cli::{Cli, Commands};

/// Exit code for a cancelled run (128 + SIGINT).
const CANCELLED_EXIT_CODE: i32 = 130;

fn init_logging(verbose: bool, quiet: bool) {
    let default = match (verbose, quiet) {
        (true, _) => "airenv=debug",
        (false, true) => "error",
        (false, false) => "warn",
    };
    let filter = EnvFilter::try_from_env("AIRENV_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose, args.quiet);
    cli::output::set_quiet(args.quiet);

    let cancel = CancellationToken::new();
    let options = args.assemble_options();

    let result = match &args.command {
        Commands::Run { command } => {
            cli::commands::run::execute(&args.file, options, command, &cancel)
        }
        Commands::Resolve {
            format,
            show_secrets,
        } => cli::commands::resolve::execute(&args.file, options, *format, *show_secrets, &cancel)
            .map(|()| 0),
        Commands::Check => cli::commands::check::execute(&args.file, options).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(AirEnvError::Cancelled) => {
            cli::output::error("Cancelled");
            std::process::exit(CANCELLED_EXIT_CODE);
        }
        Err(e) => {
            cli::output::error(&format!("Error: {e}"));
            std::process::exit(1);
        }
    }
}
