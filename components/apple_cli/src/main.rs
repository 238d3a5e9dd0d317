//! Apple scripting language CLI
//!
//! Entry point for the runtime. Parses CLI arguments and delegates to the
//! Runtime for execution. With no script and no `--eval`, starts the REPL.

use std::process::ExitCode;
use std::sync::Once;

use apple_cli::cli::version_banner;
use apple_cli::{Cli, CliResult, Runtime};
use clap::Parser as ClapParser;

static TRACING_INIT: Once = Once::new();

/// Install the stderr subscriber; `--log-level` wins over `RUST_LOG`,
/// and the default is `warn`
fn init_tracing(filter: Option<&str>) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let filter = match filter {
            Some(directives) => EnvFilter::new(directives),
            None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        };
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
            .with(filter)
            .init();
    });
}

fn run(cli: &Cli, runtime: &mut Runtime) -> CliResult<()> {
    if let Some(path) = cli.script_path() {
        let output = runtime.execute_file(path)?;
        if !output.is_undefined() {
            println!("{}", output);
        }
        return Ok(());
    }

    if let Some(code) = &cli.eval {
        let output = runtime.execute_string(code)?;
        if !output.is_undefined() {
            println!("{}", output);
        }
        if !cli.repl {
            return Ok(());
        }
    }

    runtime.repl()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    if cli.version {
        println!("{}", version_banner());
        return ExitCode::SUCCESS;
    }

    let mut runtime = Runtime::with_config(cli.runtime_config());
    match run(&cli, &mut runtime) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("apple: {}", err);
            ExitCode::FAILURE
        }
    }
}
