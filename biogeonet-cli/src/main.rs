//! `biogeonet` binary.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use biogeonet_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{LoggingError, init_logging},
};
use tracing::{error, field};

fn execute(cli: Cli) -> Result<()> {
    let command = cli.command.name();
    let summary = run_cli(cli).with_context(|| format!("`{command}` failed"))?;
    let mut out = BufWriter::new(io::stdout().lock());
    render_summary(&summary, &mut out).context("could not print the summary")?;
    out.flush().context("could not flush stdout")
}

fn main() -> ExitCode {
    if let Err(err) = init_logging() {
        print_logging_error(&err);
        return ExitCode::FAILURE;
    }

    match execute(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let code = err.downcast_ref::<CliError>().and_then(CliError::code);
            error!(error = %format!("{err:#}"), code = code.map(field::display), "biogeonet failed");
            ExitCode::FAILURE
        }
    }
}

#[expect(clippy::print_stderr, reason = "no subscriber is installed yet")]
fn print_logging_error(err: &LoggingError) {
    eprintln!("biogeonet: cannot set up logging: {err}");
}
