use std::process::ExitCode;

mod cli;
mod commands;
mod display;
mod io;
mod logging;
mod util;

fn main() -> ExitCode {
    let cli = cli::parse();

    // Keep the handle alive until exit, dropping it stops the logger.
    let _logger = match logging::init(cli.verbose, cli.quiet) {
        Ok(handle) => handle,
        Err(e) => {
            display::print_error(&e);
            return ExitCode::FAILURE;
        }
    };

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            display::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
