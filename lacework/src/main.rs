// lacework/src/main.rs
//! Lacework CLI entry point.
//!
//! Parses the command line, initializes logging and hands over to the
//! command dispatcher. Any error is printed once to stderr and the process
//! exits with a non-zero status.

use clap::Parser;
use lacework::cli::Cli;
use lacework::commands::dispatch;
use lacework::logger;
use lacework::ui::output_format::print_error_message;
use lacework::ui::theme::default_theme_map;
use is_terminal::IsTerminal;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init_logger(cli.log_level());

    match dispatch(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let enable_colors = !cli.nocolor && io::stderr().is_terminal();
            let _ = print_error_message(&mut io::stderr(), &format!("{:#}", err), &default_theme_map(), enable_colors);
            ExitCode::FAILURE
        }
    }
}
