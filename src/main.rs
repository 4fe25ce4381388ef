//! Main application entry point.
//!
//! Parses the command line and hands off to the command handlers in
//! `skycam::commands`. Errors reach the user through the logger so that they
//! keep the same box-drawing frame as normal output.

use anyhow::Result;

#[macro_use]
extern crate skycam;

use skycam::args::{self, CliAction, ParsedArgs};
use skycam::commands;
use skycam::config;
use skycam::constants::EXIT_FAILURE;
use skycam::logger::Log;

fn main() {
    let parsed_args = ParsedArgs::from_env();

    if let Err(e) = run(parsed_args.action) {
        // JSON modes silence the logger; errors still need to be seen
        Log::set_enabled(true);
        log_error_exit!("{e:#}");
        std::process::exit(EXIT_FAILURE);
    }
}

fn run(action: CliAction) -> Result<()> {
    match action {
        CliAction::ShowVersion => {
            args::display_version_info();
            Ok(())
        }
        CliAction::ShowHelp => {
            args::display_help();
            Ok(())
        }
        CliAction::ShowHelpDueToError => {
            args::display_help();
            std::process::exit(EXIT_FAILURE);
        }
        CliAction::HelpCommand { command } => commands::help::run_help_command(command.as_deref()),
        CliAction::Sun {
            at,
            json,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            // JSON goes to stdout untouched by the log frame
            if json {
                Log::set_enabled(false);
            }
            commands::sun::handle_sun_command(at, json)
        }
        CliAction::Colour {
            at,
            json,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            if json {
                Log::set_enabled(false);
            }
            commands::colour::handle_colour_command(at, json)
        }
        CliAction::Simulate {
            start_time,
            end_time,
            log_to_file,
            config_dir,
        } => {
            config::set_config_dir(config_dir)?;
            commands::simulate::handle_simulate_command(start_time, end_time, log_to_file)
        }
    }
}
