//! Help command implementation for skycam.
//!
//! Dispatches `skycam help [COMMAND]` to the matching command's help text, or
//! shows the command overview.

use anyhow::Result;

/// Run the help command (dispatcher)
///
/// # Arguments
/// * `command` - Optional command name to get help for (None = general help)
pub fn run_help_command(command: Option<&str>) -> Result<()> {
    match command {
        None => display_general_help(),
        Some("sun") | Some("s") => super::sun::display_help(),
        Some("colour") | Some("color") | Some("c") => super::colour::display_help(),
        Some("simulate") | Some("S") => super::simulate::display_help(),
        Some("help") | Some("h") => display_help_help(),
        Some(unknown) => {
            log_warning!("Unknown command: {}", unknown);
            display_general_help();
        }
    }
    Ok(())
}

/// Display general help focused on commands (for the help command)
fn display_general_help() {
    log_version!();
    log_block_start!("Available Commands:");
    log_indented!("sun, s          Sunrise, sunset and solar noon for an instant");
    log_indented!("colour, c       Twilight display colour for an instant");
    log_indented!("simulate, S     Replay the capture loop on a simulated clock");
    log_indented!("help, h [CMD]   Show detailed help for a command");
    log_pipe!();
    log_info!("Use 'skycam help <command>' to see detailed help for a specific command.");
    log_indented!("Use 'skycam --help' to see all options and general usage.");
    log_end!();
}

/// Display help for the help command itself
fn display_help_help() {
    log_version!();
    log_block_start!("help - Display help information");
    log_block_start!("Usage: skycam help [COMMAND]");
    log_block_start!("Arguments:");
    log_indented!("COMMAND  Optional command to get help for");
    log_indented!("         If omitted, shows general help");
    log_block_start!("Examples:");
    log_indented!("# Show general help");
    log_indented!("skycam help");
    log_pipe!();
    log_indented!("# Show help for specific commands");
    log_indented!("skycam help sun");
    log_indented!("skycam help simulate");
    log_end!();
}
