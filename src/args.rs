//! Command-line argument parsing and processing.
//!
//! Turns the raw argument list into a [`CliAction`]. Global flags (`--config`,
//! `--help`, `--version`) may appear anywhere; the first non-flag argument is
//! the command.

/// Represents the parsed command-line arguments and their intended actions.
#[derive(Debug, PartialEq)]
pub enum CliAction {
    /// Print solar times for an instant (default: now)
    Sun {
        at: Option<String>,
        json: bool,
        config_dir: Option<String>,
    },
    /// Print the twilight colour for an instant (default: now)
    Colour {
        at: Option<String>,
        json: bool,
        config_dir: Option<String>,
    },
    /// Replay the capture loop on a fast-forward clock
    Simulate {
        start_time: String,
        end_time: String,
        log_to_file: bool,
        config_dir: Option<String>,
    },
    /// Help for one command, or general help for `None`
    HelpCommand { command: Option<String> },

    /// Display help information and exit
    ShowHelp,
    /// Display version information and exit
    ShowVersion,
    /// Show help due to unknown arguments and exit
    ShowHelpDueToError,
}

/// Result of parsing command-line arguments.
pub struct ParsedArgs {
    pub action: CliAction,
}

/// Options shared by `sun` and `colour`.
#[derive(Default)]
struct InstantOptions {
    at: Option<String>,
    json: bool,
}

impl ParsedArgs {
    /// Parse command-line arguments into a structured result.
    ///
    /// # Arguments
    /// * `args` - Iterator over command-line arguments (typically from std::env::args())
    pub fn parse<I, S>(args: I) -> ParsedArgs
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // Convert to vector for easier indexed access
        let args_vec: Vec<String> = args
            .into_iter()
            .skip(1)
            .map(|s| s.as_ref().to_string())
            .collect();

        let action = Self::parse_action(&args_vec);
        ParsedArgs { action }
    }

    /// Parse the process's own arguments.
    pub fn from_env() -> ParsedArgs {
        Self::parse(std::env::args())
    }

    fn parse_action(args_vec: &[String]) -> CliAction {
        // Help and version take precedence over everything else
        if args_vec
            .iter()
            .any(|arg| arg == "--version" || arg == "-V" || arg == "-v")
        {
            return CliAction::ShowVersion;
        }

        // Pull out --config and collect the remaining words
        let mut config_dir = None;
        let mut rest: Vec<&str> = Vec::new();
        let mut display_help = false;
        let mut i = 0;
        while i < args_vec.len() {
            match args_vec[i].as_str() {
                "--config" | "-c" => {
                    if i + 1 < args_vec.len() && !args_vec[i + 1].starts_with('-') {
                        config_dir = Some(args_vec[i + 1].clone());
                        i += 1;
                    } else {
                        log_warning!("Missing directory for --config. Usage: --config <directory>");
                        return CliAction::ShowHelpDueToError;
                    }
                }
                "--help" | "-h" => display_help = true,
                other => rest.push(other),
            }
            i += 1;
        }

        let Some((command, command_args)) = rest.split_first() else {
            return CliAction::ShowHelp;
        };

        if display_help {
            return CliAction::HelpCommand {
                command: Some(command.to_string()),
            };
        }

        match *command {
            "sun" | "s" => match parse_instant_options(command, command_args) {
                Some(options) => CliAction::Sun {
                    at: options.at,
                    json: options.json,
                    config_dir,
                },
                None => CliAction::ShowHelpDueToError,
            },
            "colour" | "color" | "c" => match parse_instant_options(command, command_args) {
                Some(options) => CliAction::Colour {
                    at: options.at,
                    json: options.json,
                    config_dir,
                },
                None => CliAction::ShowHelpDueToError,
            },
            "simulate" | "S" => parse_simulate(command_args, config_dir),
            "help" | "h" => match command_args {
                [] => CliAction::HelpCommand { command: None },
                [topic] => CliAction::HelpCommand {
                    command: Some(topic.to_string()),
                },
                _ => {
                    log_warning!("Usage: skycam help [COMMAND]");
                    CliAction::ShowHelpDueToError
                }
            },
            unknown if unknown.starts_with('-') => {
                log_warning!("Unknown option: {}", unknown);
                CliAction::ShowHelpDueToError
            }
            unknown => {
                log_warning!("Unknown command: {}", unknown);
                CliAction::ShowHelpDueToError
            }
        }
    }
}

fn parse_instant_options(command: &str, args: &[&str]) -> Option<InstantOptions> {
    let mut options = InstantOptions::default();
    let mut i = 0;
    while i < args.len() {
        match args[i] {
            "--json" | "-j" => options.json = true,
            "--at" | "-a" => {
                let Some(value) = args.get(i + 1) else {
                    log_warning!(
                        "Missing time for --at. Usage: skycam {} --at \"YYYY-MM-DD HH:MM:SS\"",
                        command
                    );
                    return None;
                };
                options.at = Some(value.to_string());
                i += 1;
            }
            other => {
                log_warning!("Unexpected argument for {}: {}", command, other);
                return None;
            }
        }
        i += 1;
    }
    Some(options)
}

fn parse_simulate(args: &[&str], config_dir: Option<String>) -> CliAction {
    let mut log_to_file = false;
    let mut times = Vec::new();
    for arg in args {
        match *arg {
            "--log" | "-l" => log_to_file = true,
            other if other.starts_with('-') => {
                log_warning!("Unknown option for simulate: {}", other);
                return CliAction::ShowHelpDueToError;
            }
            other => times.push(other.to_string()),
        }
    }

    match <[String; 2]>::try_from(times) {
        Ok([start_time, end_time]) => CliAction::Simulate {
            start_time,
            end_time,
            log_to_file,
            config_dir,
        },
        Err(_) => {
            log_warning!(
                "Usage: skycam simulate \"YYYY-MM-DD HH:MM:SS\" \"YYYY-MM-DD HH:MM:SS\" [--log]"
            );
            CliAction::ShowHelpDueToError
        }
    }
}

/// Displays version information using custom logging style.
pub fn display_version_info() {
    log_version!();
    log_pipe!();
    println!("┗ {}", env!("CARGO_PKG_DESCRIPTION"));
}

/// Displays custom help message using logger methods.
pub fn display_help() {
    log_version!();
    log_block_start!(env!("CARGO_PKG_DESCRIPTION"));
    log_block_start!("Usage:");
    log_indented!("skycam [OPTIONS] <COMMAND>");
    log_block_start!("Options:");
    log_indented!("-c, --config <dir>     Use custom configuration directory");
    log_indented!("-h, --help             Print help information");
    log_indented!("-V, --version          Print version information");
    log_block_start!("Commands:");
    log_indented!("sun, s [--at <time>] [--json]      Solar times for an instant");
    log_indented!("colour, c [--at <time>] [--json]   Twilight colour for an instant");
    log_indented!("simulate, S <start> <end> [--log]  Replay the capture loop on a simulated clock");
    log_indented!("help, h [COMMAND]                  Show detailed help for a command");
    log_end!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliAction {
        let mut full = vec!["skycam"];
        full.extend_from_slice(args);
        ParsedArgs::parse(full).action
    }

    #[test]
    fn test_parse_no_args() {
        assert_eq!(parse(&[]), CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_help_flag() {
        assert_eq!(parse(&["--help"]), CliAction::ShowHelp);
        assert_eq!(parse(&["-h"]), CliAction::ShowHelp);
    }

    #[test]
    fn test_parse_version_flags() {
        assert_eq!(parse(&["--version"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-V"]), CliAction::ShowVersion);
        assert_eq!(parse(&["-v"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_version_takes_precedence() {
        assert_eq!(parse(&["sun", "--json", "--version"]), CliAction::ShowVersion);
    }

    #[test]
    fn test_parse_sun_defaults() {
        assert_eq!(
            parse(&["sun"]),
            CliAction::Sun {
                at: None,
                json: false,
                config_dir: None
            }
        );
    }

    #[test]
    fn test_parse_sun_with_options() {
        assert_eq!(
            parse(&["--config", "/tmp/sky", "sun", "--at", "2024-06-21 12:00:00", "--json"]),
            CliAction::Sun {
                at: Some("2024-06-21 12:00:00".to_string()),
                json: true,
                config_dir: Some("/tmp/sky".to_string())
            }
        );
    }

    #[test]
    fn test_parse_colour_aliases() {
        let expected = CliAction::Colour {
            at: None,
            json: true,
            config_dir: None,
        };
        assert_eq!(parse(&["colour", "--json"]), expected);
        assert_eq!(parse(&["color", "-j"]), expected);
        assert_eq!(parse(&["c", "--json"]), expected);
    }

    #[test]
    fn test_parse_at_without_value() {
        assert_eq!(parse(&["sun", "--at"]), CliAction::ShowHelpDueToError);
    }

    #[test]
    fn test_parse_simulate() {
        assert_eq!(
            parse(&[
                "simulate",
                "2024-03-20 00:00:00",
                "2024-03-21 00:00:00",
                "--log",
                "-c",
                "/etc/skycam"
            ]),
            CliAction::Simulate {
                start_time: "2024-03-20 00:00:00".to_string(),
                end_time: "2024-03-21 00:00:00".to_string(),
                log_to_file: true,
                config_dir: Some("/etc/skycam".to_string())
            }
        );
    }

    #[test]
    fn test_parse_simulate_needs_two_times() {
        assert_eq!(
            parse(&["simulate", "2024-03-20 00:00:00"]),
            CliAction::ShowHelpDueToError
        );
    }

    #[test]
    fn test_parse_help_command() {
        assert_eq!(
            parse(&["help"]),
            CliAction::HelpCommand { command: None }
        );
        assert_eq!(
            parse(&["help", "simulate"]),
            CliAction::HelpCommand {
                command: Some("simulate".to_string())
            }
        );
        assert_eq!(
            parse(&["sun", "--help"]),
            CliAction::HelpCommand {
                command: Some("sun".to_string())
            }
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(parse(&["capture"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--frobnicate"]), CliAction::ShowHelpDueToError);
        assert_eq!(parse(&["--config"]), CliAction::ShowHelpDueToError);
    }
}
