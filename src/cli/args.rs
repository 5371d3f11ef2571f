//! Command-line argument parsing.
//!
//! The client takes three positional arguments: `pluginId`, `host` and
//! `authtokenFile`, in that order. Parsing is a pure function over an
//! argument iterator so it can be unit tested without a process.

use std::path::PathBuf;

/// One-line usage summary, printed on argument errors.
pub const USAGE: &str = "Usage: hostlink <pluginId> <host> <authtokenFile>";

/// Positional arguments of a normal run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub plugin_id: String,
    pub host: String,
    pub token_file: PathBuf,
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Connect to the host (default)
    Run(Args),
}

/// Parse command-line arguments and return the command to execute.
///
/// Returns a usage message as the error when the positional arguments do not
/// line up.
pub fn parse_args<I>(args: I) -> Result<CliCommand, String>
where
    I: Iterator<Item = String>,
{
    let mut positional = Vec::new();
    // Skip the program name
    for arg in args.skip(1) {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            _ => positional.push(arg),
        }
    }

    if positional.len() != 3 {
        return Err(format!(
            "expected 3 arguments, got {}\n{}",
            positional.len(),
            USAGE
        ));
    }

    let mut positional = positional.into_iter();
    Ok(CliCommand::Run(Args {
        plugin_id: positional.next().unwrap_or_default(),
        host: positional.next().unwrap_or_default(),
        token_file: PathBuf::from(positional.next().unwrap_or_default()),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> impl Iterator<Item = String> {
        std::iter::once("hostlink".to_string())
            .chain(args.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn test_parse_positional_arguments() {
        let command = parse_args(argv(&["p1", "localhost", "/etc/plugin/token"])).unwrap();
        assert_eq!(
            command,
            CliCommand::Run(Args {
                plugin_id: "p1".to_string(),
                host: "localhost".to_string(),
                token_file: PathBuf::from("/etc/plugin/token"),
            })
        );
    }

    #[test]
    fn test_parse_version_flag() {
        assert_eq!(parse_args(argv(&["--version"])).unwrap(), CliCommand::Version);
        assert_eq!(parse_args(argv(&["-V"])).unwrap(), CliCommand::Version);
    }

    #[test]
    fn test_version_flag_wins_over_positionals() {
        let command = parse_args(argv(&["p1", "--version", "localhost"])).unwrap();
        assert_eq!(command, CliCommand::Version);
    }

    #[test]
    fn test_missing_arguments_report_usage() {
        let err = parse_args(argv(&["p1", "localhost"])).unwrap_err();
        assert!(err.contains("expected 3 arguments, got 2"));
        assert!(err.contains(USAGE));
    }

    #[test]
    fn test_extra_arguments_report_usage() {
        let err = parse_args(argv(&["p1", "localhost", "token", "extra"])).unwrap_err();
        assert!(err.contains("expected 3 arguments, got 4"));
    }

    #[test]
    fn test_no_arguments_report_usage() {
        let err = parse_args(argv(&[])).unwrap_err();
        assert!(err.contains("expected 3 arguments, got 0"));
    }
}
