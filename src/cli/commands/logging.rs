use clap::{Arg, ArgAction, ArgMatches, Command, builder::PossibleValuesParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_LEVEL: &str = "log-level";

/// Levels in `-v` order: no flag is `error`, `-vvvv` is `trace`.
const LEVELS: [Level; 5] = [
    Level::ERROR,
    Level::WARN,
    Level::INFO,
    Level::DEBUG,
    Level::TRACE,
];

/// Resolves the tracing level. `-v` flags win over `--log-level`; extra flags
/// stay at `trace`.
#[must_use]
pub fn level(matches: &ArgMatches) -> Level {
    let count = matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0);
    if count > 0 {
        return LEVELS
            .get(usize::from(count))
            .copied()
            .unwrap_or(Level::TRACE);
    }

    matches
        .get_one::<String>(ARG_LOG_LEVEL)
        .and_then(|name| {
            LEVELS
                .iter()
                .find(|level| level.as_str().eq_ignore_ascii_case(name))
        })
        .copied()
        .unwrap_or(Level::ERROR)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Increase log output, repeat up to -vvvv for TRACE")
                .global(true)
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new(ARG_LOG_LEVEL)
                .long("log-level")
                .help("Log level when no -v is given (default: error)")
                .env("PASSKEY_LOG_LEVEL")
                .global(true)
                .ignore_case(true)
                .value_parser(PossibleValuesParser::new([
                    "error", "warn", "info", "debug", "trace",
                ])),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(env: Option<&str>, flags: &[&str]) -> Result<Level, clap::Error> {
        temp_env::with_vars([("PASSKEY_LOG_LEVEL", env)], || {
            let mut argv = vec!["passkey"];
            argv.extend_from_slice(flags);
            with_args(Command::new("passkey"))
                .try_get_matches_from(argv)
                .map(|matches| level(&matches))
        })
    }

    #[test]
    fn level_follows_flag_count() {
        assert_eq!(parse(None, &[]).unwrap(), Level::ERROR);
        assert_eq!(parse(None, &["-vv"]).unwrap(), Level::INFO);
        assert_eq!(parse(None, &["-vvvv"]).unwrap(), Level::TRACE);
        assert_eq!(parse(None, &["-vvvvvvv"]).unwrap(), Level::TRACE);
    }

    #[test]
    fn env_level_names() {
        assert_eq!(parse(Some("warn"), &[]).unwrap(), Level::WARN);
        assert_eq!(parse(Some("DEBUG"), &[]).unwrap(), Level::DEBUG);
        assert_eq!(parse(None, &["--log-level", "info"]).unwrap(), Level::INFO);
    }

    #[test]
    fn flags_override_env_level() {
        assert_eq!(parse(Some("trace"), &["-v"]).unwrap(), Level::WARN);
    }

    #[test]
    fn env_rejects_numbers_and_unknown_names() {
        assert!(parse(Some("5"), &[]).is_err());
        assert!(parse(Some("verbose"), &[]).is_err());
    }
}
