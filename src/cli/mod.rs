use thiserror::Error;

use crate::domain::Scope;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CliInvocation {
    PrintHelp,
    PrintVersion,
    Browse(BrowseArgs),
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BrowseArgs {
    pub year: Option<i32>,
    pub scope: Scope,
    pub station: Option<String>,
    pub session: Option<String>,
}

impl Default for BrowseArgs {
    fn default() -> Self {
        Self {
            year: None,
            scope: Scope::Both,
            station: None,
            session: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum CliParseError {
    #[error("unknown flag: {0}")]
    UnknownFlag(String),

    #[error("missing value for flag: {0}")]
    MissingFlagValue(String),

    #[error("invalid value for {flag}: {value}")]
    InvalidFlagValue { flag: String, value: String },

    #[error("unexpected argument: {0}")]
    UnexpectedArgument(String),
}

pub fn parse_invocation(args: &[String]) -> Result<CliInvocation, CliParseError> {
    if args.iter().any(|arg| arg == "--help" || arg == "-h") {
        return Ok(CliInvocation::PrintHelp);
    }
    if args.iter().any(|arg| arg == "--version" || arg == "-V") {
        return Ok(CliInvocation::PrintVersion);
    }

    let mut browse = BrowseArgs::default();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--year" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliParseError::MissingFlagValue("--year".to_string()))?;
                browse.year =
                    Some(
                        value
                            .parse()
                            .map_err(|_| CliParseError::InvalidFlagValue {
                                flag: "--year".to_string(),
                                value: value.clone(),
                            })?,
                    );
            }
            "--scope" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliParseError::MissingFlagValue("--scope".to_string()))?;
                browse.scope = parse_scope_flag("--scope", value)?;
            }
            "--station" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliParseError::MissingFlagValue("--station".to_string()))?;
                browse.station = Some(value.clone());
            }
            "--session" => {
                let value = iter
                    .next()
                    .ok_or_else(|| CliParseError::MissingFlagValue("--session".to_string()))?;
                browse.session = Some(value.clone());
            }
            _ if arg.starts_with('-') => {
                return Err(CliParseError::UnknownFlag(arg.to_string()));
            }
            _ => {
                return Err(CliParseError::UnexpectedArgument(arg.to_string()));
            }
        }
    }

    Ok(CliInvocation::Browse(browse))
}

fn parse_scope_flag(flag: &str, value: &str) -> Result<Scope, CliParseError> {
    match value {
        "master" => Ok(Scope::Master),
        "intensive" => Ok(Scope::Intensive),
        "both" => Ok(Scope::Both),
        _ => Err(CliParseError::InvalidFlagValue {
            flag: flag.to_string(),
            value: value.to_string(),
        }),
    }
}

/// The query the CLI filters seed the engine with before the first frame.
pub fn initial_filter(args: &BrowseArgs) -> Option<String> {
    let mut clauses = Vec::new();
    if let Some(code) = &args.session {
        clauses.push(format!("code: {code}"));
    }
    if let Some(codes) = &args.station {
        clauses.push(format!("stations: {codes}"));
    }
    if clauses.is_empty() {
        None
    } else {
        Some(clauses.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &[&str]) -> Vec<String> {
        std::iter::once("ivsb")
            .chain(line.iter().copied())
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn no_arguments_browses_with_defaults() {
        let invocation = parse_invocation(&args(&[])).expect("parse");
        assert_eq!(invocation, CliInvocation::Browse(BrowseArgs::default()));
    }

    #[test]
    fn flags_parse_into_browse_args() {
        let invocation =
            parse_invocation(&args(&["--year", "2024", "--scope", "intensive", "--station", "Ns"]))
                .expect("parse");
        let CliInvocation::Browse(browse) = invocation else {
            panic!("expected browse invocation");
        };
        assert_eq!(browse.year, Some(2024));
        assert_eq!(browse.scope, Scope::Intensive);
        assert_eq!(browse.station.as_deref(), Some("Ns"));
        assert_eq!(browse.session, None);
    }

    #[test]
    fn help_and_version_win_over_everything() {
        assert_eq!(
            parse_invocation(&args(&["--year", "2024", "--help"])).expect("parse"),
            CliInvocation::PrintHelp
        );
        assert_eq!(
            parse_invocation(&args(&["-V"])).expect("parse"),
            CliInvocation::PrintVersion
        );
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(
            parse_invocation(&args(&["--scope", "weekly"])),
            Err(CliParseError::InvalidFlagValue { .. })
        ));
        assert!(matches!(
            parse_invocation(&args(&["--year", "twenty"])),
            Err(CliParseError::InvalidFlagValue { .. })
        ));
        assert!(matches!(
            parse_invocation(&args(&["--year"])),
            Err(CliParseError::MissingFlagValue(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["--frobnicate"])),
            Err(CliParseError::UnknownFlag(_))
        ));
        assert!(matches!(
            parse_invocation(&args(&["2025"])),
            Err(CliParseError::UnexpectedArgument(_))
        ));
    }

    #[test]
    fn cli_filters_seed_the_query() {
        let mut browse = BrowseArgs::default();
        assert_eq!(initial_filter(&browse), None);
        browse.station = Some("Ns|Nn".to_string());
        assert_eq!(initial_filter(&browse), Some("stations: Ns|Nn".to_string()));
        browse.session = Some("R1".to_string());
        assert_eq!(
            initial_filter(&browse),
            Some("code: R1; stations: Ns|Nn".to_string())
        );
    }
}
