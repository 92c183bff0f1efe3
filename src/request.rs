use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::State;

pub const USAGE: &str =
    "check_ups -H <host> [-C <community>] -T <info|load|timeleft> -w <warning> -c <critical> [-t <timeout>] [-h|--help]";

pub const DEFAULT_COMMUNITY: &str = "public";
pub const DEFAULT_PORT: u16 = 161;
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// What to look at on the UPS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Info,
    Load,
    TimeLeft,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Info, Category::Load, Category::TimeLeft];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Info => "info",
            Category::Load => "load",
            Category::TimeLeft => "timeleft",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = UsageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UsageError::UnknownCategory(s.to_owned()))
    }
}

/// How readings are compared against thresholds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Comparison {
    /// Parse the reading as an integer and compare numbers.
    #[default]
    Numeric,
    /// Compare the decimal text of reading and thresholds byte by byte, as older
    /// releases of this check did ("9" >= "10").
    Lexical,
}

/// A validated check, one per invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Check {
    Info,
    Load { warning: i64, critical: i64 },
    TimeLeft { warning: i64, critical: i64 },
}

impl Check {
    pub fn category(&self) -> Category {
        match self {
            Check::Info => Category::Info,
            Check::Load { .. } => Category::Load,
            Check::TimeLeft { .. } => Category::TimeLeft,
        }
    }
}

/// Options as they come off the command line, nothing validated yet.
#[derive(Clone, Debug, Default)]
pub struct Options {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub category: Option<String>,
    pub community: Option<String>,
    pub warning: Option<i64>,
    pub critical: Option<i64>,
    pub timeout: Option<u64>,
    pub comparison: Comparison,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckRequest {
    pub host: String,
    pub port: u16,
    pub community: String,
    pub check: Check,
    pub timeout: Duration,
    pub comparison: Comparison,
}

impl CheckRequest {
    /// Validates raw options. Thresholds are ignored for `info`; `load` needs
    /// warning < critical and `timeleft` needs warning > critical.
    pub fn from_options(options: Options) -> Result<Self, UsageError> {
        let host = options
            .host
            .filter(|h| !h.is_empty())
            .ok_or(UsageError::MissingHost)?;
        let category: Category = options
            .category
            .ok_or(UsageError::MissingCategory)?
            .parse()?;

        let check = match category {
            Category::Info => Check::Info,
            Category::Load => match (options.warning, options.critical) {
                (Some(warning), Some(critical)) if warning < critical => {
                    Check::Load { warning, critical }
                }
                _ => return Err(UsageError::LoadThresholds),
            },
            Category::TimeLeft => match (options.warning, options.critical) {
                (Some(warning), Some(critical)) if warning > critical => {
                    Check::TimeLeft { warning, critical }
                }
                _ => return Err(UsageError::TimeLeftThresholds),
            },
        };

        Ok(CheckRequest {
            host,
            port: options.port.unwrap_or(DEFAULT_PORT),
            community: options
                .community
                .unwrap_or_else(|| DEFAULT_COMMUNITY.to_owned()),
            check,
            timeout: Duration::from_secs(options.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS)),
            comparison: options.comparison,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsageError {
    #[error("The host must be specified!")]
    MissingHost,
    #[error("Check type not found!")]
    MissingCategory,
    #[error("Check type \"{0}\" not found!")]
    UnknownCategory(String),
    #[error("Please specify the Warning and Critical thresholds!")]
    LoadThresholds,
    #[error("Please specify the correct remaining Warning and Critical minutes!")]
    TimeLeftThresholds,
}

impl UsageError {
    /// Full text printed for this error: the reason plus either the usage line
    /// or the list of check types.
    pub fn report(&self) -> String {
        match self {
            UsageError::MissingCategory | UsageError::UnknownCategory(_) => {
                let types: Vec<_> = Category::ALL.iter().map(Category::as_str).collect();
                format!(
                    "ERROR: {}\nCheck types: {}\n\tFor more info, run check_ups --help",
                    self,
                    types.join(", ")
                )
            }
            _ => format!("ERROR: {}\n\nUsage: {}\n", self, USAGE),
        }
    }

    /// Invalid input always ends the check as CRITICAL.
    pub fn state(&self) -> State {
        State::Critical
    }

    pub fn print_and_exit(&self) -> ! {
        println!("{}", self.report());
        std::process::exit(self.state().exit_code());
    }
}
