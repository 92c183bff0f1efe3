use clap::{ArgAction, Parser};
use log::LevelFilter;

use crate::request::{Comparison, Options, USAGE};

/// Checks a UPS over SNMP v2c using the standard UPS-MIB.
#[derive(Debug, Parser)]
#[command(name = "check_ups", version, about, override_usage = USAGE)]
pub struct Cli {
    /// Host address of the UPS
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Check type (info|load|timeleft)
    #[arg(short = 'T', long = "type")]
    pub check_type: Option<String>,

    /// SNMP community
    #[arg(short = 'C', long, default_value = "public")]
    pub community: String,

    /// Warning threshold
    #[arg(short = 'w', long, allow_negative_numbers = true)]
    pub warning: Option<i64>,

    /// Critical threshold
    #[arg(short = 'c', long, allow_negative_numbers = true)]
    pub critical: Option<i64>,

    /// Check timeout in seconds
    #[arg(short = 't', long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// SNMP port of the UPS
    #[arg(short = 'p', long, default_value_t = 161)]
    pub port: u16,

    /// Compare readings and thresholds as text, like old releases of this check
    #[arg(long)]
    pub lexical: bool,

    /// Report UNKNOWN instead of CRITICAL when the UPS cannot be queried
    #[arg(long)]
    pub unknown_on_error: bool,

    /// Log to stderr, repeat for more detail
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print an Icinga2 CheckCommand object for this check and exit
    #[arg(long, hide = true)]
    pub print_icinga_command: bool,
}

impl Cli {
    pub fn options(&self) -> Options {
        Options {
            host: self.host.clone(),
            port: Some(self.port),
            category: self.check_type.clone(),
            community: Some(self.community.clone()),
            warning: self.warning,
            critical: self.critical,
            timeout: Some(self.timeout),
            comparison: if self.lexical {
                Comparison::Lexical
            } else {
                Comparison::Numeric
            },
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}
