//! check_ups queries a UPS over SNMP v2c (standard UPS-MIB) and reports its state the way
//! nagios/icinga expects: one line on standard output and the service state as exit code.
//!
//! The library holds everything worth testing. The binary in `main.rs` only wires the command
//! line, the SNMP transport and the [runner::Runner] together.

use std::cmp::Ordering;
use std::fmt;
use std::process;

#[macro_use]
mod macros;

pub mod check;
pub mod cli;
pub mod config_generator;
pub mod mib;
pub mod request;
pub mod runner;
pub mod snmp;

pub use crate::check::{evaluate, CheckError};
pub use crate::request::{Category, CheckRequest, Comparison, UsageError};
pub use crate::runner::{Runner, RunnerResult};
pub use crate::snmp::{QueryAdapter, QueryError, SnmpQuery};

/// A Resource is the result of one check, the single service nagios sees.
/// If you init it without a state it will determine one from the given metrics.
///
/// ```rust
/// # #[macro_use]
/// # extern crate check_ups;
/// # use check_ups::{ThresholdMetric, TriggerIfValue};
/// # fn main() {
/// let load = ThresholdMetric::new("OutputLoad", 75, 70, 90, TriggerIfValue::Greater);
/// let mut resource = resource![load];
/// resource.set_name("UPS");
/// resource.set_description("The output load is 75%");
/// assert_eq!(
///     &resource.to_nagios_string(),
///     "UPS WARNING: The output load is 75% | OutputLoad=75;70;90"
/// );
/// # }
/// ```
pub struct Resource {
    state: Option<State>,
    metrics: Vec<Box<dyn ResourceMetric>>,
    description: Option<String>,
    name: Option<String>,
    plain: bool,
}

impl Resource {
    /// If state is set to Some(State) then it will always use this instead of determining it from
    /// the given metrics.
    pub fn new(state: Option<State>, description: Option<&str>) -> Resource {
        Resource {
            state,
            metrics: Vec::new(),
            description: description.map(|d| d.to_owned()),
            name: None,
            plain: false,
        }
    }

    /// Pushes a single ResourceMetric into the resource.
    pub fn push<M>(&mut self, metric: M)
    where
        M: 'static + ResourceMetric,
    {
        self.metrics.push(Box::new(metric))
    }

    /// Returns a slice of the pushed metrics.
    pub fn metrics(&self) -> &[Box<dyn ResourceMetric>] {
        &self.metrics
    }

    /// Manually set the state for this resource. This disables the automatic state determination
    /// based on the included metrics of this resource.
    pub fn set_state(&mut self, state: State) {
        self.state = Some(state)
    }

    /// Set the name of this resource. Will be included in the final string output.
    pub fn set_name(&mut self, name: &str) {
        self.name = Some(name.to_owned())
    }

    /// Only print the description, without name, state or perfdata.
    pub fn set_plain(&mut self, plain: bool) {
        self.plain = plain
    }

    /// Returns a string which nagios understands to determine the service state.
    ///
    /// If state has been set manually it will always use the manually set state.
    pub fn to_nagios_string(&self) -> String {
        if self.plain {
            return self.description.clone().unwrap_or_default();
        }

        let mut s = String::new();

        if let Some(ref name) = self.name {
            s.push_str(&format!("{} ", name))
        }

        s.push_str(&self.get_state().to_string());

        if let Some(ref description) = self.description {
            s.push_str(&format!(": {}", description));
        }

        if !self.metrics.is_empty() {
            s.push_str(" |");

            for metric in self.metrics.iter() {
                s.push_str(&format!(" {}", metric.perf_string()));
            }
        }

        s
    }

    /// Will determine a State by the given metrics, the worst one wins.
    ///
    /// In case a state is manually set for this resource,
    /// it will return the manually set state instead.
    pub fn get_state(&self) -> State {
        if let Some(st) = self.state {
            return st;
        }

        let mut state = State::Unknown;
        for metric in self.metrics.iter() {
            if let Some(st) = metric.state() {
                if state < st {
                    state = st;
                }
            }
        }
        state
    }

    /// Get the description of this resource.
    pub fn get_description(&self) -> Option<&String> {
        self.description.as_ref()
    }

    /// Set the description of this resource.
    pub fn set_description(&mut self, description: &str) {
        self.description = Some(description.to_owned());
    }

    /// Will return the exit code of the determined state via Self::get_state.
    pub fn exit_code(&self) -> i32 {
        self.get_state().exit_code()
    }

    /// Will print Self::to_nagios_string and exit with the exit code from Self::exit_code
    pub fn print_and_exit(&self) -> ! {
        println!("{}", self.to_nagios_string());
        process::exit(self.exit_code());
    }
}

impl Default for Resource {
    fn default() -> Self {
        Resource::new(None, None)
    }
}

/// Object safe view of a [Metric], so resources can hold metrics of different value types.
pub trait ResourceMetric {
    fn perf_string(&self) -> String;
    fn name(&self) -> &str;
    fn state(&self) -> Option<State>;
}

impl<T, O> ResourceMetric for T
where
    O: ToPerfString,
    T: Metric<Output = O> + ToPerfString,
{
    fn perf_string(&self) -> String {
        self.to_perf_string()
    }

    fn name(&self) -> &str {
        Metric::name(self)
    }

    fn state(&self) -> Option<State> {
        Metric::state(self)
    }
}

/// Represents a service state from nagios. The exit codes are fixed by the plugin API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl State {
    /// Returns the corresponding nagios exit code to signal the service state of self.
    pub fn exit_code(&self) -> i32 {
        match self {
            State::Ok => 0,
            State::Warning => 1,
            State::Critical => 2,
            State::Unknown => 3,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            State::Ok => "OK",
            State::Warning => "WARNING",
            State::Critical => "CRITICAL",
            State::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &State) -> Option<Ordering> {
        let f = |state: &State| match state {
            State::Unknown => 0,
            State::Ok => 1,
            State::Warning => 2,
            State::Critical => 3,
        };

        f(self).partial_cmp(&f(other))
    }
}

/// The purpose of ToPerfString is only so one can define custom representations of custom types
/// without using the ToString trait so we don't interfere with that.
///
/// Also used internally for generation of the final output.
pub trait ToPerfString {
    fn to_perf_string(&self) -> String;
}

impl_to_perf_string_on_to_string!(u8, u16, u32, u64);
impl_to_perf_string_on_to_string!(i8, i16, i32, i64);
impl_to_perf_string_on_to_string!(String);

impl<'a> ToPerfString for &'a str {
    fn to_perf_string(&self) -> String {
        self.to_string()
    }
}

impl<T, O> ToPerfString for T
where
    O: ToPerfString,
    T: Metric<Output = O>,
{
    fn to_perf_string(&self) -> String {
        // replace `=`
        let name = self.name().replace('=', "_");

        // quote `'`
        let name = name.replace('\'', "''");

        // quote if contains spaces
        let name = if name.contains(' ') {
            format!("'{}'", name)
        } else {
            name
        };

        metric_string!(name, self.value(), self.warning(), self.critical())
    }
}

impl<T> ToPerfString for Option<T>
where
    T: ToPerfString,
{
    fn to_perf_string(&self) -> String {
        match self {
            Some(ref s) => s.to_perf_string(),
            None => String::new(),
        }
    }
}

/// Direction in which a value becomes alarming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerIfValue {
    /// Alarm once the value reaches the threshold from below (e.g. output load).
    Greater,
    /// Alarm once the value falls to the threshold (e.g. battery minutes left).
    Less,
}

/// Anything that can be rendered as a perfdata token. Calls to the functions should return
/// immediately and not query the device every time.
pub trait Metric {
    type Output: ToPerfString;

    fn name(&self) -> &str;
    fn state(&self) -> Option<State>;
    fn value(&self) -> Self::Output;
    fn warning(&self) -> Option<Self::Output>;
    fn critical(&self) -> Option<Self::Output>;
}

/// A ThresholdMetric calculates its State from the value and the warning and critical
/// thresholds. Both thresholds are inclusive.
///
/// The comparison is whatever `PartialOrd` of `T` does: integers compare numerically,
/// strings compare byte by byte.
///
/// ```rust
/// # use check_ups::{Metric, State, ThresholdMetric, TriggerIfValue};
/// let metric = ThresholdMetric::new("TimeLeft", 10, 30, 10, TriggerIfValue::Less);
/// assert_eq!(metric.state(), Some(State::Critical));
/// assert_eq!(metric.value(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct ThresholdMetric<T>
where
    T: PartialOrd + ToPerfString + Clone,
{
    name: String,
    value: T,
    warning: T,
    critical: T,
    trigger: TriggerIfValue,
}

impl<T> ThresholdMetric<T>
where
    T: PartialOrd + ToPerfString + Clone,
{
    pub fn new(name: &str, value: T, warning: T, critical: T, trigger: TriggerIfValue) -> Self {
        ThresholdMetric {
            name: name.to_owned(),
            value,
            warning,
            critical,
            trigger,
        }
    }

    fn reached(&self, threshold: &T) -> bool {
        match self.trigger {
            TriggerIfValue::Greater => &self.value >= threshold,
            TriggerIfValue::Less => &self.value <= threshold,
        }
    }
}

impl<T> Metric for ThresholdMetric<T>
where
    T: PartialOrd + ToPerfString + Clone,
{
    type Output = T;

    fn name(&self) -> &str {
        &self.name
    }

    fn state(&self) -> Option<State> {
        if self.reached(&self.critical) {
            Some(State::Critical)
        } else if self.reached(&self.warning) {
            Some(State::Warning)
        } else {
            Some(State::Ok)
        }
    }

    fn value(&self) -> <Self as Metric>::Output {
        self.value.clone()
    }

    fn warning(&self) -> Option<<Self as Metric>::Output> {
        Some(self.warning.clone())
    }

    fn critical(&self) -> Option<<Self as Metric>::Output> {
        Some(self.critical.clone())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Metric, Resource, State, ThresholdMetric, ToPerfString, TriggerIfValue};

    #[test]
    fn test_threshold_metric_greater() {
        let cases = [
            (50, State::Ok),
            (69, State::Ok),
            (70, State::Warning),
            (75, State::Warning),
            (90, State::Critical),
            (95, State::Critical),
        ];
        for (value, expected) in cases {
            let metric = ThresholdMetric::new("load", value, 70, 90, TriggerIfValue::Greater);
            assert_eq!(metric.state(), Some(expected), "value {}", value);
            assert_eq!(metric.value(), value);
            assert_eq!(metric.warning(), Some(70));
            assert_eq!(metric.critical(), Some(90));
        }
    }

    #[test]
    fn test_threshold_metric_less() {
        let cases = [
            (45, State::Ok),
            (31, State::Ok),
            (30, State::Warning),
            (20, State::Warning),
            (10, State::Critical),
            (5, State::Critical),
        ];
        for (value, expected) in cases {
            let metric = ThresholdMetric::new("left", value, 30, 10, TriggerIfValue::Less);
            assert_eq!(metric.state(), Some(expected), "value {}", value);
        }
    }

    #[test]
    fn test_threshold_metric_strings_compare_lexically() {
        // "9" sorts after "10"
        let metric = ThresholdMetric::new(
            "load",
            "9".to_owned(),
            "10".to_owned(),
            "20".to_owned(),
            TriggerIfValue::Greater,
        );
        assert_eq!(metric.state(), Some(State::Critical));
        assert_eq!(&metric.to_perf_string(), "load=9;10;20");
    }

    #[test]
    fn test_perf_string_labels() {
        let test_data = [
            ("test", "test=1;2;3"),
            ("test=a", "test_a=1;2;3"),
            ("te'st", "te''st=1;2;3"),
            ("te st", "'te st'=1;2;3"),
        ];
        for (label, expected) in &test_data {
            let metric = ThresholdMetric::new(label, 1, 2, 3, TriggerIfValue::Greater);
            assert_eq!(&metric.to_perf_string(), expected);
        }
    }

    #[test]
    fn test_resource() {
        let metric = ThresholdMetric::new("OutputLoad", 95, 70, 90, TriggerIfValue::Greater);
        let mut resource = resource![metric];
        assert_eq!(resource.get_state(), State::Critical);
        assert_eq!(&resource.to_nagios_string(), "CRITICAL | OutputLoad=95;70;90");

        resource.set_name("UPS");
        resource.set_description("The output load is 95%");
        assert_eq!(
            &resource.to_nagios_string(),
            "UPS CRITICAL: The output load is 95% | OutputLoad=95;70;90"
        );
        assert_eq!(resource.exit_code(), 2);
    }

    #[test]
    fn test_resource_manual_state_wins() {
        let metric = ThresholdMetric::new("OutputLoad", 95, 70, 90, TriggerIfValue::Greater);
        let mut resource = resource![metric];
        resource.set_state(State::Ok);
        assert_eq!(resource.get_state(), State::Ok);
    }

    #[test]
    fn test_resource_without_metrics_is_unknown() {
        let resource = Resource::default();
        assert_eq!(resource.get_state(), State::Unknown);
        assert_eq!(&resource.to_nagios_string(), "UNKNOWN");
    }

    #[test]
    fn test_plain_resource() {
        let mut resource = Resource::new(Some(State::Ok), Some("Model: APC Smart-UPS 1500"));
        resource.set_name("UPS");
        resource.set_plain(true);
        assert_eq!(&resource.to_nagios_string(), "Model: APC Smart-UPS 1500");
        assert_eq!(resource.exit_code(), 0);
        assert_eq!(resource.get_description().map(String::as_str), Some("Model: APC Smart-UPS 1500"));
    }

    #[test]
    fn test_state() {
        assert_eq!(State::Ok.exit_code(), 0);
        assert_eq!(State::Warning.exit_code(), 1);
        assert_eq!(State::Critical.exit_code(), 2);
        assert_eq!(State::Unknown.exit_code(), 3);

        assert_eq!(&State::Ok.to_string(), "OK");
        assert_eq!(&State::Warning.to_string(), "WARNING");
        assert_eq!(&State::Critical.to_string(), "CRITICAL");
        assert_eq!(&State::Unknown.to_string(), "UNKNOWN");

        assert!(State::Unknown < State::Ok);
        assert!(State::Warning < State::Critical);
    }
}
