use std::fmt::Display;

use crate::{Resource, State};

/// Turns the outcome of a check into exactly one output line and one exit code.
///
/// Errors end the check as CRITICAL unless a different handler is installed with
/// [Runner::on_error].
pub struct Runner<E> {
    name: Option<String>,
    on_error: Option<Box<dyn FnOnce(&E) -> State>>,
}

impl<E: Display> Runner<E> {
    pub fn new() -> Self {
        Self {
            name: None,
            on_error: None,
        }
    }

    /// Prefix error lines with `name`, like [Resource::set_name] does for results.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    pub fn on_error(mut self, f: impl FnOnce(&E) -> State + 'static) -> Self {
        self.on_error = Some(Box::new(f));
        self
    }

    /// This will run either the default `on_error` handler or the one specified by calling
    /// [Runner::on_error] and keep the resulting state alongside the error.
    pub fn safe_run(self, f: impl FnOnce() -> Result<Resource, E>) -> RunnerResult<E> {
        match f() {
            Ok(resource) => RunnerResult::Ok(resource),
            Err(err) => {
                let state = self
                    .on_error
                    .map(|f| f(&err))
                    .unwrap_or(State::Critical);
                log::info!("check failed with {}: {}", state, err);

                RunnerResult::Err {
                    name: self.name,
                    state,
                    error: err,
                }
            }
        }
    }
}

impl<E: Display> Default for Runner<E> {
    fn default() -> Self {
        Self::new()
    }
}

pub enum RunnerResult<E> {
    Ok(Resource),
    Err {
        name: Option<String>,
        state: State,
        error: E,
    },
}

impl<E: Display> RunnerResult<E> {
    pub fn to_nagios_string(&self) -> String {
        match self {
            RunnerResult::Ok(resource) => resource.to_nagios_string(),
            RunnerResult::Err { name, state, error } => match name {
                Some(name) => format!("{} {}: {}", name, state, error),
                None => format!("{}: {}", state, error),
            },
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            RunnerResult::Ok(resource) => resource.exit_code(),
            RunnerResult::Err { state, .. } => state.exit_code(),
        }
    }

    pub fn print_and_exit(self) -> ! {
        println!("{}", self.to_nagios_string());
        std::process::exit(self.exit_code());
    }
}
