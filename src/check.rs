use log::{debug, info};

use crate::mib;
use crate::request::{Check, CheckRequest, Comparison};
use crate::snmp::{QueryAdapter, QueryError};
use crate::{Resource, State, ThresholdMetric, TriggerIfValue};

/// Name printed in front of every state line.
pub const RESOURCE_NAME: &str = "UPS";

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error("{object} returned {value:?}, which is not an integer")]
    NotNumeric { object: &'static str, value: String },
}

/// Runs the single check described by `request` against `adapter`.
pub fn evaluate<Q>(request: &CheckRequest, adapter: &mut Q) -> Result<Resource, CheckError>
where
    Q: QueryAdapter + ?Sized,
{
    info!("running {} check against {}", request.check.category(), request.host);

    match request.check {
        Check::Info => {
            let manufacturer = adapter.query(mib::UPS_IDENT_MANUFACTURER)?;
            let model = adapter.query(mib::UPS_IDENT_MODEL)?;

            let mut resource = Resource::new(
                Some(State::Ok),
                Some(&format!("Model: {} {}", manufacturer, model)),
            );
            resource.set_plain(true);
            Ok(resource)
        }
        Check::Load { warning, critical } => {
            let load = adapter.query(mib::UPS_OUTPUT_PERCENT_LOAD)?;
            let mut resource = threshold_resource(
                "OutputLoad",
                &load,
                warning,
                critical,
                TriggerIfValue::Greater,
                request.comparison,
            )?;
            resource.set_description(&format!("The output load is {}%", load));
            Ok(resource)
        }
        Check::TimeLeft { warning, critical } => {
            let minutes = adapter.query(mib::UPS_ESTIMATED_MINUTES_REMAINING)?;
            let mut resource = threshold_resource(
                "TimeLeft",
                &minutes,
                warning,
                critical,
                TriggerIfValue::Less,
                request.comparison,
            )?;
            resource.set_description(&format!("Battery has {} minutes remaining", minutes));
            Ok(resource)
        }
    }
}

fn threshold_resource(
    label: &'static str,
    reading: &str,
    warning: i64,
    critical: i64,
    trigger: TriggerIfValue,
    comparison: Comparison,
) -> Result<Resource, CheckError> {
    let mut resource = match comparison {
        Comparison::Numeric => {
            let value: i64 = reading
                .trim()
                .parse()
                .map_err(|_| CheckError::NotNumeric {
                    object: label,
                    value: reading.to_owned(),
                })?;
            resource![ThresholdMetric::new(label, value, warning, critical, trigger)]
        }
        Comparison::Lexical => resource![ThresholdMetric::new(
            label,
            reading.to_owned(),
            warning.to_string(),
            critical.to_string(),
            trigger
        )],
    };
    resource.set_name(RESOURCE_NAME);

    debug!(
        "{}={} warning={} critical={} ({:?} comparison) -> {}",
        label,
        reading,
        warning,
        critical,
        comparison,
        resource.get_state()
    );
    Ok(resource)
}
