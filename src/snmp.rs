use std::error::Error as _;
use std::io;

use log::{debug, trace};
use snmp2::{Oid, SyncSession, Value};

use crate::CheckRequest;

/// Resolves one numeric object identifier to the textual value the device holds for it.
///
/// The check logic only sees this trait, so it can run against a fake device.
pub trait QueryAdapter {
    fn query(&mut self, oid: &str) -> Result<String, QueryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("Timeout")]
    Timeout,
    #[error("{0}")]
    Session(io::Error),
    #[error("{0}")]
    Snmp(snmp2::Error),
    #[error("agent returned error status {status} for {oid}")]
    Agent { oid: String, status: u32 },
    #[error("no such object: {0}")]
    NoSuchObject(String),
    #[error("invalid OID: {0}")]
    InvalidOid(String),
}

fn is_timeout(e: &io::Error) -> bool {
    matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut)
}

impl From<io::Error> for QueryError {
    fn from(e: io::Error) -> Self {
        if is_timeout(&e) {
            QueryError::Timeout
        } else {
            QueryError::Session(e)
        }
    }
}

impl From<snmp2::Error> for QueryError {
    fn from(e: snmp2::Error) -> Self {
        let timed_out = e
            .source()
            .and_then(|source| source.downcast_ref::<io::Error>())
            .map_or(false, is_timeout);
        if timed_out {
            QueryError::Timeout
        } else {
            QueryError::Snmp(e)
        }
    }
}

pub fn parse_oid(s: &str) -> Result<Oid<'static>, QueryError> {
    let parts: Vec<u64> = s
        .trim()
        .split('.')
        .filter(|p| !p.is_empty())
        .map(|p| p.parse::<u64>())
        .collect::<Result<_, _>>()
        .map_err(|_| QueryError::InvalidOid(s.to_owned()))?;

    Oid::from(&parts).map_err(|_| QueryError::InvalidOid(s.to_owned()))
}

/// SNMP v2c transport: numeric OIDs, one request per query, no retries.
pub struct SnmpQuery {
    session: SyncSession,
}

impl SnmpQuery {
    pub fn connect(request: &CheckRequest) -> Result<Self, QueryError> {
        debug!(
            "opening SNMPv2c session to {}:{} (timeout {:?})",
            request.host, request.port, request.timeout
        );
        let starting_req_id = 0;
        let session = SyncSession::new_v2c(
            (request.host.as_str(), request.port),
            request.community.as_bytes(),
            Some(request.timeout),
            starting_req_id,
        )?;

        Ok(Self { session })
    }
}

impl QueryAdapter for SnmpQuery {
    /// Returns the first instance below `oid`, the way a walk of a scalar or a
    /// single-row column would.
    fn query(&mut self, oid: &str) -> Result<String, QueryError> {
        let base = parse_oid(oid)?;
        let pdu = self.session.getnext(&base)?;
        let text = first_in_subtree(&base, oid, pdu.error_status, pdu.varbinds)?;
        trace!("{} = {:?}", oid, text);
        Ok(text)
    }
}

/// Picks the value of a GETNEXT reply for `base`. The first varbind must lie below `base`
/// and carry a real value, anything else means the device does not have the object.
fn first_in_subtree<'a, I>(
    base: &Oid<'_>,
    oid: &str,
    error_status: u32,
    mut varbinds: I,
) -> Result<String, QueryError>
where
    I: Iterator<Item = (Oid<'a>, Value<'a>)>,
{
    if error_status != 0 {
        return Err(QueryError::Agent {
            oid: oid.to_owned(),
            status: error_status,
        });
    }

    let (name, value) = varbinds
        .next()
        .ok_or_else(|| QueryError::NoSuchObject(oid.to_owned()))?;

    if !name.starts_with(base) {
        return Err(QueryError::NoSuchObject(oid.to_owned()));
    }

    render_value(&value).ok_or_else(|| QueryError::NoSuchObject(oid.to_owned()))
}

/// Text form of a value, None for the "nothing here" exceptions.
fn render_value(value: &Value<'_>) -> Option<String> {
    let text = match value {
        Value::OctetString(bytes) => String::from_utf8_lossy(bytes)
            .trim_end_matches('\0')
            .to_owned(),
        Value::Integer(v) => v.to_string(),
        Value::Counter32(v) | Value::Unsigned32(v) | Value::Timeticks(v) => v.to_string(),
        Value::Counter64(v) => v.to_string(),
        Value::EndOfMibView | Value::NoSuchObject | Value::NoSuchInstance | Value::Null => {
            return None
        }
        other => format!("{:?}", other),
    };
    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_oid() {
        let oid = parse_oid("1.3.6.1.2.1.33.1.2.3").unwrap();
        let prefix = parse_oid(".1.3.6.1.2.1.33").unwrap();
        assert!(oid.starts_with(&prefix));

        assert!(matches!(parse_oid("1.3.six"), Err(QueryError::InvalidOid(_))));
    }

    #[test]
    fn test_render_value() {
        assert_eq!(render_value(&Value::Integer(42)).as_deref(), Some("42"));
        assert_eq!(render_value(&Value::Unsigned32(7)).as_deref(), Some("7"));
        assert_eq!(
            render_value(&Value::OctetString(b"Smart-UPS 1500\0")).as_deref(),
            Some("Smart-UPS 1500")
        );
        assert_eq!(render_value(&Value::NoSuchInstance), None);
        assert_eq!(render_value(&Value::EndOfMibView), None);
    }

    const MODEL: &str = "1.3.6.1.2.1.33.1.1.2";

    #[test]
    fn test_first_in_subtree() {
        let base = parse_oid(MODEL).unwrap();
        let instance = parse_oid("1.3.6.1.2.1.33.1.1.2.0").unwrap();
        let replies = vec![(instance, Value::OctetString(b"Smart-UPS 1500"))];

        let text = first_in_subtree(&base, MODEL, 0, replies.into_iter()).unwrap();
        assert_eq!(text, "Smart-UPS 1500");
    }

    #[test]
    fn test_first_in_subtree_outside_base() {
        let base = parse_oid(MODEL).unwrap();
        let next_object = parse_oid("1.3.6.1.2.1.33.1.1.3.0").unwrap();
        let replies = vec![(next_object, Value::OctetString(b"1.0"))];

        let err = first_in_subtree(&base, MODEL, 0, replies.into_iter()).err().unwrap();
        assert!(matches!(err, QueryError::NoSuchObject(ref o) if o == MODEL));
    }

    #[test]
    fn test_first_in_subtree_empty_reply() {
        let base = parse_oid(MODEL).unwrap();
        let err = first_in_subtree(&base, MODEL, 0, std::iter::empty()).err().unwrap();
        assert!(matches!(err, QueryError::NoSuchObject(_)));
    }

    #[test]
    fn test_first_in_subtree_exception_value() {
        let base = parse_oid(MODEL).unwrap();
        let instance = parse_oid("1.3.6.1.2.1.33.1.1.2.0").unwrap();
        let replies = vec![(instance, Value::NoSuchInstance)];

        let err = first_in_subtree(&base, MODEL, 0, replies.into_iter()).err().unwrap();
        assert!(matches!(err, QueryError::NoSuchObject(_)));
    }

    #[test]
    fn test_first_in_subtree_error_status() {
        let base = parse_oid(MODEL).unwrap();
        let instance = parse_oid("1.3.6.1.2.1.33.1.1.2.0").unwrap();
        let replies = vec![(instance, Value::OctetString(b"Smart-UPS 1500"))];

        let err = first_in_subtree(&base, MODEL, 2, replies.into_iter()).err().unwrap();
        assert!(matches!(err, QueryError::Agent { status: 2, .. }));
        assert_eq!(
            err.to_string(),
            "agent returned error status 2 for 1.3.6.1.2.1.33.1.1.2"
        );
    }

    #[test]
    fn test_timeouts_read_timeout() {
        for kind in [io::ErrorKind::WouldBlock, io::ErrorKind::TimedOut] {
            let err = QueryError::from(io::Error::new(kind, "Resource temporarily unavailable"));
            assert!(matches!(err, QueryError::Timeout));
            assert_eq!(err.to_string(), "Timeout");
        }

        let err = QueryError::from(io::Error::new(io::ErrorKind::ConnectionRefused, "Connection refused"));
        assert!(matches!(err, QueryError::Session(_)));
        assert_eq!(err.to_string(), "Connection refused");
    }

    #[test]
    fn test_error_messages() {
        let err = QueryError::NoSuchObject("1.3.6.1.2.1.33.1.2.3".to_owned());
        assert_eq!(err.to_string(), "no such object: 1.3.6.1.2.1.33.1.2.3");
    }
}
