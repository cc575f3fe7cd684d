//! Single-line runner messages
//!
//! Every message starts with a one-character tag that fixes both the variant
//! and its field layout. Lines with an unknown tag are ignored, so a newer
//! worker can add tags without breaking an older coordinator.

use thiserror::Error;

use crate::results::{CounterOverflow, CounterSnapshot};

/// Tag of the counter delta message, `d<total>,<success>,<failure>,<error>`
pub const COUNTER_DELTA_TAG: char = 'd';

const COUNTER_DELTA_FIELDS: usize = 4;

/// Malformed message with a known tag
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Expected {expected} fields in '{line}', found {found}")]
    FieldCount {
        line: String,
        expected: usize,
        found: usize,
    },

    #[error("Field {index} of '{line}' is not a count: '{value}'")]
    InvalidField {
        line: String,
        index: usize,
        value: String,
    },

    #[error("Counter delta '{line}' rejected: {source}")]
    Overflow {
        line: String,
        source: CounterOverflow,
    },
}

/// Messages exchanged between workers and the coordinator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerMessage {
    /// A worker's final counters, to be added to the coordinator's
    CounterDelta(CounterSnapshot),
}

impl RunnerMessage {
    pub fn encode(&self) -> String {
        match self {
            RunnerMessage::CounterDelta(c) => format!(
                "{COUNTER_DELTA_TAG}{},{},{},{}",
                c.total, c.success, c.failure, c.error
            ),
        }
    }

    /// Decode one line
    ///
    /// Returns `Ok(None)` for empty lines and unknown tags. A known tag with a
    /// bad body is rejected as a whole.
    pub fn decode(line: &str) -> Result<Option<Self>, ProtocolError> {
        let line = line.trim_end_matches(|c: char| c == '\r' || c == '\n');
        let mut chars = line.chars();

        match chars.next() {
            Some(COUNTER_DELTA_TAG) => decode_counter_delta(line, chars.as_str()).map(Some),
            _ => Ok(None),
        }
    }
}

fn decode_counter_delta(line: &str, body: &str) -> Result<RunnerMessage, ProtocolError> {
    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() != COUNTER_DELTA_FIELDS {
        return Err(ProtocolError::FieldCount {
            line: line.to_string(),
            expected: COUNTER_DELTA_FIELDS,
            found: fields.len(),
        });
    }

    let mut values = [0u64; COUNTER_DELTA_FIELDS];
    for (index, (slot, field)) in values.iter_mut().zip(&fields).enumerate() {
        *slot = parse_count(field).ok_or_else(|| ProtocolError::InvalidField {
            line: line.to_string(),
            index,
            value: field.to_string(),
        })?;
    }

    let [total, success, failure, error] = values;
    Ok(RunnerMessage::CounterDelta(CounterSnapshot::new(
        total, success, failure, error,
    )))
}

/// Plain decimal digits only; `u64::from_str` would also take a leading `+`
fn parse_count(field: &str) -> Option<u64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_counter_delta() {
        let message = RunnerMessage::CounterDelta(CounterSnapshot::new(7, 5, 1, 1));
        assert_eq!(message.encode(), "d7,5,1,1");
    }

    #[test]
    fn test_decode_counter_delta() {
        assert_eq!(
            RunnerMessage::decode("d7,5,1,1").unwrap(),
            Some(RunnerMessage::CounterDelta(CounterSnapshot::new(7, 5, 1, 1)))
        );
        assert_eq!(
            RunnerMessage::decode("d0,0,0,0\n").unwrap(),
            Some(RunnerMessage::CounterDelta(CounterSnapshot::default()))
        );
    }

    #[test]
    fn test_non_numeric_field_is_rejected() {
        let err = RunnerMessage::decode("dx,1,1,1").unwrap_err();
        assert_eq!(
            err,
            ProtocolError::InvalidField {
                line: "dx,1,1,1".to_string(),
                index: 0,
                value: "x".to_string(),
            }
        );
        assert!(RunnerMessage::decode("d1,+1,1,1").is_err());
        assert!(RunnerMessage::decode("d1,,1,1").is_err());
        assert!(RunnerMessage::decode("d1,-1,1,1").is_err());
    }

    #[test]
    fn test_wrong_field_count_is_rejected() {
        assert!(matches!(
            RunnerMessage::decode("d1,1,1"),
            Err(ProtocolError::FieldCount { found: 3, .. })
        ));
        assert!(matches!(
            RunnerMessage::decode("d1,1,1,1,1"),
            Err(ProtocolError::FieldCount { found: 5, .. })
        ));
        assert!(matches!(
            RunnerMessage::decode("d"),
            Err(ProtocolError::FieldCount { found: 1, .. })
        ));
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        assert_eq!(RunnerMessage::decode("x1,2,3,4").unwrap(), None);
        assert_eq!(RunnerMessage::decode("").unwrap(), None);
        assert_eq!(RunnerMessage::decode("D1,1,1,1").unwrap(), None);
    }

    #[test]
    fn test_overflowing_count_is_rejected() {
        assert!(RunnerMessage::decode("d99999999999999999999,0,0,0").is_err());
    }
}
