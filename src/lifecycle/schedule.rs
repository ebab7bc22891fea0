//! Local wall-clock input to canonical schedule instants.
//!
//! The conversion always uses the acting client's timezone, never the
//! brand's stored one.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Serialize, Serializer};

use crate::errors::TransitionError;

const LOCAL_INPUT_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Timezone of the operator issuing a schedule.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientTimezone {
    /// The machine's local zone. The label comes from the OS unless
    /// overridden in config.
    System { label_override: Option<String> },
    /// A fixed offset with an explicit label.
    Fixed { label: String, offset: FixedOffset },
}

impl Default for ClientTimezone {
    fn default() -> Self {
        ClientTimezone::System {
            label_override: None,
        }
    }
}

impl ClientTimezone {
    /// IANA-style label sent alongside the instant.
    pub fn label(&self) -> String {
        match self {
            ClientTimezone::System { label_override } => match label_override {
                Some(label) => label.clone(),
                None => iana_time_zone::get_timezone().unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "could not resolve system timezone name; using UTC");
                    "UTC".to_string()
                }),
            },
            ClientTimezone::Fixed { label, .. } => label.clone(),
        }
    }

    /// Convert a local wall-clock time to UTC.
    ///
    /// Ambiguous times (DST fall-back) resolve to the earlier instant;
    /// times skipped by a DST jump are rejected.
    pub fn to_utc(&self, naive: NaiveDateTime, input: &str) -> Result<DateTime<Utc>, TransitionError> {
        let resolved = match self {
            ClientTimezone::System { .. } => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
            ClientTimezone::Fixed { offset, .. } => offset
                .from_local_datetime(&naive)
                .earliest()
                .map(|dt| dt.with_timezone(&Utc)),
        };
        resolved.ok_or_else(|| TransitionError::NonexistentLocalTime {
            input: input.to_string(),
            timezone: self.label(),
        })
    }
}

/// Parse operator input such as `2024-06-01T10:00`.
pub fn parse_local_input(input: &str) -> Result<NaiveDateTime, TransitionError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(TransitionError::MissingTime);
    }
    LOCAL_INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| TransitionError::InvalidTime {
            input: trimmed.to_string(),
        })
}

/// Body of the schedule transition request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleRequest {
    #[serde(serialize_with = "utc_millis")]
    pub scheduled_for: DateTime<Utc>,
    pub scheduled_timezone: String,
}

fn utc_millis<S: Serializer>(instant: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Build the schedule request for `input` as typed by the operator.
pub fn resolve_schedule(
    timezone: &ClientTimezone,
    input: Option<&str>,
) -> Result<ScheduleRequest, TransitionError> {
    let input = input.ok_or(TransitionError::MissingTime)?;
    let naive = parse_local_input(input)?;
    Ok(ScheduleRequest {
        scheduled_for: timezone.to_utc(naive, input.trim())?,
        scheduled_timezone: timezone.label(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plus_two() -> ClientTimezone {
        ClientTimezone::Fixed {
            label: "Europe/Berlin".into(),
            offset: FixedOffset::east_opt(2 * 3600).unwrap(),
        }
    }

    #[test]
    fn test_converts_with_client_offset() {
        let request = resolve_schedule(&plus_two(), Some("2024-06-01T10:00")).unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "scheduled_for": "2024-06-01T08:00:00.000Z",
                "scheduled_timezone": "Europe/Berlin"
            })
        );
    }

    #[test]
    fn test_accepts_seconds_and_space_separator() {
        let tz = plus_two();
        let a = resolve_schedule(&tz, Some("2024-06-01T10:00:30")).unwrap();
        let b = resolve_schedule(&tz, Some("2024-06-01 10:00")).unwrap();
        assert_eq!(a.scheduled_for.to_rfc3339(), "2024-06-01T08:00:30+00:00");
        assert_eq!(b.scheduled_for.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }

    #[test]
    fn test_missing_and_blank_input() {
        assert!(matches!(
            resolve_schedule(&plus_two(), None),
            Err(TransitionError::MissingTime)
        ));
        assert!(matches!(
            resolve_schedule(&plus_two(), Some("   ")),
            Err(TransitionError::MissingTime)
        ));
    }

    #[test]
    fn test_unparsable_input() {
        let err = resolve_schedule(&plus_two(), Some("tomorrow at ten")).unwrap_err();
        assert!(matches!(err, TransitionError::InvalidTime { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_system_label_override_wins() {
        let tz = ClientTimezone::System {
            label_override: Some("Asia/Kolkata".into()),
        };
        assert_eq!(tz.label(), "Asia/Kolkata");
    }
}
