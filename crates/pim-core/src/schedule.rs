//! One-time activation schedules.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::request::RequestLength;

/// Wire format for schedule timestamps: UTC with millisecond precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleKind {
  Once,
}

/// The window in which an activated role is effective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
  #[serde(rename = "type")]
  pub kind:            ScheduleKind,
  #[serde(with = "millis")]
  pub start_date_time: DateTime<Utc>,
  #[serde(with = "millis")]
  pub end_date_time:   DateTime<Utc>,
}

impl Schedule {
  /// A non-recurring window of `length` hours starting at `start`.
  ///
  /// `start` is truncated to whole milliseconds so the value sent on the wire
  /// is exactly the value held here.
  pub fn once(start: DateTime<Utc>, length: RequestLength) -> Self {
    let start =
      DateTime::from_timestamp_millis(start.timestamp_millis()).unwrap_or(start);
    Self {
      kind:            ScheduleKind::Once,
      start_date_time: start,
      end_date_time:   start + length.as_delta(),
    }
  }

  pub fn starting_now(length: RequestLength) -> Self {
    Self::once(Utc::now(), length)
  }

  pub fn duration(&self) -> TimeDelta { self.end_date_time - self.start_date_time }
}

mod millis {
  use chrono::{DateTime, Utc};
  use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

  use super::TIMESTAMP_FORMAT;

  pub fn serialize<S: Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
  ) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
  }

  pub fn deserialize<'de, D: Deserializer<'de>>(
    deserializer: D,
  ) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
      .map(|dt| dt.with_timezone(&Utc))
      .map_err(D::Error::custom)
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use serde_json::json;

  use super::*;

  fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 15).unwrap()
      + TimeDelta::microseconds(123_456)
  }

  #[test]
  fn end_is_start_plus_requested_hours() {
    let schedule = Schedule::once(start(), RequestLength::new(3).unwrap());
    assert_eq!(schedule.kind, ScheduleKind::Once);
    assert_eq!(schedule.duration(), TimeDelta::hours(3));
  }

  #[test]
  fn start_is_truncated_to_milliseconds() {
    let schedule = Schedule::once(start(), RequestLength::default());
    assert_eq!(schedule.start_date_time.timestamp_subsec_micros(), 123_000);
  }

  #[test]
  fn crosses_midnight() {
    let late = Utc.with_ymd_and_hms(2024, 12, 31, 22, 0, 0).unwrap();
    let schedule = Schedule::once(late, RequestLength::default());
    assert_eq!(
      schedule.end_date_time,
      Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap()
    );
  }

  #[test]
  fn wire_format() {
    let schedule = Schedule::once(start(), RequestLength::new(2).unwrap());
    assert_eq!(
      serde_json::to_value(&schedule).unwrap(),
      json!({
        "type": "Once",
        "startDateTime": "2024-03-01T09:30:15.123Z",
        "endDateTime": "2024-03-01T11:30:15.123Z",
      })
    );
  }

  #[test]
  fn parses_service_timestamps() {
    let schedule: Schedule = serde_json::from_value(json!({
      "type": "Once",
      "startDateTime": "2024-03-01T09:30:15Z",
      "endDateTime": "2024-03-01T17:30:15.5Z",
    }))
    .unwrap();
    assert_eq!(schedule.duration(), TimeDelta::hours(8) + TimeDelta::milliseconds(500));
  }
}
