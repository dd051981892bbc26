//! Dose times.
//!
//! A [`DoseTime`] is a wall-clock time of day in strict `HH:MM` 24-hour form. It carries no date:
//! every slot recurs daily.

use chrono::{NaiveTime, Timelike};
use std::{fmt, str::FromStr};

use crate::{MedicationError, MedicationResult};

/// A scheduled time of day for one dose slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoseTime(NaiveTime);

impl DoseTime {
    /// Parses a strict `HH:MM` string.
    ///
    /// Both fields must be exactly two digits; hours run `00..=23` and minutes `00..=59`.
    ///
    /// # Errors
    ///
    /// Returns [`MedicationError::InvalidInput`] for anything else, including blank input.
    pub fn parse(input: &str) -> MedicationResult<Self> {
        let invalid = || {
            MedicationError::InvalidInput(format!(
                "dose time must be HH:MM (24-hour), got: '{}'",
                input
            ))
        };

        let bytes = input.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }

        let hour = u32::from((digits[0] - b'0') * 10 + (digits[1] - b'0'));
        let minute = u32::from((digits[2] - b'0') * 10 + (digits[3] - b'0'));

        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(invalid)
    }

    /// Builds a dose time from numeric parts.
    pub fn from_hm(hour: u32, minute: u32) -> MedicationResult<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0)
            .map(Self)
            .ok_or_else(|| {
                MedicationError::InvalidInput(format!(
                    "dose time out of range: {}:{}",
                    hour, minute
                ))
            })
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    /// A slot counts as due once the current hour has reached the slot's hour.
    pub fn is_due_at(&self, now: NaiveTime) -> bool {
        now.hour() >= self.0.hour()
    }
}

impl fmt::Display for DoseTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0.hour(), self.0.minute())
    }
}

impl FromStr for DoseTime {
    type Err = MedicationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl serde::Serialize for DoseTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for DoseTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        DoseTime::parse(&s).map_err(serde::de::Error::custom)
    }
}
