// Probe wait interval
//
// Stored with millisecond precision and rendered as a compact unit string
// ("5m", "1h30m", "250ms") so the persisted form round-trips exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::domain::error::DomainError;

const MS_PER_SECOND: u64 = 1000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Wait interval of one downtime cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProbeDuration(Duration);

impl ProbeDuration {
    pub fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    pub fn as_duration(&self) -> Duration {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl FromStr for ProbeDuration {
    type Err = DomainError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidDuration {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let s = input.trim();
        if s.is_empty() {
            return Err(invalid("empty"));
        }

        let mut total_ms: u64 = 0;
        let mut rest = s;
        while !rest.is_empty() {
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(|| invalid("missing unit"))?;
            if digits_end == 0 {
                return Err(invalid("expected a number"));
            }
            let value: u64 = rest[..digits_end]
                .parse()
                .map_err(|_| invalid("number out of range"))?;
            rest = &rest[digits_end..];

            let unit_end = rest
                .find(|c: char| c.is_ascii_digit())
                .unwrap_or(rest.len());
            let scale = match &rest[..unit_end] {
                "h" => MS_PER_HOUR,
                "m" => MS_PER_MINUTE,
                "s" => MS_PER_SECOND,
                "ms" => 1,
                _ => return Err(invalid("unknown unit (use h, m, s or ms)")),
            };
            rest = &rest[unit_end..];

            total_ms = value
                .checked_mul(scale)
                .and_then(|ms| total_ms.checked_add(ms))
                .ok_or_else(|| invalid("duration too large"))?;
        }

        Ok(Self::from_millis(total_ms))
    }
}

impl fmt::Display for ProbeDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ms = self.0.as_millis() as u64;
        if ms == 0 {
            return write!(f, "0s");
        }
        for (scale, unit) in [
            (MS_PER_HOUR, "h"),
            (MS_PER_MINUTE, "m"),
            (MS_PER_SECOND, "s"),
            (1, "ms"),
        ] {
            let n = ms / scale;
            if n > 0 {
                write!(f, "{}{}", n, unit)?;
                ms -= n * scale;
            }
        }
        Ok(())
    }
}

impl TryFrom<String> for ProbeDuration {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<ProbeDuration> for String {
    fn from(d: ProbeDuration) -> Self {
        d.to_string()
    }
}
