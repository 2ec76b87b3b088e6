use thiserror::Error;

use super::models::Slot;

/// Conditions the countdown engine reports. None of them are fatal: the
/// engine logs them and degrades to an inert or already-elapsed state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CountdownError {
    #[error("no render targets matched selector(s) {selectors:?}")]
    NoTargets { selectors: Vec<String> },

    #[error("could not parse countdown date {input:?}")]
    InvalidDate { input: String },

    #[error(
        "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02} ({zone}) is not a valid instant"
    )]
    InvalidInstant {
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
        zone: &'static str,
    },

    #[error("relative duration of {duration_ms}ms overflows the clock range")]
    DurationOverflow { duration_ms: i64 },

    #[error("no sink resolved for the {slot} slot (selector {selector:?})")]
    MissingSink { slot: Slot, selector: String },
}

impl CountdownError {
    /// True for errors that make the computed target unreachable.
    pub fn is_invalid_target(&self) -> bool {
        matches!(
            self,
            Self::InvalidDate { .. } | Self::InvalidInstant { .. } | Self::DurationOverflow { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_instant_message_is_readable() {
        let err = CountdownError::InvalidInstant {
            year: 2025,
            month: 2,
            day: 30,
            hour: 9,
            minute: 5,
            second: 0,
            zone: "UTC",
        };
        assert_eq!(
            err.to_string(),
            "2025-02-30 09:05:00 (UTC) is not a valid instant"
        );
        assert!(err.is_invalid_target());
    }

    #[test]
    fn missing_sink_is_not_a_target_error() {
        let err = CountdownError::MissingSink {
            slot: Slot::Hours,
            selector: ".hours".to_string(),
        };
        assert!(!err.is_invalid_target());
        assert!(err.to_string().contains("hours"));
    }
}
