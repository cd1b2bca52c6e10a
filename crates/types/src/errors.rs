use thiserror::Error;

// ============================================================================
// Main Error Enum
// ============================================================================

/// Error enum shared by the SynthPool client crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SynthPoolError {
    // ========================================================================
    // Time Errors
    // ========================================================================

    /// Unix timestamp outside the range chrono can represent
    #[error("Invalid timestamp: {timestamp}")]
    InvalidTimestamp { timestamp: i64 },

    /// Timezone name not present in the IANA database
    #[error("Unknown timezone '{name}': {reason}")]
    UnknownTimezone { name: String, reason: String },

    // ========================================================================
    // Cycle Consistency Errors
    // ========================================================================

    /// A request claims a cycle the pool has not reached yet
    #[error("Request cycle {request_cycle} is ahead of pool cycle {current_cycle}")]
    FutureRequestCycle { request_cycle: u64, current_cycle: u64 },

    // ========================================================================
    // Validation Errors
    // ========================================================================

    /// Invalid parameter
    #[error("Invalid parameter '{parameter}': got '{value}', expected '{expected}'")]
    InvalidParameter { parameter: String, value: String, expected: String },
}

impl SynthPoolError {
    /// Create an invalid timestamp error
    pub fn invalid_timestamp(timestamp: i64) -> Self {
        Self::InvalidTimestamp { timestamp }
    }

    /// Create an unknown timezone error
    pub fn unknown_timezone(name: &str, reason: &str) -> Self {
        Self::UnknownTimezone {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a future request cycle error
    pub fn future_request_cycle(request_cycle: u64, current_cycle: u64) -> Self {
        Self::FutureRequestCycle { request_cycle, current_cycle }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: &str, value: &str, expected: &str) -> Self {
        Self::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

/// Result type alias using the shared error type
pub type SynthPoolResult<T> = std::result::Result<T, SynthPoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = SynthPoolError::future_request_cycle(7, 5);
        assert_eq!(err.to_string(), "Request cycle 7 is ahead of pool cycle 5");

        let err = SynthPoolError::invalid_parameter("poll_interval_secs", "0", "greater than 0");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'poll_interval_secs': got '0', expected 'greater than 0'"
        );
    }
}
