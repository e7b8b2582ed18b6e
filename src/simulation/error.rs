//! Error types for the navigation controller.

use thiserror::Error;

/// Errors raised while configuring or ticking a controller.
#[derive(Debug, Error)]
pub enum ControllerError {
    /// A configuration value is out of its valid range.
    #[error("invalid configuration: {field} must be {requirement}, got {value}")]
    InvalidConfig {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },

    /// A JSON configuration could not be parsed.
    #[error("failed to parse controller configuration: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// An operation that needs range sensors received none.
    #[error("sonar belt is empty: {context} needs at least one range sensor")]
    EmptySonarBelt { context: &'static str },

    /// A steering computation produced NaN or infinity.
    #[error(
        "non-finite command from {context}: rotational={rotational}, translational={translational}"
    )]
    NonFiniteCommand {
        context: &'static str,
        rotational: f64,
        translational: f64,
    },
}

impl ControllerError {
    #[must_use]
    pub const fn invalid(field: &'static str, requirement: &'static str, value: f64) -> Self {
        Self::InvalidConfig {
            field,
            requirement,
            value,
        }
    }

    #[must_use]
    pub const fn empty_belt(context: &'static str) -> Self {
        Self::EmptySonarBelt { context }
    }
}

/// Result alias for controller operations.
pub type Result<T> = std::result::Result<T, ControllerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_config_display() {
        let err = ControllerError::invalid("safety_distance", "positive", -1.0);
        let msg = format!("{err}");
        assert!(msg.contains("safety_distance"));
        assert!(msg.contains("positive"));
        assert!(msg.contains("-1"));
    }

    #[test]
    fn test_empty_belt_display() {
        let err = ControllerError::empty_belt("obstacle detection");
        assert!(format!("{err}").contains("obstacle detection"));
    }

    #[test]
    fn test_parse_error_converts() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ControllerError = parse.into();
        assert!(matches!(err, ControllerError::ConfigParse(_)));
    }
}
