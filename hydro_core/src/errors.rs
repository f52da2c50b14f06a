//! # Error Types
//!
//! Structured error types for hydro_core. Every error carries enough context
//! (curve, station, heel angle, bracket bounds) to reproduce the failure, and
//! serializes to JSON alongside the results it replaces.
//!
//! ## Example
//!
//! ```rust
//! use hydro_core::errors::{HydroError, HydroResult};
//!
//! fn validate_mass(mass_kg: f64) -> HydroResult<()> {
//!     if !mass_kg.is_finite() || mass_kg < 0.0 {
//!         return Err(HydroError::InvalidInput {
//!             field: "mass_kg".to_string(),
//!             value: mass_kg.to_string(),
//!             reason: "Mass must be a finite, non-negative number".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! # assert!(validate_mass(-1.0).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for hydro_core operations
pub type HydroResult<T> = Result<T, HydroError>;

/// Structured error type for geometry and hydrostatic operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum HydroError {
    /// A curve was evaluated outside its control-point x-range
    #[error("Domain error: curve '{curve}' evaluated at x={x} outside [{x_min}, {x_max}]")]
    Domain {
        curve: String,
        x: f64,
        x_min: f64,
        x_max: f64,
    },

    /// A profile could not be assembled or is not a simple polygon
    #[error("Geometry error at station x={station}: {reason}")]
    Geometry { station: f64, reason: String },

    /// A waterline or trim solve found no bracket or ran out of iterations
    #[error(
        "Convergence error ({condition}): {reason} after {iterations} iterations, \
         residual {residual}, bracket [{lower_bound}, {upper_bound}]"
    )]
    Convergence {
        condition: String,
        reason: String,
        iterations: usize,
        residual: f64,
        lower_bound: f64,
        upper_bound: f64,
    },

    /// An input value is invalid (non-finite, duplicated, out of range, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A stability sweep was cancelled through its cancellation flag
    #[error("Sweep cancelled after {completed} of {requested} heel angles")]
    Cancelled { completed: usize, requested: usize },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl HydroError {
    /// Create a Domain error
    pub fn domain(curve: impl Into<String>, x: f64, x_min: f64, x_max: f64) -> Self {
        HydroError::Domain {
            curve: curve.into(),
            x,
            x_min,
            x_max,
        }
    }

    /// Create a Geometry error
    pub fn geometry(station: f64, reason: impl Into<String>) -> Self {
        HydroError::Geometry {
            station,
            reason: reason.into(),
        }
    }

    /// Create a Convergence error
    pub fn convergence(
        condition: impl Into<String>,
        reason: impl Into<String>,
        iterations: usize,
        residual: f64,
        bounds: (f64, f64),
    ) -> Self {
        HydroError::Convergence {
            condition: condition.into(),
            reason: reason.into(),
            iterations,
            residual,
            lower_bound: bounds.0,
            upper_bound: bounds.1,
        }
    }

    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        HydroError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        HydroError::Internal {
            message: message.into(),
        }
    }

    /// True for solver failures, which a sweep records as gaps instead of aborting
    pub fn is_convergence_failure(&self) -> bool {
        matches!(self, HydroError::Convergence { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            HydroError::Domain { .. } => "DOMAIN_ERROR",
            HydroError::Geometry { .. } => "GEOMETRY_ERROR",
            HydroError::Convergence { .. } => "CONVERGENCE_ERROR",
            HydroError::InvalidInput { .. } => "INVALID_INPUT",
            HydroError::Cancelled { .. } => "CANCELLED",
            HydroError::SerializationError { .. } => "SERIALIZATION_ERROR",
            HydroError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for HydroError {
    fn from(err: serde_json::Error) -> Self {
        HydroError::SerializationError {
            reason: err.to_string(),
        }
    }
}

/// Reject NaN and infinities for a named input value.
pub(crate) fn require_finite(field: &str, value: f64) -> HydroResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(HydroError::invalid_input(field, value.to_string(), "Value must be finite"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = HydroError::convergence("heel 35.0°", "no bracket", 0, 12.5, (0.0, 0.3));
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"Convergence\""));
        let roundtrip: HydroError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(HydroError::domain("keel", 6.0, 0.0, 5.0).error_code(), "DOMAIN_ERROR");
        assert_eq!(HydroError::geometry(2.5, "open profile").error_code(), "GEOMETRY_ERROR");
        assert_eq!(HydroError::invalid_input("mass", "NaN", "bad").error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_convergence_classification() {
        assert!(HydroError::convergence("upright", "stalled", 100, 0.1, (0.0, 1.0)).is_convergence_failure());
        assert!(!HydroError::geometry(0.0, "x").is_convergence_failure());
    }

    #[test]
    fn test_require_finite() {
        assert!(require_finite("x", 1.0).is_ok());
        assert!(require_finite("x", f64::NAN).is_err());
        assert!(require_finite("x", f64::INFINITY).is_err());
    }
}
