//! Numeric configuration for solving, judging and optimising bridges.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ParameterError, PersistenceError};
use crate::evaluation::DesignCriteria;
use crate::optimizer::OptimizerSettings;
use crate::solver::LoadCase;

/// Every tunable number in one place.
///
/// Missing sections or fields in a JSON document fall back to the defaults, so a
/// file only needs to name what it changes:
/// ```
/// let config = bridgex::BridgeConfig::from_json(r#"{ "load": { "intensity": 3.0 } }"#)
///     .expect("partial documents are accepted");
/// assert_eq!(config.load.intensity, 3.0);
/// assert_eq!(config.criteria.max_force, 6.0);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Deck load.
    pub load: LoadCase,
    /// Capacities, prices and geometric limits.
    pub criteria: DesignCriteria,
    /// Search parameters.
    pub optimizer: OptimizerSettings,
}

impl BridgeConfig {
    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ParameterError`] found.
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.load.intensity >= 0.0 && self.load.intensity.is_finite()) {
            return Err(ParameterError::OutOfRange {
                name: "intensity",
                value: self.load.intensity,
            });
        }
        self.criteria.validate()?;
        self.optimizer.validate()
    }

    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] for malformed JSON and
    /// [`PersistenceError::InvalidParameters`] for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] when the file cannot be read, otherwise as
    /// [`BridgeConfig::from_json`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Render the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if serialisation fails.
    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::vector;

    #[test]
    fn defaults_match_reference_constants() {
        let config = BridgeConfig::default();
        assert_eq!(config.load.intensity, 2.5);
        assert_eq!(config.criteria.min_force, -9.0);
        assert_eq!(config.criteria.max_force, 6.0);
        assert_eq!(config.criteria.joint_cost, 5.0);
        assert_eq!(config.criteria.member_cost_per_length, 15.0);
        assert_eq!(config.criteria.max_floor_span, 3.5);
        assert_eq!(config.criteria.min_member_length, 1.0);
        assert_eq!(config.criteria.required_span, vector(12.0, 0.0));
        assert_eq!(config.optimizer.selection_rate, 0.1);
        assert_eq!(config.optimizer.iterations, 2000);
        assert_eq!(config.optimizer.generations, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn nested_fields_override_individually() {
        let config = BridgeConfig::from_json(
            r#"{
                "criteria": { "required_span": { "x": 15.0, "y": 0.0 } },
                "optimizer": { "symmetry_axis": null, "radius": 0.01 }
            }"#,
        )
        .expect("valid document");
        assert_eq!(config.criteria.required_span, vector(15.0, 0.0));
        assert_eq!(config.criteria.max_floor_span, 3.5);
        assert_eq!(config.optimizer.symmetry_axis, None);
        assert_eq!(config.optimizer.radius, 0.01);
        assert_eq!(config.optimizer.iterations, 2000);
    }

    #[test]
    fn serialised_defaults_parse_back() {
        let text = BridgeConfig::default().to_json().expect("serialisable");
        assert_eq!(
            BridgeConfig::from_json(&text).expect("parses"),
            BridgeConfig::default()
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let error = BridgeConfig::from_json(r#"{ "optimizer": { "selection_rate": 2.0 } }"#)
            .expect_err("rate above one");
        assert!(matches!(
            error,
            PersistenceError::InvalidParameters(ParameterError::OutOfRange {
                name: "selection_rate",
                ..
            })
        ));
        let error = BridgeConfig::from_json(r#"{ "load": { "intensity": -1.0 } }"#)
            .expect_err("negative load");
        assert!(matches!(error, PersistenceError::InvalidParameters(_)));
        let error = BridgeConfig::from_json("[1, 2]").expect_err("not an object");
        assert!(matches!(error, PersistenceError::Json(_)));
    }
}
