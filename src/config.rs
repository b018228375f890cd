//! Tree Configuration
//!
//! Numeric tolerances used while cleaning and pruning a tree.
use crate::constants::{RISK_TOLERANCE, USELESS_SPLIT_TOLERANCE};
use crate::errors::CcTreeError;
use crate::utils::validate_positive_float_parameter;
use serde::{Deserialize, Serialize};

fn default_useless_split_tolerance() -> f64 {
    USELESS_SPLIT_TOLERANCE
}
fn default_risk_tolerance() -> f64 {
    RISK_TOLERANCE
}

/// Configuration carried by every `Tree`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TreeConfig {
    /// Largest difference between a parent's risk and the summed risk of its
    /// two leaf children for the split to count as useless.
    #[serde(default = "default_useless_split_tolerance")]
    pub useless_split_tolerance: f64,
    /// Slack allowed when checking that a subtree is never riskier than its root.
    #[serde(default = "default_risk_tolerance")]
    pub risk_tolerance: f64,
    /// Measure a node's own cost by its risk (reach probability times error
    /// rate) instead of its error rate when computing link strengths and
    /// checking subtree risks. Off by default.
    #[serde(default)]
    pub weighted_link_strength: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            useless_split_tolerance: USELESS_SPLIT_TOLERANCE,
            risk_tolerance: RISK_TOLERANCE,
            weighted_link_strength: false,
        }
    }
}

impl TreeConfig {
    pub fn validate(&self) -> Result<(), CcTreeError> {
        validate_positive_float_parameter(self.useless_split_tolerance, "useless_split_tolerance")?;
        validate_positive_float_parameter(self.risk_tolerance, "risk_tolerance")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(TreeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_tolerance() {
        let cfg = TreeConfig {
            useless_split_tolerance: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(CcTreeError::InvalidParameter(p, _, _)) if p == "useless_split_tolerance"
        ));
        let cfg = TreeConfig {
            risk_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let cfg: TreeConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg, TreeConfig::default());
        let cfg: TreeConfig = serde_json::from_str(r#"{"risk_tolerance": 0.001}"#).unwrap();
        assert_eq!(cfg.risk_tolerance, 0.001);
        assert_eq!(cfg.useless_split_tolerance, USELESS_SPLIT_TOLERANCE);
        assert!(!cfg.weighted_link_strength);
    }
}
