//! Runtime configuration: lab defaults and the formulary.
//!
//! A `GlyeralConfig` is deserialized from TOML. The standard configuration
//! is embedded in the binary; deployments may supply their own file.
//!
//! ```toml
//! [lab_defaults]
//! egfr = 100.0
//! hba1c = 7.0
//!
//! [[formulary]]
//! drug_id = "Tradjenta"
//! drug_class = "DPP-4 Inhibitor"
//! dosage_range = "5mg"
//! dosage_options = ["5mg"]
//! frequency_options = ["Once daily"]
//! timing_options = ["Morning", "Any time"]
//! unit = "mg"
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use glyeral_contracts::{
    error::{GlyeralError, GlyeralResult},
    formulary::FormularyEntry,
};

use crate::formulary::Formulary;

/// The configuration shipped with the runtime.
const STANDARD_CONFIG: &str = include_str!("../config/glyeral.toml");

/// Values substituted for absent or unreadable labs.
///
/// These assume near-normal renal and glycemic function. A profile with no
/// labs therefore gets full-dose recommendations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabDefaults {
    /// mL/min.
    pub egfr: f64,
    /// Percent.
    pub hba1c: f64,
}

impl Default for LabDefaults {
    fn default() -> Self {
        Self {
            egfr: 100.0,
            hba1c: 7.0,
        }
    }
}

/// The top-level structure deserialized from a TOML configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlyeralConfig {
    #[serde(default)]
    pub lab_defaults: LabDefaults,

    /// Dosing options per drug id. Order is preserved for display.
    #[serde(default)]
    pub formulary: Vec<FormularyEntry>,
}

impl GlyeralConfig {
    /// The embedded standard configuration covering all twelve drug slots.
    pub fn standard() -> GlyeralResult<Self> {
        Self::from_toml_str(STANDARD_CONFIG)
    }

    /// Parse `s` as TOML and validate it.
    ///
    /// Returns `GlyeralError::ConfigError` if the TOML is malformed, a lab
    /// default is not a positive finite number, or a drug id appears twice
    /// in the formulary.
    pub fn from_toml_str(s: &str) -> GlyeralResult<Self> {
        let config: GlyeralConfig = toml::from_str(s).map_err(|e| GlyeralError::ConfigError {
            reason: format!("failed to parse configuration TOML: {}", e),
        })?;
        config.validate()?;
        debug!(
            egfr_default = config.lab_defaults.egfr,
            hba1c_default = config.lab_defaults.hba1c,
            formulary_entries = config.formulary.len(),
            "configuration loaded"
        );
        Ok(config)
    }

    /// Read the file at `path` and parse it as configuration TOML.
    pub fn from_file(path: &Path) -> GlyeralResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| GlyeralError::ConfigError {
            reason: format!("failed to read configuration file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Build the formulary lookup from this configuration.
    pub fn formulary(&self) -> Formulary {
        Formulary::new(self.formulary.clone())
    }

    fn validate(&self) -> GlyeralResult<()> {
        for (name, value) in [
            ("egfr", self.lab_defaults.egfr),
            ("hba1c", self.lab_defaults.hba1c),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(GlyeralError::ConfigError {
                    reason: format!(
                        "lab default '{}' must be a positive number, got {}",
                        name, value
                    ),
                });
            }
        }

        let mut seen = HashSet::new();
        for entry in &self.formulary {
            if !seen.insert(entry.drug_id.as_str()) {
                return Err(GlyeralError::ConfigError {
                    reason: format!("duplicate formulary entry for drug '{}'", entry.drug_id),
                });
            }
        }
        Ok(())
    }
}
