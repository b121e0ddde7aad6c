use serde::Deserialize;

use crate::error::CalibError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalibConfig {
    pub name: String,
    pub inputs: InputConfig,
    #[serde(default)]
    pub hydrograph: HydrographConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub factors: FactorConfig,
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Input files, relative to the config file's directory.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    /// PEST sample (.smp) file of field observations.
    pub observations: String,
    /// Simulated hydrograph output.
    pub hydrographs: String,
    /// Well metadata CSV (`name,column,x,y,layer`).
    pub wells: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HydrographConfig {
    /// Lines before the first data row of the hydrograph file.
    #[serde(default = "default_header_lines")]
    pub header_lines: usize,
}

fn default_header_lines() -> usize {
    9
}

impl Default for HydrographConfig {
    fn default() -> Self {
        Self {
            header_lines: default_header_lines(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Round simulated equivalents to this many decimals.
    #[serde(default)]
    pub round_decimals: Option<u32>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    #[default]
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Tab => b'\t',
            Self::Comma => b',',
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Per-well RMSE/bias report.
    #[serde(default)]
    pub stats: Option<String>,
    /// Missing-site list (appended).
    #[serde(default)]
    pub missing: Option<String>,
    /// Full JSON result.
    #[serde(default)]
    pub json: Option<String>,
    /// Simulated equivalents as a PEST sample file; its instruction file is
    /// written next to it with an `.ins` extension.
    #[serde(default)]
    pub smp: Option<String>,
    /// Table of matched observations with simulated equivalents.
    #[serde(default)]
    pub matched: Option<String>,
    #[serde(default)]
    pub delimiter: Delimiter,
}

// ---------------------------------------------------------------------------
// Pilot-point factors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FactorConfig {
    #[serde(default = "default_n_points")]
    pub n_points: usize,
    #[serde(default = "default_min_points")]
    pub min_points: usize,
    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

fn default_n_points() -> usize {
    3
}

fn default_min_points() -> usize {
    3
}

fn default_max_points() -> usize {
    10
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            n_points: default_n_points(),
            min_points: default_min_points(),
            max_points: default_max_points(),
        }
    }
}

impl FactorConfig {
    pub fn with_points(n_points: usize) -> Self {
        Self {
            n_points,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), CalibError> {
        if self.min_points == 0 || self.min_points > self.max_points {
            return Err(CalibError::ConfigValidation(format!(
                "factor point range {}..={} is empty",
                self.min_points, self.max_points
            )));
        }
        if self.n_points < self.min_points || self.n_points > self.max_points {
            return Err(CalibError::ConfigValidation(format!(
                "n_points = {} is outside of range {} to {}",
                self.n_points, self.min_points, self.max_points
            )));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl CalibConfig {
    pub fn from_toml(input: &str) -> Result<Self, CalibError> {
        let config: CalibConfig =
            toml::from_str(input).map_err(|e| CalibError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CalibError> {
        if self.name.trim().is_empty() {
            return Err(CalibError::ConfigValidation("name must not be empty".into()));
        }

        let inputs = [
            ("observations", &self.inputs.observations),
            ("hydrographs", &self.inputs.hydrographs),
            ("wells", &self.inputs.wells),
        ];
        for (field, path) in inputs {
            if path.trim().is_empty() {
                return Err(CalibError::ConfigValidation(format!(
                    "inputs.{field} must not be empty"
                )));
            }
        }

        if let Some(decimals) = self.matching.round_decimals {
            if decimals > 12 {
                return Err(CalibError::ConfigValidation(format!(
                    "matching.round_decimals must be at most 12, got {decimals}"
                )));
            }
        }

        self.factors.validate()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
