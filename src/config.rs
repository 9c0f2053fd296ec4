use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::binning::ScaleMode;
use crate::error::{Result, WindroseError};

/// Most direction slices a panel may ask for (one per degree).
pub const MAX_SLICES: usize = 360;

/// Speed bucket width: fixed, or derived from the observed maximum speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStep", into = "RawStep")]
pub enum StepSetting {
    #[default]
    Auto,
    Fixed(f64),
}

/// Panel editors send the step as a number, a numeric string, or `""` for auto.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawStep {
    Number(f64),
    Text(String),
}

impl TryFrom<RawStep> for StepSetting {
    type Error = String;

    fn try_from(raw: RawStep) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawStep::Number(n) => Ok(StepSetting::Fixed(n)),
            RawStep::Text(s) if s.trim().is_empty() => Ok(StepSetting::Auto),
            RawStep::Text(s) => s
                .trim()
                .parse::<f64>()
                .map(StepSetting::Fixed)
                .map_err(|_| format!("step '{}' is neither empty nor a number", s)),
        }
    }
}

impl From<StepSetting> for RawStep {
    fn from(step: StepSetting) -> Self {
        match step {
            StepSetting::Auto => RawStep::Text(String::new()),
            StepSetting::Fixed(n) => RawStep::Number(n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// Number of direction buckets.
    pub slices: usize,
    /// Lower bound of the first speed bucket.
    pub start: f64,
    pub step: StepSetting,
    pub unit: String,
    pub scale: ScaleMode,
    /// Auto step is `ceil(max_speed / auto_step_divisor)`.
    pub auto_step_divisor: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            slices: 32,
            start: 0.0,
            step: StepSetting::Auto,
            unit: "m/s".into(),
            scale: ScaleMode::Absolute,
            auto_step_divisor: 8.0,
        }
    }
}

impl PanelConfig {
    pub fn validate(&self) -> Result<()> {
        if self.slices == 0 || self.slices > MAX_SLICES {
            return Err(WindroseError::Config(format!(
                "slices {} must be between 1 and {}",
                self.slices, MAX_SLICES
            )));
        }
        if !self.start.is_finite() {
            return Err(WindroseError::Config(format!("start {} is not finite", self.start)));
        }
        if let StepSetting::Fixed(step) = self.step {
            if !step.is_finite() || step <= 0.0 {
                return Err(WindroseError::Config(format!("step {} must be a positive number", step)));
            }
        }
        if !self.auto_step_divisor.is_finite() || self.auto_step_divisor <= 0.0 {
            return Err(WindroseError::Config(format!(
                "auto_step_divisor {} must be a positive number",
                self.auto_step_divisor
            )));
        }
        Ok(())
    }

    /// Speed bucket width for a snapshot whose highest speed is `speed_max`.
    pub fn resolve_step(&self, speed_max: f64) -> f64 {
        match self.step {
            StepSetting::Fixed(step) => step,
            StepSetting::Auto => (speed_max / self.auto_step_divisor).ceil(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Quiet period before a burst of resizes triggers one render.
    pub debounce_ms: u64,
    pub width: f64,
    pub height: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { debounce_ms: 200, width: 600.0, height: 400.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self { enabled: true, port: 9101 }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub panel: PanelConfig,
    pub render: RenderConfig,
    pub publisher: PublisherConfig,
}

impl AppConfig {
    /// Loads configuration from the 'config.yaml' file in the current working directory.
    pub fn load() -> Result<Self> {
        Self::load_from("config.yaml")
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let yaml_content = fs::read_to_string(path)
            .map_err(|e| WindroseError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml(&yaml_content)
    }

    pub fn from_yaml(yaml_content: &str) -> Result<Self> {
        let config: AppConfig = serde_yaml::from_str(yaml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.panel.validate()?;

        let r = &self.render;
        if !(r.width.is_finite() && r.width >= 0.0 && r.height.is_finite() && r.height >= 0.0) {
            return Err(WindroseError::Config(format!(
                "panel size {}x{} is invalid",
                r.width, r.height
            )));
        }
        Ok(())
    }
}
