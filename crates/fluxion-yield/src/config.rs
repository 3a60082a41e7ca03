// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of FluxION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, YieldError};

/// Report run configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Telemetry spreadsheet (.xlsx/.xls/.ods or .csv)
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// Directory receiving the chart images (created if missing)
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Worksheet name, first sheet when unset
    #[serde(default)]
    pub sheet: Option<String>,

    #[serde(default)]
    pub chart: ChartConfig,
}

/// Rendered image size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
}

fn default_input_path() -> PathBuf {
    PathBuf::from("Dados tratados.xlsx")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("graficos_gerados")
}

fn default_chart_width() -> u32 {
    1000
}

fn default_chart_height() -> u32 {
    600
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_dir: default_output_dir(),
            sheet: None,
            chart: ChartConfig::default(),
        }
    }
}

impl ReportConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            YieldError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| YieldError::Config(format!("failed to parse config TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.input_path.as_os_str().is_empty() {
            return Err(YieldError::Config("input_path must not be empty".to_owned()));
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(YieldError::Config("output_dir must not be empty".to_owned()));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(YieldError::Config(format!(
                "chart size must be non-zero, got {}x{}",
                self.chart.width, self.chart.height
            )));
        }
        Ok(())
    }
}
