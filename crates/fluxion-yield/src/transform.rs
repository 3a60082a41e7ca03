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

//! Per-sample energy and efficiency derivation.

use crate::types::{DerivedMetrics, ElectricalReading, Sample, TelemetryRow};

impl ElectricalReading {
    /// Instantaneous AC power in kW
    #[must_use]
    pub fn power_ac_kw(&self) -> f64 {
        self.ac_voltage_v * self.ac_current_a * self.power_factor / 1000.0
    }

    /// AC energy delivered during the interval (kWh)
    #[must_use]
    pub fn energy_ac_kwh(&self) -> f64 {
        self.power_ac_kw() * self.period_h
    }

    /// DC energy drawn from MPPT1 during the interval (kWh)
    #[must_use]
    pub fn energy_dc_kwh(&self) -> f64 {
        self.dc_voltage_v * self.dc_current_a / 1000.0 * self.period_h
    }

    #[must_use]
    pub fn metrics(&self) -> DerivedMetrics {
        let energy_ac_kwh = self.energy_ac_kwh();
        let energy_dc_kwh = self.energy_dc_kwh();
        DerivedMetrics {
            energy_ac_kwh,
            energy_dc_kwh,
            power_ac_kw: self.power_ac_kw(),
            efficiency_pct: efficiency_pct(energy_ac_kwh, energy_dc_kwh),
        }
    }
}

/// AC/DC energy ratio in percent. Zero DC energy yields 0, not NaN.
#[must_use]
pub fn efficiency_pct(energy_ac_kwh: f64, energy_dc_kwh: f64) -> f64 {
    if energy_dc_kwh == 0.0 {
        0.0
    } else {
        energy_ac_kwh / energy_dc_kwh * 100.0
    }
}

impl From<TelemetryRow> for Sample {
    fn from(row: TelemetryRow) -> Self {
        Self {
            date: row.date(),
            timestamp: row.timestamp,
            year_month: row.parts.year_month(),
            metrics: row.reading.metrics(),
            reading: row.reading,
        }
    }
}

/// Attach derived metrics to every loaded row, preserving order
#[must_use]
pub fn derive_samples(rows: Vec<TelemetryRow>) -> Vec<Sample> {
    rows.into_iter().map(Sample::from).collect()
}
