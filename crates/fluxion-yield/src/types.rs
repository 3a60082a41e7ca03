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

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar month bucket used for monthly aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    #[must_use]
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Raw date/time cells of a telemetry row.
///
/// Each part is `None` when the cell was blank or not an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub hour: Option<u32>,
    pub minute: Option<u32>,
}

impl DateParts {
    /// Combine the five parts into a timestamp, `None` if any part is missing
    /// or the combination is not a real date/time.
    #[must_use]
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        let date = NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)?;
        date.and_hms_opt(self.hour?, self.minute?, 0)
    }

    /// Monthly bucket taken straight from the year/month cells
    #[must_use]
    pub fn year_month(&self) -> Option<YearMonth> {
        Some(YearMonth::new(self.year?, self.month?))
    }
}

/// Electrical quantities sampled by the inverter for one interval
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElectricalReading {
    /// AC output voltage (V)
    pub ac_voltage_v: f64,
    /// AC output current (A)
    pub ac_current_a: f64,
    /// AC power factor (0-1)
    pub power_factor: f64,
    /// DC input voltage on MPPT channel 1 (V)
    pub dc_voltage_v: f64,
    /// DC input current on MPPT channel 1 (A)
    pub dc_current_a: f64,
    /// Length of the sampling interval (hours)
    pub period_h: f64,
}

/// One loaded spreadsheet row before derived metrics are attached
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryRow {
    pub parts: DateParts,
    pub timestamp: Option<NaiveDateTime>,
    pub reading: ElectricalReading,
}

impl TelemetryRow {
    #[must_use]
    pub fn new(parts: DateParts, reading: ElectricalReading) -> Self {
        Self {
            parts,
            timestamp: parts.timestamp(),
            reading,
        }
    }

    /// Calendar date obtained by truncating the timestamp
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|ts| ts.date())
    }
}

/// Per-sample energy and efficiency figures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub energy_ac_kwh: f64,
    pub energy_dc_kwh: f64,
    pub power_ac_kw: f64,
    /// AC/DC energy ratio in percent, 0 when DC energy is 0
    pub efficiency_pct: f64,
}

/// A telemetry row with its derived metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: Option<NaiveDateTime>,
    pub date: Option<NaiveDate>,
    pub year_month: Option<YearMonth>,
    pub reading: ElectricalReading,
    pub metrics: DerivedMetrics,
}

/// The three days that characterise best, typical and worst production
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtremalDays {
    pub max_day: NaiveDate,
    pub min_day: NaiveDate,
    pub mean_day: NaiveDate,
}

/// Which extremal day a report block or chart refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductionKind {
    Maximum,
    Mean,
    Minimum,
}

impl ProductionKind {
    /// Report and chart order
    pub const ALL: [ProductionKind; 3] = [Self::Maximum, Self::Mean, Self::Minimum];

    #[must_use]
    pub fn day(self, days: &ExtremalDays) -> NaiveDate {
        match self {
            Self::Maximum => days.max_day,
            Self::Mean => days.mean_day,
            Self::Minimum => days.min_day,
        }
    }

    /// Adjective used in the text report ("Dia de máxima produção")
    #[must_use]
    pub fn report_label(self) -> &'static str {
        match self {
            Self::Maximum => "máxima",
            Self::Mean => "média",
            Self::Minimum => "mínima",
        }
    }

    /// Chart title prefix
    #[must_use]
    pub fn chart_title(self) -> &'static str {
        match self {
            Self::Maximum => "Produção Máxima",
            Self::Mean => "Produção Média",
            Self::Minimum => "Produção Mínima",
        }
    }

    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Maximum => "producao_maxima.png",
            Self::Mean => "producao_media.png",
            Self::Minimum => "producao_minima.png",
        }
    }
}
