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

//! Daily and monthly reductions over derived samples.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::types::{Sample, YearMonth};

/// Total AC energy per calendar day (kWh), ascending by date
pub type DailyEnergy = BTreeMap<NaiveDate, f64>;

/// Monthly totals and averages keyed by (year, month)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MonthlyAggregates {
    /// Summed AC energy (kWh)
    pub energy_kwh: BTreeMap<YearMonth, f64>,
    /// Mean per-sample efficiency (%)
    pub efficiency_pct: BTreeMap<YearMonth, f64>,
}

/// Sum `energy_ac` per calendar date. Samples without a date are skipped.
#[must_use]
pub fn daily_energy(samples: &[Sample]) -> DailyEnergy {
    let mut daily = DailyEnergy::new();
    for sample in samples {
        if let Some(date) = sample.date {
            *daily.entry(date).or_insert(0.0) += sample.metrics.energy_ac_kwh;
        }
    }
    daily
}

/// Sum energy and average efficiency per (year, month)
#[must_use]
pub fn monthly_aggregates(samples: &[Sample]) -> MonthlyAggregates {
    // (energy sum, efficiency sum, sample count)
    let mut buckets: BTreeMap<YearMonth, (f64, f64, u32)> = BTreeMap::new();
    for sample in samples {
        if let Some(key) = sample.year_month {
            let bucket = buckets.entry(key).or_insert((0.0, 0.0, 0));
            bucket.0 += sample.metrics.energy_ac_kwh;
            bucket.1 += sample.metrics.efficiency_pct;
            bucket.2 += 1;
        }
    }

    let mut aggregates = MonthlyAggregates::default();
    for (key, (energy, efficiency_sum, count)) in buckets {
        aggregates.energy_kwh.insert(key, energy);
        aggregates
            .efficiency_pct
            .insert(key, efficiency_sum / f64::from(count));
    }
    aggregates
}
