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

use crate::aggregate::DailyEnergy;
use crate::error::EmptySeriesError;
use crate::types::ExtremalDays;

/// Pick the days of maximum, minimum and closest-to-mean production.
///
/// The series iterates in ascending date order and only a strictly better
/// value replaces the current pick, so ties resolve to the earliest date.
pub fn select_extremal_days(daily: &DailyEnergy) -> Result<ExtremalDays, EmptySeriesError> {
    let (&first_day, &first_value) = daily.iter().next().ok_or(EmptySeriesError)?;

    #[expect(clippy::cast_precision_loss)]
    let mean = daily.values().sum::<f64>() / daily.len() as f64;

    let mut max = (first_day, first_value);
    let mut min = (first_day, first_value);
    let mut closest = (first_day, (first_value - mean).abs());

    for (&day, &value) in daily.iter().skip(1) {
        if value > max.1 {
            max = (day, value);
        }
        if value < min.1 {
            min = (day, value);
        }
        let distance = (value - mean).abs();
        if distance < closest.1 {
            closest = (day, distance);
        }
    }

    Ok(ExtremalDays {
        max_day: max.0,
        min_day: min.0,
        mean_day: closest.0,
    })
}
