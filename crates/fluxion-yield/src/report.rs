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

//! Plain-text summary of the extremal production days.

use chrono::NaiveDate;

use crate::aggregate::DailyEnergy;
use crate::types::{ExtremalDays, ProductionKind};

/// Date format used in the report and chart titles
pub const DAY_FORMAT: &str = "%d/%m/%Y";

#[must_use]
pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

/// Build the report: one block per extremal day, maximum then mean then minimum
///
/// # Panics
///
/// When a day in `days` is not a key of `daily`; `days` must come from
/// [`select_extremal_days`](crate::extremes::select_extremal_days) on the same series.
#[must_use]
pub fn format_report(daily: &DailyEnergy, days: &ExtremalDays) -> String {
    let mut output = String::new();
    for kind in ProductionKind::ALL {
        let day = kind.day(days);
        output.push_str(&format!(
            "Dia de {} produção (CA): {}\nEnergia produzida: {:.2} kWh\n\n",
            kind.report_label(),
            format_day(day),
            daily[&day]
        ));
    }
    output
}
