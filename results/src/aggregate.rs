/*
MIT License
Copyright (c)  Germán Molina
Permission is hereby granted, free of charge, to any person obtaining a copy
of this software and associated documentation files (the "Software"), to deal
in the Software without restriction, including without limitation the rights
to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
copies of the Software, and to permit persons to whom the Software is
furnished to do so, subject to the following conditions:
The above copyright notice and this permission notice shall be included in all
copies or substantial portions of the Software.
THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
SOFTWARE.
*/

use crate::matcher::{needles, VariableMatch};
use crate::ResultRow;
use calendar::TimeFilter;
use serde::Serialize;

/// EnergyPlus meters report Joules
pub const JOULES_PER_KWH: f64 = 3_600_000.0;

/// Converts a meter reading in Joules into kWh
pub fn to_kwh(joules: f64) -> f64 {
    joules / JOULES_PER_KWH
}

/// Sums the values of every row that passes the time filter and whose
/// variable is selected by the matcher.
pub fn sum(rows: &[ResultRow], filter: &TimeFilter, matcher: &VariableMatch) -> f64 {
    rows.iter()
        .filter(|r| filter.matches(&r.stamp) && matcher.accepts(&r.variable))
        .map(|r| r.value)
        .sum()
}

/// Collects (rather than sums) the values selected by the same
/// filtering as [`sum`], in row order.
pub fn collect(rows: &[ResultRow], filter: &TimeFilter, matcher: &VariableMatch) -> Vec<f64> {
    rows.iter()
        .filter(|r| filter.matches(&r.stamp) && matcher.accepts(&r.variable))
        .map(|r| r.value)
        .collect()
}

/// A series of collected samples. The web front end expects a
/// one-element list collapsed into a bare scalar, so the JSON
/// encoding does that.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Samples {
    /// Exactly one sample matched the query
    One(f64),

    /// Zero, or more than one
    Many(Vec<f64>),
}

impl From<Vec<f64>> for Samples {
    fn from(values: Vec<f64>) -> Self {
        if values.len() == 1 {
            Samples::One(values[0])
        } else {
            Samples::Many(values)
        }
    }
}

/// Everything the `room_summary` endpoint reports for one zone:
/// energy totals plus the comfort, temperature and humidity series.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomSummary {
    /// Total zone electricity, in Joules
    pub total_energy: f64,

    /// Plug-load share of the total, in Joules
    pub energy_equipment: f64,

    /// Lighting share of the total, in Joules
    pub energy_lights: f64,

    /// Fanger PMV samples
    pub pmv: Vec<f64>,

    /// Thermostat air temperature samples, in C
    pub temperature: Vec<f64>,

    /// Relative humidity samples, in %
    pub humidity: Vec<f64>,
}

/// Computes a [`RoomSummary`] in a single pass over the rows of one
/// zone. Row order is preserved in the collected series.
pub fn summarize(rows: &[ResultRow], filter: &TimeFilter) -> RoomSummary {
    let mut summary = RoomSummary::default();

    for row in rows {
        if !filter.matches(&row.stamp) {
            continue;
        }
        let variable = row.variable.to_lowercase();

        if variable.trim().starts_with(needles::ZONE_ELECTRICITY) {
            summary.total_energy += row.value;
        }
        if variable.contains(needles::EQUIPMENT) {
            summary.energy_equipment += row.value;
        }
        if variable.contains(needles::LIGHTS) {
            summary.energy_lights += row.value;
        }
        if variable.contains(needles::PMV) {
            summary.pmv.push(row.value);
        }
        if variable.contains(needles::TEMPERATURE) {
            summary.temperature.push(row.value);
        }
        if variable.contains(needles::HUMIDITY) {
            summary.humidity.push(row.value);
        }
    }

    summary
}
