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

use serde::{Deserialize, Serialize};

/// One cell of the narrow fact table: a single value reported for one
/// variable of one zone at one timestep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResultRow {
    /// The zone this value was attributed to
    pub zone: String,

    /// The full EnergyPlus column name, e.g.
    /// `TESLA:Zone Thermostat Air Temperature [C](Hourly)`
    pub variable: String,

    /// The raw (trimmed) `Date/Time` cell, e.g. `01/08  16:00:00`
    pub stamp: String,

    /// The reported value. Meters are in Joules.
    pub value: f64,
}

impl ResultRow {
    /// Convenience constructor, mostly for tests
    pub fn new(zone: &str, variable: &str, stamp: &str, value: f64) -> Self {
        Self {
            zone: zone.to_string(),
            variable: variable.to_string(),
            stamp: stamp.trim().to_string(),
            value,
        }
    }
}
