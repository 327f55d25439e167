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

/// The variable-name fragments the API queries for, all lowercase.
/// EnergyPlus column names embed the zone, the variable and the
/// reporting frequency (e.g. `TESLA:Zone Thermostat Air Temperature
/// [C](Hourly)`), so selection works on name fragments rather than on
/// exact names.
pub mod needles {
    /// Zone electricity meters, e.g. `Electricity:Zone:TESLA [J](Hourly)`
    pub const ZONE_ELECTRICITY: &str = "electricity:zone";

    /// Plug-load sub-meter
    pub const EQUIPMENT: &str = "interiorequipment";

    /// Lighting sub-meter
    pub const LIGHTS: &str = "interiorlights";

    /// Fanger Predicted Mean Vote, the thermal-comfort index
    pub const PMV: &str = "thermal comfort fanger model pmv";

    /// Thermostat air temperature
    pub const TEMPERATURE: &str = "zone thermostat air temperature";

    /// Relative humidity
    pub const HUMIDITY: &str = "air relative humidity";
}

/// How a query selects variables out of the fact table. All matching
/// is case-insensitive.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VariableMatch {
    /// Every variable passes
    Any,

    /// The trimmed variable name must start with this fragment
    /// (used for the `electricity:zone` meters)
    Prefix(String),

    /// The variable name must contain this fragment anywhere
    /// (used for meter filters, PMV, temperature, humidity)
    Substring(String),
}

impl VariableMatch {
    /// A prefix matcher
    pub fn prefix(needle: &str) -> Self {
        VariableMatch::Prefix(needle.to_lowercase())
    }

    /// A substring matcher. `None` or an empty needle leaves every
    /// variable selected, which is how the meter filter behaves when
    /// the query omits it.
    pub fn substring(needle: Option<&str>) -> Self {
        match needle {
            Some(n) if !n.is_empty() => VariableMatch::Substring(n.to_lowercase()),
            _ => VariableMatch::Any,
        }
    }

    /// Decides whether a variable name is selected
    pub fn accepts(&self, variable: &str) -> bool {
        match self {
            VariableMatch::Any => true,
            VariableMatch::Prefix(needle) => {
                variable.trim().to_lowercase().starts_with(needle.as_str())
            }
            VariableMatch::Substring(needle) => variable.to_lowercase().contains(needle.as_str()),
        }
    }
}
