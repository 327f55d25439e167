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

use crate::Date;

/// A date/hour restriction on result rows, as received from a query
/// string. Matching works on the raw `Date/Time` cell by prefix, so a
/// date string that does not describe any day (e.g. `banana/8`) is not
/// an error: it simply matches nothing.
#[derive(Clone, Debug, Default)]
pub struct TimeFilter {
    date: Option<String>,
    hour: Option<String>,
}

impl TimeFilter {
    /// Builds a filter from the raw query parameters. A `None` leaves
    /// that axis unrestricted.
    pub fn new(date: Option<&str>, hour: Option<&str>) -> Self {
        Self {
            date: date.map(normalize_date),
            hour: hour.map(pad_hour),
        }
    }

    /// The date restriction, when it describes an actual day.
    pub fn date(&self) -> Option<Date> {
        Date::parse(self.date.as_deref()?).ok()
    }

    /// The hour restriction, when it is a number.
    pub fn hour(&self) -> Option<u8> {
        self.hour.as_deref()?.parse().ok()
    }

    /// Decides whether a raw `Date/Time` cell passes the restriction.
    ///
    /// A date restriction keeps cells whose trimmed text starts with
    /// the normalized `MM/DD`. An hour restriction keeps cells whose
    /// time part (after the double space) starts with `HH:`; a cell
    /// with no time part is rejected whenever an hour restriction is
    /// present.
    pub fn matches(&self, raw_stamp: &str) -> bool {
        let stamp = raw_stamp.trim();
        if let Some(date) = &self.date {
            if !stamp.starts_with(date.as_str()) {
                return false;
            }
        }
        if let Some(hour) = &self.hour {
            match stamp.split_once("  ") {
                Some((_, time)) => {
                    if !time.starts_with(&format!("{}:", hour)) {
                        return false;
                    }
                }
                None => return false,
            }
        }
        true
    }
}

/// Normalizes a `MM/DD` date string so both components are always
/// zero-padded (e.g. `1/8` becomes `01/08`). A string with an
/// unexpected shape is returned as-is.
pub fn normalize_date(date: &str) -> String {
    let mut parts = date.splitn(2, '/');
    match (parts.next(), parts.next()) {
        (Some(a), Some(b)) => format!("{:0>2}/{:0>2}", a.trim(), b.trim()),
        _ => date.to_string(),
    }
}

fn pad_hour(hour: &str) -> String {
    format!("{:0>2}", hour.trim())
}
