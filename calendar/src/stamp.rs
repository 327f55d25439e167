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
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A parsed EnergyPlus `Date/Time` cell, e.g. ` 01/08  16:00:00`.
///
/// The date part and the time part are separated by two spaces. Hours
/// run from 1 to 24: EnergyPlus reports the end of the day as
/// `24:00:00` rather than as `00:00:00` of the next one. Some report
/// rows (e.g., design days) carry only the date part, in which case
/// the time fields are zero.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct Stamp {
    /// The day this cell belongs to
    pub date: Date,

    /// Hour of the day, from 1 to 24. Zero when the cell
    /// had no time part.
    pub hour: u8,

    /// Minute, from 0 to 59
    pub minute: u8,

    /// Second, from 0 to 59
    pub second: u8,
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  {:02}:{:02}:{:02}",
            self.date, self.hour, self.minute, self.second
        )
    }
}

impl Stamp {
    /// Parses a raw `Date/Time` cell.
    ///
    /// ```
    /// use calendar::Stamp;
    ///
    /// let s = Stamp::parse(" 01/08  16:00:00").unwrap();
    /// assert_eq!(s.date.month, 1);
    /// assert_eq!(s.date.day, 8);
    /// assert_eq!(s.hour, 16);
    /// ```
    pub fn parse(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        let (date_part, time_part) = match raw.split_once("  ") {
            Some((d, t)) => (d, Some(t)),
            None => (raw, None),
        };
        let date = Date::parse(date_part)?;
        let (hour, minute, second) = match time_part {
            None => (0, 0, 0),
            Some(t) => {
                let mut it = t.trim().split(':');
                let hour = parse_component(it.next(), "hour", raw)?;
                let minute = parse_component(it.next(), "minute", raw)?;
                let second = parse_component(it.next(), "second", raw)?;
                if hour > 24 {
                    return Err(format!("Hour out of range in stamp '{}'", raw));
                }
                (hour, minute, second)
            }
        };
        Ok(Self {
            date,
            hour,
            minute,
            second,
        })
    }

    /// Does this stamp have a time part? (design-day rows do not)
    pub fn has_time(&self) -> bool {
        self.hour > 0
    }
}

fn parse_component(part: Option<&str>, name: &str, raw: &str) -> Result<u8, String> {
    part.ok_or_else(|| format!("Missing {} in stamp '{}'", name, raw))?
        .trim()
        .parse()
        .map_err(|_| format!("Invalid {} in stamp '{}'", name, raw))
}
