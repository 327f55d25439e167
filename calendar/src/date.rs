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

use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An extremely simple Date object. We don't
/// need anything else, I think.
/// It does not consider years at all, because EnergyPlus
/// output does not carry them either.
/// Days and Months are counted from 1
/// (e.g. January is 1, not 0)
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Hash)]
pub struct Date {
    /// Months of the year, from 1 to 12
    pub month: u8,

    /// Day of the month, from 1 to N
    pub day: u8,
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}", self.month, self.day)
    }
}

impl PartialOrd for Date {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Date {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.month.cmp(&other.month) {
            Ordering::Less => Ordering::Less,
            Ordering::Greater => Ordering::Greater,
            Ordering::Equal => self.day.cmp(&other.day),
        }
    }
}

impl Date {
    /// Parses a `MM/DD` string. Components do not need to be
    /// zero-padded, so `1/8` and `01/08` describe the same day.
    ///
    /// ```
    /// use calendar::Date;
    ///
    /// let d = Date::parse("1/8").unwrap();
    /// assert_eq!(d, Date { month: 1, day: 8 });
    /// assert_eq!(format!("{}", d), "01/08");
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let (month, day) = s
            .split_once('/')
            .ok_or_else(|| format!("Expecting a 'MM/DD' date... found '{}'", s))?;
        let month: u8 = month
            .trim()
            .parse()
            .map_err(|_| format!("Invalid month in date '{}'", s))?;
        let day: u8 = day
            .trim()
            .parse()
            .map_err(|_| format!("Invalid day in date '{}'", s))?;
        if month < 1 || month > 12 {
            return Err(format!("Month out of range in date '{}'", s));
        }
        if day < 1 || day > 31 {
            return Err(format!("Day out of range in date '{}'", s));
        }
        Ok(Self { month, day })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() -> Result<(), String> {
        let d = Date::parse("01/08")?;
        assert_eq!(d.month, 1);
        assert_eq!(d.day, 8);

        // no padding needed
        let d = Date::parse("1/8")?;
        assert_eq!(d.month, 1);
        assert_eq!(d.day, 8);

        // surrounding whitespace, as found in raw CSV cells
        let d = Date::parse(" 12/31 ")?;
        assert_eq!(d.month, 12);
        assert_eq!(d.day, 31);

        assert!(Date::parse("").is_err());
        assert!(Date::parse("01-08").is_err());
        assert!(Date::parse("13/01").is_err());
        assert!(Date::parse("01/32").is_err());
        assert!(Date::parse("0/8").is_err());
        assert!(Date::parse("banana/8").is_err());
        Ok(())
    }

    #[test]
    fn test_display_is_padded() -> Result<(), String> {
        let d = Date::parse("1/8")?;
        assert_eq!(format!("{}", d), "01/08");

        // display/parse round trip is identity for padded input
        let d = Date::parse("11/28")?;
        assert_eq!(format!("{}", d), "11/28");
        Ok(())
    }

    #[test]
    fn test_ord() -> Result<(), String> {
        let jan = Date::parse("01/31")?;
        let feb = Date::parse("02/01")?;
        assert!(jan < feb);
        assert!(feb > jan);
        assert_eq!(jan, Date::parse("1/31")?);
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde() {
        let v = r#"{"month": 9,"day": 4}"#;
        let d: Date = serde_json::from_str(v).unwrap();
        assert_eq!(d.month, 9);
        assert_eq!(d.day, 4);
    }
}
