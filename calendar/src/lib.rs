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

#![deny(missing_docs)]

//! An extremely simple calendar library for working with EnergyPlus
//! result timestamps. EnergyPlus reports simulation time as
//! `MM/DD  HH:MM:SS` with no year at all, so this crate only knows
//! about months, days and times of day. Days and months are counted
//! from 1 (e.g., January is 1, not 0), and hours run from 01 to 24
//! because EnergyPlus reports midnight as hour 24 of the previous day.

/// The year-less calendar day
pub mod date;
pub use date::Date;

/// An EnergyPlus `Date/Time` cell, parsed
pub mod stamp;
pub use stamp::Stamp;

/// Date/hour restrictions on result rows
pub mod filter;
pub use filter::TimeFilter;
