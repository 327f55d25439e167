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

//! The result layer: EnergyPlus writes one wide CSV per run, with one
//! column per reported variable or meter and one row per timestep.
//! This crate partitions that table into per-zone fact rows and
//! implements the filter+reduce queries the API exposes (energy sums,
//! comfort/temperature/humidity series, zone summaries).

/// One cell of the fact table
pub mod row;
pub use row::ResultRow;

/// Selecting variables by name
pub mod matcher;
pub use matcher::{needles, VariableMatch};

/// The filter+reduce queries
pub mod aggregate;
pub use aggregate::{collect, sum, summarize, to_kwh, RoomSummary, Samples, JOULES_PER_KWH};

/// CSV ingestion and per-zone partitioning
pub mod zone_table;
pub use zone_table::ZoneTable;
