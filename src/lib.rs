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

//! The main `eplusdata` crate, combining pretty much every other
//! development: a data-access API over EnergyPlus simulation results.
//!
//! Uploaded IDF/EPW files are versioned in SQLite, simulation runs
//! shell out to the EnergyPlus executable, and the resulting per-zone
//! time series (energy, temperature, humidity, thermal comfort) are
//! queryable by simulation, zone, date and hour.

/// The serving options and entry point
pub mod serve;
pub use serve::{serve, ServeOptions};

// Re-exports
pub use calendar::{Date, Stamp, TimeFilter};
pub use results::{
    collect, needles, sum, summarize, to_kwh, ResultRow, RoomSummary, Samples, VariableMatch,
    ZoneTable, JOULES_PER_KWH,
};
pub use runner::{ingest, launch, run_simulation, RunArtifacts, RunOptions, RunReport};
pub use server::{router, AppState};
pub use store::{InputFile, InputFileSummary, Simulation, Store, DEFAULT_ZONES};
