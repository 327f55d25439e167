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

//! SQLite persistence for the EnergyPlus data API: uploaded input
//! files with their version lineage, the zones catalogue, the
//! simulations catalogue, and the narrow
//! `(simulation, zone, variable, stamp) -> value` fact table.

use rusqlite::Connection;
use std::path::Path;

/// Input-file rows and version lineage
pub mod files;
pub use files::{InputFile, InputFileSummary};

/// Zones, simulations and the fact table
pub mod sims;
pub use sims::Simulation;

/// The zones of the building this deployment models. Used to seed the
/// `zones` table on a fresh database; after that, the table is the
/// source of truth.
pub const DEFAULT_ZONES: [&str; 8] = [
    "BUREAUETAGE",
    "HALLRDC",
    "LOCALSERVEURS",
    "LOCALTECH",
    "LUMIERE",
    "NOBEL",
    "TESLA",
    "TURING",
];

/// A handle over the SQLite database. All operations report errors as
/// strings, ready to be surfaced through the API.
pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Opens (and initializes, if needed) the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let conn = Connection::open(path)
            .map_err(|e| format!("Could not open the database: {}", e))?;
        Self::from_connection(conn)
    }

    /// An in-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Self, String> {
        let conn = Connection::open_in_memory()
            .map_err(|e| format!("Could not open the database: {}", e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, String> {
        conn.execute_batch(SCHEMA).map_err(db_err)?;
        Ok(Self { conn })
    }

    /// The current wall-clock time, as stored in `upload_date` and
    /// `created` columns.
    pub(crate) fn now() -> String {
        chrono::Utc::now().to_rfc3339()
    }
}

/// Maps a rusqlite error into this crate's string errors
pub(crate) fn db_err(e: rusqlite::Error) -> String {
    format!("Database error: {}", e)
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS input_files (
    id                  INTEGER PRIMARY KEY,
    file_type           TEXT NOT NULL,
    filename            TEXT NOT NULL,
    content             TEXT NOT NULL,
    upload_date         TEXT NOT NULL,
    version             INTEGER NOT NULL,
    previous_version_id INTEGER REFERENCES input_files(id)
);
CREATE INDEX IF NOT EXISTS idx_input_files_type ON input_files(file_type);

CREATE TABLE IF NOT EXISTS zones (
    id   INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS simulations (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    idf_file_id INTEGER NOT NULL REFERENCES input_files(id),
    epw_file_id INTEGER NOT NULL REFERENCES input_files(id),
    created     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS results (
    id            INTEGER PRIMARY KEY,
    simulation_id INTEGER NOT NULL REFERENCES simulations(id),
    zone          TEXT NOT NULL,
    variable      TEXT NOT NULL,
    stamp         TEXT NOT NULL,
    month         INTEGER,
    day           INTEGER,
    hour          INTEGER,
    value         REAL NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_results_sim_zone ON results(simulation_id, zone);
CREATE INDEX IF NOT EXISTS idx_results_sim_date ON results(simulation_id, month, day);
";
