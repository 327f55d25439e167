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

use crate::ResultRow;
use std::io::Read;

/// The column EnergyPlus writes its timestamps into
pub const DATE_TIME_COLUMN: &str = "Date/Time";

/// A result CSV partitioned into per-zone fact rows. A column belongs
/// to every zone whose name appears (case-insensitively) in its
/// header; columns naming no known zone are dropped, as are cells that
/// do not parse as numbers.
#[derive(Clone, Debug, Default)]
pub struct ZoneTable {
    /// The fact rows, in CSV order (by record, then by zone)
    pub rows: Vec<ResultRow>,

    /// How many timestep records the CSV contained
    pub record_count: usize,
}

impl ZoneTable {
    /// Reads an EnergyPlus result CSV and partitions it by zone.
    pub fn from_csv<R: Read>(reader: R, zones: &[String]) -> Result<Self, String> {
        let mut rdr = csv::ReaderBuilder::new().from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| format!("Could not read result CSV header: {}", e))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let stamp_col = headers
            .iter()
            .position(|h| h.trim() == DATE_TIME_COLUMN)
            .ok_or_else(|| {
                format!(
                    "Result CSV has no '{}' column... found {} columns",
                    DATE_TIME_COLUMN,
                    headers.len()
                )
            })?;

        // which columns belong to which zone
        let mut zone_columns: Vec<(String, Vec<usize>)> = Vec::with_capacity(zones.len());
        for zone in zones {
            let needle = zone.to_lowercase();
            let cols: Vec<usize> = headers
                .iter()
                .enumerate()
                .filter(|(i, h)| *i != stamp_col && h.to_lowercase().contains(&needle))
                .map(|(i, _)| i)
                .collect();
            zone_columns.push((zone.clone(), cols));
        }

        let mut table = ZoneTable::default();
        for record in rdr.records() {
            let record =
                record.map_err(|e| format!("Could not read result CSV record: {}", e))?;
            let stamp = match record.get(stamp_col) {
                Some(s) => s.trim().to_string(),
                None => continue,
            };
            table.record_count += 1;

            for (zone, cols) in &zone_columns {
                for &col in cols {
                    let raw = match record.get(col) {
                        Some(v) => v.trim(),
                        None => continue,
                    };
                    // skip anything that is not a number
                    let value: f64 = match raw.parse() {
                        Ok(v) => v,
                        Err(_) => continue,
                    };
                    table.rows.push(ResultRow {
                        zone: zone.clone(),
                        variable: headers[col].clone(),
                        stamp: stamp.clone(),
                        value,
                    });
                }
            }
        }

        Ok(table)
    }
}
