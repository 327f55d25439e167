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

use crate::{db_err, Store};
use calendar::{Stamp, TimeFilter};
use results::ResultRow;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, OptionalExtension};
use serde::Serialize;

/// A recorded simulation run, pointing at the exact input files it
/// was launched from.
#[derive(Clone, Debug, Serialize)]
pub struct Simulation {
    /// Row id
    pub id: i64,

    /// The unique run name, e.g. `office_2`
    pub name: String,

    /// The IDF it ran with
    pub idf_file_id: i64,

    /// The EPW it ran with
    pub epw_file_id: i64,

    /// When it was recorded (RFC 3339)
    pub created: String,
}

impl Store {
    /// Inserts the zones that are not already in the catalogue.
    /// Returns how many were added.
    pub fn seed_zones(&self, names: &[String]) -> Result<usize, String> {
        let mut added = 0;
        for name in names {
            let n = self
                .conn
                .execute(
                    "INSERT OR IGNORE INTO zones (name) VALUES (?1)",
                    params![name],
                )
                .map_err(db_err)?;
            added += n;
        }
        Ok(added)
    }

    /// The zone catalogue, alphabetical.
    pub fn zones(&self) -> Result<Vec<String>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM zones ORDER BY name")
            .map_err(db_err)?;
        let rows = stmt.query_map([], |row| row.get(0)).map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    /// Records a simulation run. The name must be unique; use
    /// [`Store::next_simulation_name`] to mint one.
    pub fn create_simulation(
        &self,
        name: &str,
        idf_file_id: i64,
        epw_file_id: i64,
    ) -> Result<i64, String> {
        self.conn
            .execute(
                "INSERT INTO simulations (name, idf_file_id, epw_file_id, created)
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, idf_file_id, epw_file_id, Self::now()],
            )
            .map_err(db_err)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Every recorded simulation name, alphabetical.
    pub fn simulation_names(&self) -> Result<Vec<String>, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM simulations ORDER BY name")
            .map_err(db_err)?;
        let rows = stmt.query_map([], |row| row.get(0)).map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    /// The most recently recorded simulation, used as the default
    /// when a query names none.
    pub fn latest_simulation_name(&self) -> Result<Option<String>, String> {
        self.conn
            .query_row(
                "SELECT name FROM simulations ORDER BY created DESC, id DESC LIMIT 1",
                [],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)
    }

    /// Fetches a simulation by its run name.
    pub fn simulation_by_name(&self, name: &str) -> Result<Option<Simulation>, String> {
        self.conn
            .query_row(
                "SELECT id, name, idf_file_id, epw_file_id, created
                 FROM simulations WHERE name = ?1",
                params![name],
                |row| {
                    Ok(Simulation {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        idf_file_id: row.get(2)?,
                        epw_file_id: row.get(3)?,
                        created: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(db_err)
    }

    /// Mints the next run name for a base name: `base_{n+1}`, where
    /// `n` counts the runs already recorded as `base` or `base_<k>`.
    pub fn next_simulation_name(&self, base: &str) -> Result<String, String> {
        let mut stmt = self
            .conn
            .prepare("SELECT name FROM simulations WHERE name LIKE ?1 || '%'")
            .map_err(db_err)?;
        let names = stmt
            .query_map(params![base], |row| row.get::<_, String>(0))
            .map_err(db_err)?;

        let mut count = 0usize;
        for name in names {
            let name = name.map_err(db_err)?;
            let rest = match name.strip_prefix(base) {
                Some(r) => r,
                None => continue,
            };
            let is_run = rest.is_empty()
                || rest
                    .strip_prefix('_')
                    .map(|d| !d.is_empty() && d.bytes().all(|b| b.is_ascii_digit()))
                    .unwrap_or(false);
            if is_run {
                count += 1;
            }
        }
        Ok(format!("{}_{}", base, count + 1))
    }

    /// Inserts the fact rows of one run in a single transaction. The
    /// stamp's month/day/hour are stored alongside the raw text so
    /// queries can restrict on them.
    pub fn insert_results(
        &mut self,
        simulation_id: i64,
        rows: &[ResultRow],
    ) -> Result<usize, String> {
        let tx = self.conn.transaction().map_err(db_err)?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO results
                     (simulation_id, zone, variable, stamp, month, day, hour, value)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                )
                .map_err(db_err)?;
            for row in rows {
                let (month, day, hour) = match Stamp::parse(&row.stamp) {
                    Ok(s) => (
                        Some(s.date.month as i64),
                        Some(s.date.day as i64),
                        s.has_time().then_some(s.hour as i64),
                    ),
                    Err(_) => (None, None, None),
                };
                stmt.execute(params![
                    simulation_id,
                    row.zone,
                    row.variable,
                    row.stamp,
                    month,
                    day,
                    hour,
                    row.value
                ])
                .map_err(db_err)?;
            }
        }
        tx.commit().map_err(db_err)?;
        Ok(rows.len())
    }

    /// Does this run name exist in the catalogue?
    pub fn simulation_exists(&self, name: &str) -> Result<bool, String> {
        Ok(self.simulation_by_name(name)?.is_some())
    }

    /// Does this run have any rows for this zone? The zone-scoped
    /// endpoints 404 when it does not.
    pub fn has_zone_rows(&self, simulation: &str, zone: &str) -> Result<bool, String> {
        self.conn
            .query_row(
                "SELECT EXISTS (
                     SELECT 1 FROM results r
                     JOIN simulations s ON s.id = r.simulation_id
                     WHERE s.name = ?1 AND r.zone = ?2
                 )",
                params![simulation, zone],
                |row| row.get(0),
            )
            .map_err(db_err)
    }

    /// Fetches the fact rows of one run, optionally restricted to a
    /// zone and to the date/hour of a [`TimeFilter`]. The filter is
    /// applied in SQL only when its components describe an actual
    /// day/hour; the aggregation layer re-checks the raw stamps, so a
    /// nonsensical restriction matches nothing rather than failing.
    pub fn rows_for(
        &self,
        simulation: &str,
        zone: Option<&str>,
        filter: &TimeFilter,
    ) -> Result<Vec<ResultRow>, String> {
        let mut sql = String::from(
            "SELECT r.zone, r.variable, r.stamp, r.value FROM results r
             JOIN simulations s ON s.id = r.simulation_id
             WHERE s.name = ?1",
        );
        let mut args: Vec<Value> = vec![simulation.to_string().into()];

        if let Some(zone) = zone {
            args.push(zone.to_string().into());
            sql.push_str(&format!(" AND r.zone = ?{}", args.len()));
        }
        if let Some(date) = filter.date() {
            args.push(Value::Integer(date.month as i64));
            sql.push_str(&format!(" AND r.month = ?{}", args.len()));
            args.push(Value::Integer(date.day as i64));
            sql.push_str(&format!(" AND r.day = ?{}", args.len()));
        }
        if let Some(hour) = filter.hour() {
            args.push(Value::Integer(hour as i64));
            sql.push_str(&format!(" AND r.hour = ?{}", args.len()));
        }
        sql.push_str(" ORDER BY r.id");

        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let rows = stmt
            .query_map(params_from_iter(args), |row| {
                Ok(ResultRow {
                    zone: row.get(0)?,
                    variable: row.get(1)?,
                    stamp: row.get(2)?,
                    value: row.get(3)?,
                })
            })
            .map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_run(rows: &[ResultRow]) -> Result<(Store, String), String> {
        let mut store = Store::open_in_memory()?;
        let idf = store.insert_input_file("idf", "office.idf", "")?;
        let epw = store.insert_input_file("epw", "weather.epw", "")?;
        let name = store.next_simulation_name("office")?;
        let sim = store.create_simulation(&name, idf, epw)?;
        store.insert_results(sim, rows)?;
        Ok((store, name))
    }

    fn sample_rows() -> Vec<ResultRow> {
        vec![
            ResultRow::new("TESLA", "Electricity:Zone:TESLA [J](Hourly)", "01/08  15:00:00", 1.0),
            ResultRow::new("TESLA", "Electricity:Zone:TESLA [J](Hourly)", "01/08  16:00:00", 2.0),
            ResultRow::new("NOBEL", "Electricity:Zone:NOBEL [J](Hourly)", "01/08  16:00:00", 3.0),
            ResultRow::new("NOBEL", "Electricity:Zone:NOBEL [J](Hourly)", "02/01  16:00:00", 4.0),
        ]
    }

    #[test]
    fn test_zone_seeding_is_idempotent() -> Result<(), String> {
        let store = Store::open_in_memory()?;
        let zones: Vec<String> = crate::DEFAULT_ZONES.iter().map(|z| z.to_string()).collect();
        assert_eq!(store.seed_zones(&zones)?, 8);
        assert_eq!(store.seed_zones(&zones)?, 0);
        assert_eq!(store.zones()?.len(), 8);
        Ok(())
    }

    #[test]
    fn test_run_naming() -> Result<(), String> {
        let store = Store::open_in_memory()?;
        let idf = store.insert_input_file("idf", "office.idf", "")?;
        let epw = store.insert_input_file("epw", "weather.epw", "")?;

        assert_eq!(store.next_simulation_name("office")?, "office_1");
        store.create_simulation("office_1", idf, epw)?;
        assert_eq!(store.next_simulation_name("office")?, "office_2");
        store.create_simulation("office_2", idf, epw)?;
        assert_eq!(store.next_simulation_name("office")?, "office_3");

        // similarly named runs of another model do not count
        store.create_simulation("office_extension_1", idf, epw)?;
        assert_eq!(store.next_simulation_name("office")?, "office_3");
        Ok(())
    }

    #[test]
    fn test_latest_simulation() -> Result<(), String> {
        let store = Store::open_in_memory()?;
        assert!(store.latest_simulation_name()?.is_none());

        let idf = store.insert_input_file("idf", "a.idf", "")?;
        let epw = store.insert_input_file("epw", "w.epw", "")?;
        store.create_simulation("a_1", idf, epw)?;
        store.create_simulation("a_2", idf, epw)?;
        assert_eq!(store.latest_simulation_name()?, Some("a_2".to_string()));

        let names = store.simulation_names()?;
        assert_eq!(names, vec!["a_1".to_string(), "a_2".to_string()]);
        Ok(())
    }

    #[test]
    fn test_rows_round_trip() -> Result<(), String> {
        let (store, name) = store_with_run(&sample_rows())?;

        let all = store.rows_for(&name, None, &TimeFilter::default())?;
        assert_eq!(all.len(), 4);
        assert_eq!(all[0].stamp, "01/08  15:00:00");

        let tesla = store.rows_for(&name, Some("TESLA"), &TimeFilter::default())?;
        assert_eq!(tesla.len(), 2);

        assert!(store.has_zone_rows(&name, "TESLA")?);
        assert!(!store.has_zone_rows(&name, "TURING")?);
        assert!(store.simulation_exists(&name)?);
        assert!(!store.simulation_exists("nope")?);
        Ok(())
    }

    #[test]
    fn test_rows_time_restriction() -> Result<(), String> {
        let (store, name) = store_with_run(&sample_rows())?;

        let day = store.rows_for(&name, None, &TimeFilter::new(Some("1/8"), None))?;
        assert_eq!(day.len(), 3);

        let hour = store.rows_for(&name, None, &TimeFilter::new(Some("1/8"), Some("16")))?;
        assert_eq!(hour.len(), 2);

        // a garbage date is not filtered in SQL; the raw-stamp check
        // downstream rejects everything it keeps
        let garbage = store.rows_for(&name, None, &TimeFilter::new(Some("banana"), None))?;
        assert_eq!(garbage.len(), 4);
        Ok(())
    }
}
