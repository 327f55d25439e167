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
use rusqlite::{params, OptionalExtension};
use serde::Serialize;

/// An uploaded IDF or EPW file, content included.
#[derive(Clone, Debug, Serialize)]
pub struct InputFile {
    /// Row id, as referenced by simulations and version lineage
    pub id: i64,

    /// `idf` or `epw`
    pub file_type: String,

    /// The filename it was uploaded under
    pub filename: String,

    /// The full text content
    pub content: String,

    /// When it was uploaded (RFC 3339)
    pub upload_date: String,

    /// 1 for fresh uploads; `save_new_version` counts upward
    /// per filename
    pub version: i64,

    /// The file this one was derived from, if any
    pub previous_version_id: Option<i64>,
}

/// A catalogue entry: everything but the content.
#[derive(Clone, Debug, Serialize)]
pub struct InputFileSummary {
    /// Row id
    pub id: i64,

    /// The filename it was uploaded under
    pub filename: String,

    /// When it was uploaded (RFC 3339)
    pub upload_date: String,

    /// Version number within its filename lineage
    pub version: i64,
}

impl Store {
    /// Stores a freshly uploaded input file, at version 1.
    pub fn insert_input_file(
        &self,
        file_type: &str,
        filename: &str,
        content: &str,
    ) -> Result<i64, String> {
        self.conn
            .execute(
                "INSERT INTO input_files (file_type, filename, content, upload_date, version)
                 VALUES (?1, ?2, ?3, ?4, 1)",
                params![file_type, filename, content, Self::now()],
            )
            .map_err(db_err)?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetches one input file, content included.
    pub fn input_file(&self, id: i64) -> Result<Option<InputFile>, String> {
        self.conn
            .query_row(
                "SELECT id, file_type, filename, content, upload_date, version, previous_version_id
                 FROM input_files WHERE id = ?1",
                params![id],
                |row| {
                    Ok(InputFile {
                        id: row.get(0)?,
                        file_type: row.get(1)?,
                        filename: row.get(2)?,
                        content: row.get(3)?,
                        upload_date: row.get(4)?,
                        version: row.get(5)?,
                        previous_version_id: row.get(6)?,
                    })
                },
            )
            .optional()
            .map_err(db_err)
    }

    /// The catalogue of uploaded files of one type (`idf` or `epw`).
    pub fn input_files_by_type(&self, file_type: &str) -> Result<Vec<InputFileSummary>, String> {
        let mut stmt = self
            .conn
            .prepare(
                "SELECT id, filename, upload_date, version
                 FROM input_files WHERE file_type = ?1 ORDER BY id",
            )
            .map_err(db_err)?;
        let rows = stmt
            .query_map(params![file_type], |row| {
                Ok(InputFileSummary {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    upload_date: row.get(2)?,
                    version: row.get(3)?,
                })
            })
            .map_err(db_err)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(db_err)
    }

    /// Overwrites the content of a file in place. Returns whether the
    /// id matched anything.
    pub fn update_input_file_content(&self, id: i64, content: &str) -> Result<bool, String> {
        let n = self
            .conn
            .execute(
                "UPDATE input_files SET content = ?1 WHERE id = ?2",
                params![content, id],
            )
            .map_err(db_err)?;
        Ok(n > 0)
    }

    /// Stores `content` as a new version derived from file `id`. The
    /// new row keeps the origin's type, takes `filename` (or the
    /// origin's), gets version `count(filename) + 1`, and points back
    /// at the origin. Returns the new id, or `Ok(None)` when the
    /// origin does not exist.
    pub fn save_new_version(
        &self,
        id: i64,
        content: &str,
        filename: Option<&str>,
    ) -> Result<Option<i64>, String> {
        let orig = match self.input_file(id)? {
            Some(f) => f,
            None => return Ok(None),
        };
        let filename = filename.unwrap_or(&orig.filename);

        let existing: i64 = self
            .conn
            .query_row(
                "SELECT COUNT(*) FROM input_files WHERE filename = ?1",
                params![filename],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        self.conn
            .execute(
                "INSERT INTO input_files
                 (file_type, filename, content, upload_date, version, previous_version_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    orig.file_type,
                    filename,
                    content,
                    Self::now(),
                    existing + 1,
                    orig.id
                ],
            )
            .map_err(db_err)?;
        Ok(Some(self.conn.last_insert_rowid()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_and_fetch() -> Result<(), String> {
        let store = Store::open_in_memory()?;
        let id = store.insert_input_file("idf", "office.idf", "Version, 9.4;")?;

        let f = store.input_file(id)?.expect("file should exist");
        assert_eq!(f.file_type, "idf");
        assert_eq!(f.filename, "office.idf");
        assert_eq!(f.content, "Version, 9.4;");
        assert_eq!(f.version, 1);
        assert!(f.previous_version_id.is_none());

        assert!(store.input_file(id + 100)?.is_none());
        Ok(())
    }

    #[test]
    fn test_catalogue_by_type() -> Result<(), String> {
        let store = Store::open_in_memory()?;
        store.insert_input_file("idf", "a.idf", "")?;
        store.insert_input_file("epw", "w.epw", "")?;
        store.insert_input_file("idf", "b.idf", "")?;

        let idfs = store.input_files_by_type("idf")?;
        assert_eq!(idfs.len(), 2);
        assert_eq!(idfs[0].filename, "a.idf");
        assert_eq!(idfs[1].filename, "b.idf");
        assert_eq!(store.input_files_by_type("epw")?.len(), 1);
        assert!(store.input_files_by_type("dxf")?.is_empty());
        Ok(())
    }

    #[test]
    fn test_update_in_place() -> Result<(), String> {
        let store = Store::open_in_memory()?;
        let id = store.insert_input_file("epw", "w.epw", "old")?;

        assert!(store.update_input_file_content(id, "new")?);
        assert_eq!(store.input_file(id)?.unwrap().content, "new");
        assert!(!store.update_input_file_content(id + 1, "new")?);
        Ok(())
    }

    #[test]
    fn test_version_lineage() -> Result<(), String> {
        let store = Store::open_in_memory()?;
        let v1 = store.insert_input_file("idf", "office.idf", "v1")?;

        let v2 = store
            .save_new_version(v1, "v2", None)?
            .expect("origin exists");
        let f2 = store.input_file(v2)?.unwrap();
        assert_eq!(f2.filename, "office.idf");
        assert_eq!(f2.version, 2);
        assert_eq!(f2.previous_version_id, Some(v1));

        // a rename starts its own counter
        let v3 = store
            .save_new_version(v2, "v3", Some("office_b.idf"))?
            .expect("origin exists");
        let f3 = store.input_file(v3)?.unwrap();
        assert_eq!(f3.filename, "office_b.idf");
        assert_eq!(f3.version, 1);
        assert_eq!(f3.previous_version_id, Some(v2));

        // unknown origin
        assert!(store.save_new_version(9999, "x", None)?.is_none());
        Ok(())
    }
}
