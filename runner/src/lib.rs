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

//! Drives the external EnergyPlus executable: materializes the stored
//! IDF/EPW pair into a scratch directory, launches the run with CSV
//! output, archives the result file and ingests it into the store as
//! per-zone fact rows.

use results::ZoneTable;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use store::{InputFile, Store};

/// Where and how to run EnergyPlus
#[derive(Clone, Debug)]
pub struct RunOptions {
    /// The EnergyPlus executable; `energyplus` resolves through
    /// `PATH` on a standard install
    pub energyplus_exe: String,

    /// An explicit `Energy+.idd` dictionary, when the executable's
    /// bundled one should not be used
    pub idd_file: Option<String>,

    /// Where result CSVs are archived, one per run
    pub results_dir: PathBuf,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            energyplus_exe: "energyplus".to_string(),
            idd_file: None,
            results_dir: PathBuf::from("res"),
        }
    }
}

/// What a successful run reports back to the API
#[derive(Clone, Debug)]
pub struct RunReport {
    /// The minted run name, e.g. `office_2`
    pub simulation_name: String,

    /// How many timestep records the result CSV contained
    pub results_count: usize,

    /// Where the result CSV was archived
    pub csv_path: PathBuf,

    /// The `Version` object of the IDF, when one was found
    pub idf_version: Option<String>,
}

/// A finished (but not yet ingested) EnergyPlus run. Holds the scratch
/// directory alive until the result CSV has been archived and parsed.
pub struct RunArtifacts {
    _scratch: tempfile::TempDir,
    csv_src: PathBuf,
    prefix: String,
    idf_id: i64,
    epw_id: i64,
    idf_version: Option<String>,
}

/// The launch phase: materializes the inputs into a scratch directory
/// and runs EnergyPlus to completion. Needs no database, so callers
/// can keep serving queries while the simulation (minutes) is in
/// flight. The absence of a result CSV is the run-failed signal,
/// whatever the process exit status said.
pub fn launch(
    idf: &InputFile,
    epw: &InputFile,
    options: &RunOptions,
) -> Result<RunArtifacts, String> {
    let scratch = tempfile::tempdir()
        .map_err(|e| format!("Could not create a scratch directory: {}", e))?;

    let idf_path = scratch.path().join(&idf.filename);
    let epw_path = scratch.path().join(&epw.filename);
    fs::write(&idf_path, &idf.content)
        .map_err(|e| format!("Could not write '{}': {}", idf.filename, e))?;
    fs::write(&epw_path, &epw.content)
        .map_err(|e| format!("Could not write '{}': {}", epw.filename, e))?;

    let prefix = file_stem(&idf.filename);
    let idf_version = idf_version(&idf.content);
    tracing::info!(
        idf = idf.filename,
        epw = epw.filename,
        version = idf_version.as_deref().unwrap_or("?"),
        "launching EnergyPlus"
    );

    let output = build_command(options, &idf_path, &epw_path, scratch.path(), &prefix)
        .output()
        .map_err(|e| {
            format!(
                "Could not launch EnergyPlus '{}': {}",
                options.energyplus_exe, e
            )
        })?;
    tracing::debug!(status = ?output.status, "EnergyPlus finished");

    let csv_src = match first_csv(scratch.path())? {
        Some(p) => p,
        None => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!(
                "No CSV found in the scratch directory after the simulation. {}",
                stderr.trim()
            ));
        }
    };

    Ok(RunArtifacts {
        _scratch: scratch,
        csv_src,
        prefix,
        idf_id: idf.id,
        epw_id: epw.id,
        idf_version,
    })
}

/// The ingestion phase: mints the run name, archives the result CSV
/// and records the per-zone fact rows. Fast; this is the only phase
/// that touches the database.
pub fn ingest(
    store: &mut Store,
    run: &RunArtifacts,
    options: &RunOptions,
) -> Result<RunReport, String> {
    let simulation_name = store.next_simulation_name(&run.prefix)?;

    fs::create_dir_all(&options.results_dir)
        .map_err(|e| format!("Could not create the results directory: {}", e))?;
    let csv_path = options.results_dir.join(format!("{}.csv", simulation_name));
    fs::copy(&run.csv_src, &csv_path)
        .map_err(|e| format!("Could not archive the result CSV: {}", e))?;

    let zones = store.zones()?;
    let file = fs::File::open(&run.csv_src)
        .map_err(|e| format!("Could not read the result CSV: {}", e))?;
    let table = ZoneTable::from_csv(file, &zones)?;

    let simulation_id = store.create_simulation(&simulation_name, run.idf_id, run.epw_id)?;
    store.insert_results(simulation_id, &table.rows)?;
    tracing::info!(
        simulation = simulation_name,
        records = table.record_count,
        rows = table.rows.len(),
        "run ingested"
    );

    Ok(RunReport {
        simulation_name,
        results_count: table.record_count,
        csv_path,
        idf_version: run.idf_version.clone(),
    })
}

/// Runs EnergyPlus on a stored IDF/EPW pair and ingests the results.
///
/// The run name is minted from the IDF's file stem (`office.idf` runs
/// become `office_1`, `office_2`, ...). Callers that share the store
/// behind a lock should call [`launch`] and [`ingest`] separately so
/// the lock is not held while EnergyPlus runs.
pub fn run_simulation(
    store: &mut Store,
    idf: &InputFile,
    epw: &InputFile,
    options: &RunOptions,
) -> Result<RunReport, String> {
    let run = launch(idf, epw, options)?;
    ingest(store, &run, options)
}

/// The EnergyPlus command line for one run: weather file, scratch
/// output directory, output prefix, `C`-suffixed (CSV-friendly) file
/// naming, ReadVarsESO post-processing and ExpandObjects
/// pre-processing.
fn build_command(
    options: &RunOptions,
    idf_path: &Path,
    epw_path: &Path,
    out_dir: &Path,
    prefix: &str,
) -> Command {
    let mut cmd = Command::new(&options.energyplus_exe);
    cmd.arg("-w")
        .arg(epw_path)
        .arg("-d")
        .arg(out_dir)
        .arg("-p")
        .arg(prefix)
        .arg("-s")
        .arg("C")
        .arg("-r")
        .arg("-x");
    if let Some(idd) = &options.idd_file {
        cmd.arg("-i").arg(idd);
    }
    cmd.arg(idf_path);
    cmd
}

/// The first `.csv` in a directory, in name order.
fn first_csv(dir: &Path) -> Result<Option<PathBuf>, String> {
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Could not list the scratch directory: {}", e))?;
    let mut csvs: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    csvs.sort();
    Ok(csvs.into_iter().next())
}

/// Everything before the first dot of a filename; run names and
/// output prefixes derive from it.
pub fn file_stem(filename: &str) -> String {
    filename
        .split('.')
        .next()
        .unwrap_or(filename)
        .to_string()
}

/// Best-effort scan of the IDF `Version` object, e.g. `Version, 9.4;`
/// (the object may span lines). Returns the version identifier text.
pub fn idf_version(content: &str) -> Option<String> {
    // lowercasing ASCII-only keeps byte offsets valid in `content`
    let lower = content.to_ascii_lowercase();
    let mut from = 0;
    while let Some(pos) = lower[from..].find("version") {
        let start = from + pos;
        // must be the start of an object, not part of another word
        let is_object_start = lower[..start]
            .trim_end()
            .ends_with([';', '!'].as_ref())
            || lower[..start].trim().is_empty();
        let after = &content[start + "version".len()..];
        if let Some(rest) = after.trim_start().strip_prefix(',') {
            if is_object_start {
                let end = rest.find([';', ','].as_ref()).unwrap_or(rest.len());
                let version = rest[..end].trim();
                if !version.is_empty() {
                    return Some(version.to_string());
                }
            }
        }
        from = start + "version".len();
    }
    None
}
