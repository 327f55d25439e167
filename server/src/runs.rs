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

use crate::{ApiError, AppState};
use axum::extract::{Path, State};
use axum::Json;
use calendar::TimeFilter;
use serde::Deserialize;
use serde_json::{json, Value};

/// `GET /simulations` — every recorded run name
pub async fn simulations(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    let names = store.simulation_names()?;
    Ok(Json(json!({ "simulations": names })))
}

/// `GET /data/{simulation_name}` — every fact row of one run
pub async fn simulation_data(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    if !store.simulation_exists(&name)? {
        return Err(ApiError::not_found("Simulation not found".to_string()));
    }
    let rows = store.rows_for(&name, None, &TimeFilter::default())?;
    Ok(Json(json!({ "data": rows })))
}

#[derive(Deserialize)]
/// Body of `POST /run_simulation/`
pub struct RunBody {
    /// The stored IDF to run
    pub idf_file_id: i64,

    /// The stored EPW to run against
    pub epw_file_id: i64,
}

/// `POST /run_simulation/` — launch EnergyPlus on a stored IDF/EPW
/// pair and ingest the results.
///
/// The store is only locked around the (fast) ingestion, never while
/// EnergyPlus runs, so queries keep being served during a run.
///
/// A run that fails (EnergyPlus missing, bad model, no CSV produced)
/// is not an HTTP error: the report comes back with `status: "error"`
/// and the message, which is what the front end displays.
pub async fn run(
    State(state): State<AppState>,
    Json(body): Json<RunBody>,
) -> Result<Json<Value>, ApiError> {
    // resolve both inputs before spending minutes on a run
    let (idf, epw) = {
        let store = state.store()?;
        let idf = store.input_file(body.idf_file_id)?;
        let epw = store.input_file(body.epw_file_id)?;
        match (idf, epw) {
            (Some(i), Some(e)) => (i, e),
            _ => {
                return Err(ApiError::not_found(
                    "IDF or EPW file not found".to_string(),
                ))
            }
        }
    };

    let options = state.run_options.clone();
    let launched = tokio::task::spawn_blocking(move || runner::launch(&idf, &epw, &options))
        .await
        .map_err(|e| ApiError::internal(format!("The simulation task panicked: {}", e)))?;

    let report = match launched {
        Ok(run) => {
            let mut store = state.store()?;
            runner::ingest(&mut store, &run, &state.run_options)
        }
        Err(e) => Err(e),
    };

    match report {
        Ok(report) => Ok(Json(json!({
            "status": "success",
            "simulation_name": report.simulation_name,
            "message": format!(
                "Simulation '{}' finished. CSV archived as {}",
                report.simulation_name,
                report.csv_path.display()
            ),
            "results_count": report.results_count,
            "idf_version": report.idf_version,
            "stdout": format!("Simulation '{}' finished successfully.", report.simulation_name),
            "stderr": "",
        }))),
        Err(message) => {
            tracing::warn!(message, "simulation run failed");
            Ok(Json(json!({
                "status": "error",
                "message": message,
                "stdout": "",
                "stderr": message,
            })))
        }
    }
}
