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
use axum::extract::{Query, State};
use axum::Json;
use calendar::TimeFilter;
use results::{collect, needles, sum, summarize, to_kwh, Samples, VariableMatch};
use serde::Deserialize;
use serde_json::{json, Value};
use store::Store;

/// What every aggregation endpoint accepts. `room` and `meter` are
/// required by some endpoints and validated there; the rest defaults
/// sensibly (`simulation_name` falls back to the latest run, and an
/// absent `date`/`hour` leaves that axis unrestricted).
#[derive(Deserialize, Default)]
pub struct AggQuery {
    /// The run to query; the latest one when omitted
    pub simulation_name: Option<String>,

    /// `MM/DD`, unpadded accepted
    pub date: Option<String>,

    /// `HH`, e.g. `01` or `14`
    pub hour: Option<String>,

    /// The zone name, e.g. `TESLA`
    pub room: Option<String>,

    /// Substring of the variable name, e.g. `InteriorEquipment`
    pub meter: Option<String>,
}

impl AggQuery {
    fn filter(&self) -> TimeFilter {
        TimeFilter::new(self.date.as_deref(), self.hour.as_deref())
    }

    fn room(&self) -> Result<&str, ApiError> {
        self.room
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("Missing 'room' parameter".to_string()))
    }

    fn meter(&self) -> Result<&str, ApiError> {
        self.meter
            .as_deref()
            .ok_or_else(|| ApiError::bad_request("Missing 'meter' parameter".to_string()))
    }
}

/// The named run, or the most recent one when none was named.
fn resolve_simulation(store: &Store, name: &Option<String>) -> Result<String, ApiError> {
    if let Some(name) = name {
        return Ok(name.clone());
    }
    store
        .latest_simulation_name()?
        .ok_or_else(|| ApiError::not_found("No simulation found in the database".to_string()))
}

/// 404s unless the run has rows for the zone.
fn check_zone(store: &Store, simulation: &str, zone: &str) -> Result<(), ApiError> {
    if store.has_zone_rows(simulation, zone)? {
        Ok(())
    } else {
        Err(ApiError::not_found(
            "Simulation or zone not found".to_string(),
        ))
    }
}

/// `GET /sum_all_energy/` — zone electricity across the whole
/// building, in Joules and kWh
pub async fn sum_all_energy(
    State(state): State<AppState>,
    Query(query): Query<AggQuery>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    let simulation = resolve_simulation(&store, &query.simulation_name)?;
    let filter = query.filter();

    let rows = store.rows_for(&simulation, None, &filter)?;
    let total = sum(
        &rows,
        &filter,
        &VariableMatch::prefix(needles::ZONE_ELECTRICITY),
    );

    Ok(Json(json!({
        "simulation_name": simulation,
        "date": query.date,
        "hour": query.hour,
        "total_energy_all_fields": total,
        "total_energy_all_fields_kwh": to_kwh(total),
    })))
}

/// `GET /sum_room_energy/?room=` — zone electricity of one zone
pub async fn sum_room_energy(
    State(state): State<AppState>,
    Query(query): Query<AggQuery>,
) -> Result<Json<Value>, ApiError> {
    let room = query.room()?.to_string();
    let store = state.store()?;
    let simulation = resolve_simulation(&store, &query.simulation_name)?;
    check_zone(&store, &simulation, &room)?;
    let filter = query.filter();

    let rows = store.rows_for(&simulation, Some(&room), &filter)?;
    let total = sum(
        &rows,
        &filter,
        &VariableMatch::prefix(needles::ZONE_ELECTRICITY),
    );

    Ok(Json(json!({
        "simulation_name": simulation,
        "date": query.date,
        "hour": query.hour,
        "room": room,
        "total_energy_room": total,
        "total_energy_room_kwh": to_kwh(total),
    })))
}

/// `GET /sum_by_meter/?meter=` — any variable matching the meter
/// fragment, across the whole building; everything when omitted
pub async fn sum_by_meter(
    State(state): State<AppState>,
    Query(query): Query<AggQuery>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    let simulation = resolve_simulation(&store, &query.simulation_name)?;
    let filter = query.filter();

    let rows = store.rows_for(&simulation, None, &filter)?;
    let total = sum(
        &rows,
        &filter,
        &VariableMatch::substring(query.meter.as_deref()),
    );

    Ok(Json(json!({
        "simulation_name": simulation,
        "date": query.date,
        "hour": query.hour,
        "meter": query.meter,
        "total_energy_meter": total,
        "total_energy_meter_kwh": to_kwh(total),
    })))
}

/// `GET /sum_by_room_and_meter/?room=&meter=`
pub async fn sum_by_room_and_meter(
    State(state): State<AppState>,
    Query(query): Query<AggQuery>,
) -> Result<Json<Value>, ApiError> {
    let room = query.room()?.to_string();
    let meter = query.meter()?.to_string();
    let store = state.store()?;
    let simulation = resolve_simulation(&store, &query.simulation_name)?;
    check_zone(&store, &simulation, &room)?;
    let filter = query.filter();

    let rows = store.rows_for(&simulation, Some(&room), &filter)?;
    let total = sum(&rows, &filter, &VariableMatch::substring(Some(&meter)));

    Ok(Json(json!({
        "simulation_name": simulation,
        "meter": meter,
        "room": room,
        "date": query.date,
        "hour": query.hour,
        "total_energy_room_meter": total,
        "total_energy_room_meter_kwh": to_kwh(total),
    })))
}

/// `GET /pmv_by_room/?room=` — the Fanger PMV series of one zone
pub async fn pmv_by_room(
    State(state): State<AppState>,
    Query(query): Query<AggQuery>,
) -> Result<Json<Value>, ApiError> {
    let room = query.room()?.to_string();
    let store = state.store()?;
    let simulation = resolve_simulation(&store, &query.simulation_name)?;
    check_zone(&store, &simulation, &room)?;
    let filter = query.filter();

    let rows = store.rows_for(&simulation, Some(&room), &filter)?;
    let values = collect(&rows, &filter, &VariableMatch::substring(Some(needles::PMV)));

    Ok(Json(json!({
        "simulation_name": simulation,
        "room": room,
        "date": query.date,
        "hour": query.hour,
        "pmv_values": values,
    })))
}

/// `GET /temperature_by_room/?room=` — the thermostat air
/// temperature series of one zone
pub async fn temperature_by_room(
    State(state): State<AppState>,
    Query(query): Query<AggQuery>,
) -> Result<Json<Value>, ApiError> {
    let room = query.room()?.to_string();
    let store = state.store()?;
    let simulation = resolve_simulation(&store, &query.simulation_name)?;
    check_zone(&store, &simulation, &room)?;
    let filter = query.filter();

    let rows = store.rows_for(&simulation, Some(&room), &filter)?;
    let values = collect(
        &rows,
        &filter,
        &VariableMatch::substring(Some(needles::TEMPERATURE)),
    );

    Ok(Json(json!({
        "simulation_name": simulation,
        "room": room,
        "date": query.date,
        "hour": query.hour,
        "temperature_values": values,
    })))
}

/// `GET /room_summary/?room=` — energy totals plus the PMV,
/// temperature and humidity series of one zone, in one pass
pub async fn room_summary(
    State(state): State<AppState>,
    Query(query): Query<AggQuery>,
) -> Result<Json<Value>, ApiError> {
    let room = query.room()?.to_string();
    let store = state.store()?;
    let simulation = resolve_simulation(&store, &query.simulation_name)?;
    check_zone(&store, &simulation, &room)?;
    let filter = query.filter();

    let rows = store.rows_for(&simulation, Some(&room), &filter)?;
    let summary = summarize(&rows, &filter);

    Ok(Json(json!({
        "simulation_name": simulation,
        "room": room,
        "date": query.date,
        "hour": query.hour,
        "data": {
            "total_energy_kwh": to_kwh(summary.total_energy),
            "detailed_energy_kwh": {
                "equipment": to_kwh(summary.energy_equipment),
                "lights": to_kwh(summary.energy_lights),
            },
            "total_energy": summary.total_energy,
            "detailed_energy": {
                "equipment": summary.energy_equipment,
                "lights": summary.energy_lights,
            },
            "pmv_values": Samples::from(summary.pmv),
            "temperature_values": Samples::from(summary.temperature),
            "humidity_values": Samples::from(summary.humidity),
        },
    })))
}
