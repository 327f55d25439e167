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

//! Drives the whole router against an in-memory database, the way the
//! web front end does.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use results::ResultRow;
use runner::RunOptions;
use serde_json::{json, Value};
use server::{router, AppState};
use store::Store;
use tower::ServiceExt;

const FRONT: &str = "http://localhost:3000";

/// A database with one finished run of `office.idf`
fn seeded_store() -> Store {
    let mut store = Store::open_in_memory().unwrap();
    store
        .seed_zones(&["TESLA".to_string(), "NOBEL".to_string()])
        .unwrap();

    let idf = store
        .insert_input_file("idf", "office.idf", "Version, 9.4;")
        .unwrap();
    let epw = store
        .insert_input_file("epw", "weather.epw", "LOCATION,Somewhere")
        .unwrap();

    let sim = store.create_simulation("office_1", idf, epw).unwrap();
    let rows = vec![
        ResultRow::new(
            "TESLA",
            "Electricity:Zone:TESLA [J](Hourly)",
            "01/08  15:00:00",
            7_200_000.0,
        ),
        ResultRow::new(
            "TESLA",
            "Electricity:Zone:TESLA [J](Hourly)",
            "01/08  16:00:00",
            3_600_000.0,
        ),
        ResultRow::new(
            "TESLA",
            "InteriorEquipment:Electricity:Zone:TESLA [J](Hourly)",
            "01/08  16:00:00",
            1_200_000.0,
        ),
        ResultRow::new(
            "TESLA",
            "TESLA:Zone Thermostat Air Temperature [C](Hourly)",
            "01/08  16:00:00",
            21.5,
        ),
        ResultRow::new(
            "TESLA",
            "TESLA PEOPLE:Zone Thermal Comfort Fanger Model PMV [](Hourly)",
            "01/08  16:00:00",
            -0.3,
        ),
        ResultRow::new(
            "TESLA",
            "TESLA:Zone Air Relative Humidity [%](Hourly)",
            "01/08  16:00:00",
            43.0,
        ),
        ResultRow::new(
            "NOBEL",
            "Electricity:Zone:NOBEL [J](Hourly)",
            "01/08  16:00:00",
            1_800_000.0,
        ),
    ];
    store.insert_results(sim, &rows).unwrap();
    store
}

fn app() -> Router {
    let state = AppState::new(
        seeded_store(),
        RunOptions {
            energyplus_exe: "definitely-not-energyplus".to_string(),
            idd_file: None,
            results_dir: std::env::temp_dir().join("eplusdata_api_test_res"),
        },
    );
    router(state, FRONT).unwrap()
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let res = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_banner() {
    let app = app();
    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "EnergyPlus Data API");
}

#[tokio::test]
async fn test_simulation_catalogue_and_data() {
    let app = app();

    let (status, body) = get(&app, "/simulations").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["simulations"], json!(["office_1"]));

    let (status, body) = get(&app, "/data/office_1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 7);
    assert_eq!(body["data"][0]["zone"], "TESLA");

    let (status, body) = get(&app, "/data/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Simulation not found");
}

#[tokio::test]
async fn test_input_file_lifecycle() {
    let app = app();

    // upload a new EPW through multipart
    let boundary = "XBOUNDARY";
    let payload = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"city.epw\"\r\n\
         Content-Type: text/plain\r\n\r\nLOCATION,City\r\n--{b}--\r\n",
        b = boundary
    );
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/input_file/upload/?file_type=epw")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(payload))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "ok");
    let new_id = body["new_id"].as_i64().unwrap();

    // it shows up in the catalogue
    let (status, body) = get(&app, "/input_files/?file_type=epw").await;
    assert_eq!(status, StatusCode::OK);
    let files = body.as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|f| f["filename"] == "city.epw"));

    // fetch it back, content included
    let (status, body) = get(&app, &format!("/input_file/by_id/{}", new_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "LOCATION,City");
    assert_eq!(body["file_type"], "epw");

    // edit in place
    let (status, _) = post_json(
        &app,
        &format!("/input_file/update/{}", new_id),
        json!({ "content": "LOCATION,Elsewhere" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (_, body) = get(&app, &format!("/input_file/by_id/{}", new_id)).await;
    assert_eq!(body["content"], "LOCATION,Elsewhere");

    // branch a new version
    let (status, body) = post_json(
        &app,
        &format!("/input_file/save_new_version/{}", new_id),
        json!({ "content": "LOCATION,Future" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["new_id"].as_i64().unwrap() > new_id);

    // bad ids
    let (status, body) = get(&app, "/input_file/by_id/not-a-number").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Invalid id");
    let (status, _) = get(&app, "/input_file/by_id/99999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_files_by_simulation() {
    let app = app();
    let (status, body) = get(&app, "/input_file/by_simulation/office_1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["idf"]["filename"], "office.idf");
    assert_eq!(body["epw"]["filename"], "weather.epw");
    assert_eq!(body["idf"]["content"], "Version, 9.4;");

    let (status, _) = get(&app, "/input_file/by_simulation/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sum_all_energy() {
    let app = app();

    // the latest simulation is used when none is named
    let (status, body) = get(&app, "/sum_all_energy/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["simulation_name"], "office_1");
    assert_eq!(body["total_energy_all_fields"], json!(12_600_000.0));
    assert_eq!(body["total_energy_all_fields_kwh"], json!(3.5));

    // date + hour restriction, unpadded date
    let (_, body) = get(&app, "/sum_all_energy/?date=1/8&hour=16").await;
    assert_eq!(body["total_energy_all_fields"], json!(5_400_000.0));
    assert_eq!(body["total_energy_all_fields_kwh"], json!(1.5));

    // a day with no rows sums to zero
    let (status, body) = get(&app, "/sum_all_energy/?date=02/01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_energy_all_fields"], json!(0.0));
}

#[tokio::test]
async fn test_sum_room_energy() {
    let app = app();

    let (status, body) = get(&app, "/sum_room_energy/?room=TESLA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_energy_room"], json!(10_800_000.0));
    assert_eq!(body["total_energy_room_kwh"], json!(3.0));

    let (status, body) = get(&app, "/sum_room_energy/?room=TURING").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "Simulation or zone not found");

    let (status, _) = get(&app, "/sum_room_energy/").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_sum_by_meter() {
    let app = app();

    let (status, body) = get(&app, "/sum_by_meter/?meter=InteriorEquipment").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_energy_meter"], json!(1_200_000.0));

    // the fragment is matched case-insensitively
    let (_, body) = get(&app, "/sum_by_meter/?meter=interiorequipment").await;
    assert_eq!(body["total_energy_meter"], json!(1_200_000.0));

    // no meter at all sums every variable
    let (_, body) = get(&app, "/sum_by_meter/").await;
    let everything = 12_600_000.0 + 1_200_000.0 + 21.5 - 0.3 + 43.0;
    let total = body["total_energy_meter"].as_f64().unwrap();
    assert!((total - everything).abs() < 1e-6, "total = {}", total);

    let (_, body) = get(&app, "/sum_by_room_and_meter/?room=TESLA&meter=Electricity:Zone").await;
    assert_eq!(body["total_energy_room_meter"], json!(12_000_000.0));
}

#[tokio::test]
async fn test_series_by_room() {
    let app = app();

    let (status, body) = get(&app, "/pmv_by_room/?room=TESLA").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pmv_values"], json!([-0.3]));

    let (_, body) = get(&app, "/temperature_by_room/?room=TESLA&date=01/08").await;
    assert_eq!(body["temperature_values"], json!([21.5]));

    // an hour with no samples is an empty list, not an error
    let (status, body) = get(&app, "/temperature_by_room/?room=TESLA&hour=03").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["temperature_values"], json!([]));
}

#[tokio::test]
async fn test_room_summary() {
    let app = app();

    let (status, body) = get(&app, "/room_summary/?room=TESLA&date=01/08&hour=16").await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["total_energy"], json!(3_600_000.0));
    assert_eq!(data["total_energy_kwh"], json!(1.0));
    assert_eq!(data["detailed_energy"]["equipment"], json!(1_200_000.0));
    assert_eq!(data["detailed_energy"]["lights"], json!(0.0));

    // one-element series collapse to scalars
    assert_eq!(data["pmv_values"], json!(-0.3));
    assert_eq!(data["temperature_values"], json!(21.5));
    assert_eq!(data["humidity_values"], json!(43.0));

    // without the hour restriction the energy series is longer and
    // the temperature list still has a single sample
    let (_, body) = get(&app, "/room_summary/?room=TESLA").await;
    assert_eq!(body["data"]["total_energy"], json!(10_800_000.0));
}

#[tokio::test]
async fn test_cors_preflight_allows_credentials() {
    let app = app();
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/simulations")
                .header(header::ORIGIN, FRONT)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let headers = res.headers();
    assert_eq!(headers["access-control-allow-origin"], FRONT);
    assert_eq!(headers["access-control-allow-credentials"], "true");
    assert_eq!(headers["access-control-allow-methods"], "GET");
}

/// While EnergyPlus is running, the store lock must stay available:
/// the dashboard keeps polling during a run.
#[cfg(unix)]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_queries_are_served_during_a_run() {
    use std::os::unix::fs::PermissionsExt;
    use std::time::Duration;

    // a stand-in "energyplus" that takes a while and produces no CSV
    let bin_dir = tempfile::tempdir().unwrap();
    let exe = bin_dir.path().join("slow_energyplus");
    std::fs::write(&exe, "#!/bin/sh\nsleep 2\n").unwrap();
    std::fs::set_permissions(&exe, std::fs::Permissions::from_mode(0o755)).unwrap();

    let state = AppState::new(
        seeded_store(),
        RunOptions {
            energyplus_exe: exe.to_string_lossy().to_string(),
            idd_file: None,
            results_dir: std::env::temp_dir().join("eplusdata_api_test_res"),
        },
    );
    let app = router(state, FRONT).unwrap();

    let run_app = app.clone();
    let run = tokio::spawn(async move {
        post_json(
            &run_app,
            "/run_simulation/",
            json!({ "idf_file_id": 1, "epw_file_id": 2 }),
        )
        .await
    });

    // give the run time to start, then query while it is in flight
    tokio::time::sleep(Duration::from_millis(300)).await;
    let (status, body) = tokio::time::timeout(Duration::from_millis(500), get(&app, "/simulations"))
        .await
        .expect("queries must not wait for a running simulation");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["simulations"], json!(["office_1"]));

    let (status, body) = run.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn test_run_simulation_endpoint() {
    let app = app();

    // unknown inputs are a 404
    let (status, body) = post_json(
        &app,
        "/run_simulation/",
        json!({ "idf_file_id": 777, "epw_file_id": 778 }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "IDF or EPW file not found");

    // a failed run reports status=error in a 200; the front end
    // displays the message rather than handling an HTTP error
    let (status, body) = post_json(
        &app,
        "/run_simulation/",
        json!({ "idf_file_id": 1, "epw_file_id": 2 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Could not launch"));
}
