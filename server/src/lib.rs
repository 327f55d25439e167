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

//! The HTTP face of the EnergyPlus data API: input-file upload and
//! versioning, simulation runs, and the aggregation queries the web
//! front end draws its dashboards from.

use axum::extract::State;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::{Json, Router};
use runner::RunOptions;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use store::Store;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

/// Status codes and `{"detail": …}` error bodies
pub mod error;
pub use error::ApiError;

/// Input-file endpoints
pub mod files;

/// Running simulations and listing them
pub mod runs;

/// The aggregation endpoints
pub mod queries;

/// What every handler can reach
#[derive(Clone)]
pub struct AppState {
    /// The database, shared with the (blocking) runner
    pub store: Arc<Mutex<Store>>,

    /// How to launch EnergyPlus
    pub run_options: Arc<RunOptions>,
}

impl AppState {
    /// Builds a state around an open store
    pub fn new(store: Store, run_options: RunOptions) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            run_options: Arc::new(run_options),
        }
    }

    /// Locks the store for one synchronous batch of work
    pub(crate) fn store(&self) -> Result<MutexGuard<'_, Store>, ApiError> {
        self.store
            .lock()
            .map_err(|_| ApiError::internal("The database lock was poisoned".to_string()))
    }
}

/// Builds the application router. `front_origin` is the only origin
/// allowed by CORS (the web front end, e.g. `http://localhost:3000`).
pub fn router(state: AppState, front_origin: &str) -> Result<Router, String> {
    let origin: HeaderValue = front_origin
        .parse()
        .map_err(|_| format!("Invalid front-end origin '{}'", front_origin))?;
    // credentialed CORS forbids wildcards, so methods and headers
    // mirror whatever the preflight asks for
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Ok(Router::new()
        .route("/", get(root))
        .route("/simulations", get(runs::simulations))
        .route("/data/{simulation_name}", get(runs::simulation_data))
        .route("/input_file/by_id/{id}", get(files::by_id))
        .route("/input_file/by_simulation/{name}", get(files::by_simulation))
        .route("/input_file/update/{id}", post(files::update))
        .route("/input_files/", get(files::list))
        .route(
            "/input_file/save_new_version/{id}",
            post(files::save_new_version),
        )
        .route("/input_file/upload/", post(files::upload))
        .route("/run_simulation/", post(runs::run))
        .route("/sum_all_energy/", get(queries::sum_all_energy))
        .route("/sum_room_energy/", get(queries::sum_room_energy))
        .route("/sum_by_meter/", get(queries::sum_by_meter))
        .route(
            "/sum_by_room_and_meter/",
            get(queries::sum_by_room_and_meter),
        )
        .route("/pmv_by_room/", get(queries::pmv_by_room))
        .route("/temperature_by_room/", get(queries::temperature_by_room))
        .route("/room_summary/", get(queries::room_summary))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state))
}

/// Binds and serves until the process is stopped.
pub async fn serve(addr: SocketAddr, state: AppState, front_origin: &str) -> Result<(), String> {
    let app = router(state, front_origin)?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("Could not bind {}: {}", addr, e))?;
    tracing::info!("EnergyPlus data API listening on http://{}", addr);
    axum::serve(listener, app)
        .await
        .map_err(|e| format!("Server error: {}", e))
}

/// `GET /` — the service banner
async fn root(State(_): State<AppState>) -> Json<Value> {
    Json(json!({ "message": "EnergyPlus Data API" }))
}
