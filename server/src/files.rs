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
use axum::extract::{Multipart, Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use store::InputFile;

fn parse_id(id: &str) -> Result<i64, ApiError> {
    id.parse()
        .map_err(|_| ApiError::bad_request("Invalid id".to_string()))
}

fn file_json(f: &InputFile) -> Value {
    json!({
        "id": f.id,
        "file_type": f.file_type,
        "filename": f.filename,
        "content": f.content,
    })
}

/// `GET /input_file/by_id/{id}` — one file, content included
pub async fn by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store()?;
    let file = store
        .input_file(id)?
        .ok_or_else(|| ApiError::not_found("File not found".to_string()))?;
    Ok(Json(file_json(&file)))
}

/// `GET /input_file/by_simulation/{name}` — the IDF and EPW a
/// simulation ran with
pub async fn by_simulation(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    let sim = store
        .simulation_by_name(&name)?
        .ok_or_else(|| ApiError::not_found("Simulation not found".to_string()))?;

    let idf = store.input_file(sim.idf_file_id)?;
    let epw = store.input_file(sim.epw_file_id)?;
    let as_json = |f: Option<InputFile>| match f {
        Some(f) => json!({ "id": f.id, "filename": f.filename, "content": f.content }),
        None => Value::Null,
    };
    Ok(Json(json!({ "idf": as_json(idf), "epw": as_json(epw) })))
}

#[derive(Deserialize)]
/// Body of `update` and `save_new_version`
pub struct ContentBody {
    /// The new full text of the file
    pub content: String,

    /// For `save_new_version`: save the version under a new name
    #[serde(default)]
    pub filename: Option<String>,
}

/// `POST /input_file/update/{id}` — overwrite a file in place
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ContentBody>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store()?;
    if !store.update_input_file_content(id, &body.content)? {
        return Err(ApiError::not_found("File not found".to_string()));
    }
    Ok(Json(json!({ "status": "ok" })))
}

#[derive(Deserialize)]
/// Query of the catalogue endpoint
pub struct ListQuery {
    /// `idf` or `epw`
    pub file_type: String,
}

/// `GET /input_files/?file_type=` — the catalogue, without contents
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Value>, ApiError> {
    let store = state.store()?;
    let files = store.input_files_by_type(&query.file_type)?;
    Ok(Json(json!(files)))
}

/// `POST /input_file/save_new_version/{id}` — keep the original, add
/// a derived version
pub async fn save_new_version(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ContentBody>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    let store = state.store()?;
    let new_id = store
        .save_new_version(id, &body.content, body.filename.as_deref())?
        .ok_or_else(|| ApiError::not_found("Original file not found".to_string()))?;
    Ok(Json(json!({ "status": "ok", "new_id": new_id })))
}

#[derive(Deserialize)]
/// Query of the upload endpoint
pub struct UploadQuery {
    /// `idf` or `epw`
    pub file_type: String,
}

/// `POST /input_file/upload/?file_type=` — multipart upload of a
/// fresh file (version 1)
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?
    {
        let filename = match field.file_name() {
            Some(f) => f.to_string(),
            None => continue,
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Malformed upload: {}", e)))?;
        let content = String::from_utf8_lossy(&bytes).into_owned();

        let store = state.store()?;
        let new_id = store.insert_input_file(&query.file_type, &filename, &content)?;
        tracing::info!(filename, file_type = query.file_type, "file uploaded");
        return Ok(Json(json!({ "status": "ok", "new_id": new_id })));
    }
    Err(ApiError::bad_request(
        "No file in the upload".to_string(),
    ))
}
