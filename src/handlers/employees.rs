use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use uuid::Uuid;
use crate::app::AppState;
use crate::errors::{AppError, AppResult};
use crate::models::{
    Employee, EmployeeFields, ImageUploadResponse, SearchForm, SearchQuery, SortOrder,
};

const IMAGE_FIELD: &str = "image";

// Ids that are not UUIDs can never match a record
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::employee_not_found(raw))
}

pub async fn list_employees(State(state): State<AppState>) -> AppResult<Json<Vec<Employee>>> {
    Ok(Json(state.employees.list().await?))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Employee>> {
    let id = parse_id(&id)?;
    let employee = state
        .employees
        .get(id)
        .await?
        .ok_or_else(|| AppError::employee_not_found(id))?;
    Ok(Json(employee))
}

pub async fn search_employees(
    State(state): State<AppState>,
    WithRejection(Query(form), _): WithRejection<Query<SearchForm>, AppError>,
) -> AppResult<Json<Vec<Employee>>> {
    let query = SearchQuery {
        name: form.name,
        min_salary: form.min_salary,
        sort: SortOrder::parse(form.sort_order.as_deref()),
    };
    Ok(Json(state.employees.search(&query).await?))
}

pub async fn add_employee(
    State(state): State<AppState>,
    WithRejection(Json(fields), _): WithRejection<Json<EmployeeFields>, AppError>,
) -> AppResult<Json<Employee>> {
    Ok(Json(state.employees.create(fields).await?))
}

pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    WithRejection(Json(fields), _): WithRejection<Json<EmployeeFields>, AppError>,
) -> AppResult<Json<Employee>> {
    let id = parse_id(&id)?;
    Ok(Json(state.employees.update(id, fields).await?))
}

pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(&id)?;
    state.employees.delete(id).await?;
    Ok(StatusCode::OK)
}

pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> AppResult<Json<ImageUploadResponse>> {
    let id = parse_id(&id)?;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to get next field from multipart form: {}", e);
        AppError::Upload(format!("Failed to process form field: {}", e))
    })? {
        if field.name() != Some(IMAGE_FIELD) {
            tracing::warn!("Unexpected form field: {:?}", field.name());
            continue;
        }

        let filename = field
            .file_name()
            .ok_or_else(|| AppError::Upload("Missing filename in upload".into()))?
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Upload(format!("Failed to read uploaded file: {}", e)))?;

        tracing::debug!("Received image {} ({} bytes) for employee {}", filename, bytes.len(), id);
        let image_path = state.employees.attach_image(id, &bytes, &filename).await?;
        return Ok(Json(ImageUploadResponse { image_path }));
    }

    Err(AppError::Upload("No image file uploaded".into()))
}

pub async fn export_employees(State(state): State<AppState>) -> AppResult<Response> {
    let csv = state.exports.export_csv().await?;
    let filename = format!("employees_{}.csv", Utc::now().format("%Y-%m-%d"));

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    )
        .into_response())
}
