use axum::extract::{Path, State};
use axum::Json;

use crate::http::error::ApiError;
use crate::http::types::AppState;
use crate::service::{self, StudentProfile};
use crate::store::{NewStudent, Student};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Student>>, ApiError> {
    let conn = state.db.lock();
    Ok(Json(service::list_students(&conn)?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(new): Json<NewStudent>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let conn = state.db.lock();
    Ok(Json(service::create_student(&conn, &new)?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Student>>, ApiError> {
    let conn = state.db.lock();
    Ok(Json(service::delete_student(&conn, id)?))
}

pub async fn profile(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StudentProfile>, ApiError> {
    let conn = state.db.lock();
    Ok(Json(service::student_profile(&conn, id)?))
}
