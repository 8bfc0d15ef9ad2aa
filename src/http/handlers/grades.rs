use axum::extract::{Path, State};
use axum::{Form, Json};

use crate::http::error::ApiError;
use crate::http::types::{AppState, CreateGradeForm};
use crate::service::{self, StudentProfile};

pub async fn create(
    State(state): State<AppState>,
    Form(form): Form<CreateGradeForm>,
) -> Result<Json<StudentProfile>, ApiError> {
    let conn = state.db.lock();
    Ok(Json(service::create_grade(
        &conn,
        form.student_id,
        &form.grade_type,
        form.grade,
    )?))
}

pub async fn remove(
    State(state): State<AppState>,
    Path((id, grade_type)): Path<(i64, String)>,
) -> Result<Json<StudentProfile>, ApiError> {
    let conn = state.db.lock();
    Ok(Json(service::delete_grade(&conn, id, &grade_type)?))
}
