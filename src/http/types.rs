use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::Connection;
use serde::Deserialize;

/// Shared handler state. The single connection sits behind a mutex so the
/// stores only ever see one request at a time; handlers must not hold the
/// guard across an await point.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(conn: Connection) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
        }
    }
}

/// Form fields of `POST /grades`.
#[derive(Debug, Deserialize)]
pub struct CreateGradeForm {
    pub grade: f64,
    #[serde(rename = "gradeType")]
    pub grade_type: String,
    #[serde(rename = "studentId")]
    pub student_id: i64,
}
