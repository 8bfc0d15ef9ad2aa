use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::store::{self, Grade, NewStudent, Student, Subject};

/// Why a lookup failed. The wire contract collapses every reason to the same
/// 404 payload; the distinction only exists for logs and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundReason {
    StudentMissing,
    GradeMissing,
    UnknownSubject,
    GradeOutOfRange,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("student or grade was not found ({0:?})")]
    NotFound(NotFoundReason),
    #[error("storage error: {0}")]
    Db(#[from] rusqlite::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    #[serde(rename = "emailAddress")]
    pub email: String,
    pub student_grades: StudentGrades,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentGrades {
    pub math_grade_results: Vec<Grade>,
    pub science_grade_results: Vec<Grade>,
    pub history_grade_results: Vec<Grade>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub math_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub science_average: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_average: Option<f64>,
}

fn average(grades: &[Grade]) -> Option<f64> {
    if grades.is_empty() {
        return None;
    }
    Some(grades.iter().map(|g| g.grade).sum::<f64>() / grades.len() as f64)
}

pub fn list_students(conn: &Connection) -> ServiceResult<Vec<Student>> {
    Ok(store::list_students(conn)?)
}

/// Insert a student and return the refreshed full list, which is what the
/// creation endpoint answers with.
pub fn create_student(conn: &Connection, new: &NewStudent) -> ServiceResult<Vec<Student>> {
    let student = store::insert_student(conn, new)?;
    info!(student_id = student.id, "created student");
    Ok(store::list_students(conn)?)
}

/// Delete a student and all grades it owns, returning the remaining list.
pub fn delete_student(conn: &Connection, id: i64) -> ServiceResult<Vec<Student>> {
    if !store::delete_student(conn, id)? {
        return Err(ServiceError::NotFound(NotFoundReason::StudentMissing));
    }
    info!(student_id = id, "deleted student and owned grades");
    Ok(store::list_students(conn)?)
}

/// The student plus its grades grouped by subject. Subjects with no grades
/// report an empty list and no average.
pub fn student_profile(conn: &Connection, id: i64) -> ServiceResult<StudentProfile> {
    let Some(student) = store::student_by_id(conn, id)? else {
        return Err(ServiceError::NotFound(NotFoundReason::StudentMissing));
    };

    let math = store::grades_for_student(conn, Subject::Math, id)?;
    let science = store::grades_for_student(conn, Subject::Science, id)?;
    let history = store::grades_for_student(conn, Subject::History, id)?;

    Ok(StudentProfile {
        id: student.id,
        firstname: student.firstname,
        lastname: student.lastname,
        email: student.email,
        student_grades: StudentGrades {
            math_average: average(&math),
            science_average: average(&science),
            history_average: average(&history),
            math_grade_results: math,
            science_grade_results: science,
            history_grade_results: history,
        },
    })
}

/// Store a grade for an existing student under a recognized subject and
/// return the refreshed profile. Unknown subjects, out-of-range values and
/// missing students all surface as NotFound, per the wire contract.
pub fn create_grade(
    conn: &Connection,
    student_id: i64,
    tag: &str,
    value: f64,
) -> ServiceResult<StudentProfile> {
    let Some(subject) = Subject::parse(tag) else {
        return Err(ServiceError::NotFound(NotFoundReason::UnknownSubject));
    };
    if !(0.0..=100.0).contains(&value) {
        return Err(ServiceError::NotFound(NotFoundReason::GradeOutOfRange));
    }
    if store::student_by_id(conn, student_id)?.is_none() {
        return Err(ServiceError::NotFound(NotFoundReason::StudentMissing));
    }

    let grade = store::insert_grade(conn, subject, student_id, value)?;
    info!(
        student_id,
        subject = subject.tag(),
        grade_id = grade.id,
        "stored grade"
    );
    student_profile(conn, student_id)
}

/// Remove one grade and return the owning student's refreshed profile.
pub fn delete_grade(conn: &Connection, grade_id: i64, tag: &str) -> ServiceResult<StudentProfile> {
    let Some(subject) = Subject::parse(tag) else {
        return Err(ServiceError::NotFound(NotFoundReason::UnknownSubject));
    };
    let Some(grade) = store::grade_by_id(conn, subject, grade_id)? else {
        return Err(ServiceError::NotFound(NotFoundReason::GradeMissing));
    };

    store::delete_grade(conn, subject, grade_id)?;
    info!(
        grade_id,
        subject = subject.tag(),
        student_id = grade.student_id,
        "deleted grade"
    );
    student_profile(conn, grade.student_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_conn(prefix: &str) -> Connection {
        let dir = std::env::temp_dir().join(format!(
            "{}-{}",
            prefix,
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .expect("clock")
                .as_nanos()
        ));
        crate::db::open_db(&dir).expect("open db")
    }

    fn seed_student(conn: &Connection) -> Student {
        store::insert_student(
            conn,
            &NewStudent {
                firstname: "Eric".into(),
                lastname: "Roby".into(),
                email: "eric.roby@gradebookd.test".into(),
            },
        )
        .expect("insert student")
    }

    fn not_found_reason<T: std::fmt::Debug>(result: ServiceResult<T>) -> NotFoundReason {
        match result {
            Err(ServiceError::NotFound(reason)) => reason,
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn average_is_mean_or_absent() {
        assert_eq!(average(&[]), None);
        let grades = vec![
            Grade {
                id: 1,
                student_id: 1,
                grade: 70.0,
            },
            Grade {
                id: 2,
                student_id: 1,
                grade: 80.0,
            },
        ];
        assert_eq!(average(&grades), Some(75.0));
    }

    #[test]
    fn create_grade_branches_keep_distinct_reasons() {
        let conn = temp_conn("gradebookd-grade-reasons");
        let student = seed_student(&conn);

        assert_eq!(
            not_found_reason(create_grade(&conn, student.id, "literature", 70.8)),
            NotFoundReason::UnknownSubject
        );
        assert_eq!(
            not_found_reason(create_grade(&conn, student.id, "math", 100.5)),
            NotFoundReason::GradeOutOfRange
        );
        assert_eq!(
            not_found_reason(create_grade(&conn, student.id, "math", -0.5)),
            NotFoundReason::GradeOutOfRange
        );
        assert_eq!(
            not_found_reason(create_grade(&conn, 0, "math", 70.8)),
            NotFoundReason::StudentMissing
        );

        // Nothing above may have stored a row.
        let profile = student_profile(&conn, student.id).expect("profile");
        assert!(profile.student_grades.math_grade_results.is_empty());
    }

    #[test]
    fn delete_student_cascades_across_all_subjects() {
        let conn = temp_conn("gradebookd-cascade");
        let student = seed_student(&conn);
        for subject in Subject::ALL {
            store::insert_grade(&conn, subject, student.id, 88.0).expect("insert grade");
        }

        let remaining = delete_student(&conn, student.id).expect("delete student");
        assert!(remaining.is_empty());
        assert!(store::student_by_id(&conn, student.id)
            .expect("query student")
            .is_none());
        for subject in Subject::ALL {
            let grades =
                store::grades_for_student(&conn, subject, student.id).expect("query grades");
            assert!(grades.is_empty(), "{} not cascaded", subject.table());
        }
    }

    #[test]
    fn delete_missing_student_is_not_found() {
        let conn = temp_conn("gradebookd-delete-missing");
        assert_eq!(
            not_found_reason(delete_student(&conn, 0)),
            NotFoundReason::StudentMissing
        );
    }

    #[test]
    fn delete_grade_reasons_and_refreshed_profile() {
        let conn = temp_conn("gradebookd-delete-grade");
        let student = seed_student(&conn);
        let grade = store::insert_grade(&conn, Subject::Math, student.id, 75.0).expect("grade");

        assert_eq!(
            not_found_reason(delete_grade(&conn, grade.id, "literature")),
            NotFoundReason::UnknownSubject
        );
        assert_eq!(
            not_found_reason(delete_grade(&conn, grade.id + 1, "math")),
            NotFoundReason::GradeMissing
        );

        let profile = delete_grade(&conn, grade.id, "math").expect("delete grade");
        assert_eq!(profile.id, student.id);
        assert!(profile.student_grades.math_grade_results.is_empty());
        assert_eq!(profile.student_grades.math_average, None);
    }

    #[test]
    fn list_is_idempotent_without_mutation() {
        let conn = temp_conn("gradebookd-list-idempotent");
        seed_student(&conn);
        let first = list_students(&conn).expect("list");
        let second = list_students(&conn).expect("list again");
        assert_eq!(
            serde_json::to_value(&first).expect("json"),
            serde_json::to_value(&second).expect("json")
        );
    }

    #[test]
    fn profile_wire_shape_omits_absent_averages() {
        let conn = temp_conn("gradebookd-profile-shape");
        let student = seed_student(&conn);
        store::insert_grade(&conn, Subject::Math, student.id, 90.0).expect("grade");

        let profile = student_profile(&conn, student.id).expect("profile");
        let value = serde_json::to_value(&profile).expect("json");

        assert_eq!(value["emailAddress"], "eric.roby@gradebookd.test");
        let grades = &value["studentGrades"];
        assert_eq!(grades["mathGradeResults"].as_array().map(|a| a.len()), Some(1));
        assert_eq!(grades["mathAverage"], serde_json::json!(90.0));
        // Empty subjects keep the (empty) list but drop the average entirely.
        assert_eq!(grades["scienceGradeResults"].as_array().map(|a| a.len()), Some(0));
        assert!(grades.get("scienceAverage").is_none());
        assert!(grades.get("historyAverage").is_none());
    }
}
