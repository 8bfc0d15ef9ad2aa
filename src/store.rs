use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// The three subjects a grade can belong to. Fixed at compile time; anything
/// else on the wire is rejected before it reaches a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Math,
    Science,
    History,
}

impl Subject {
    pub const ALL: [Subject; 3] = [Subject::Math, Subject::Science, Subject::History];

    /// Parse a wire tag. Tags are lowercase-only, matching the source system.
    pub fn parse(tag: &str) -> Option<Subject> {
        match tag {
            "math" => Some(Subject::Math),
            "science" => Some(Subject::Science),
            "history" => Some(Subject::History),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Subject::Math => "math",
            Subject::Science => "science",
            Subject::History => "history",
        }
    }

    pub fn table(self) -> &'static str {
        match self {
            Subject::Math => "math_grades",
            Subject::Science => "science_grades",
            Subject::History => "history_grades",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    #[serde(rename = "emailAddress")]
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewStudent {
    pub firstname: String,
    pub lastname: String,
    #[serde(rename = "emailAddress")]
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: i64,
    pub student_id: i64,
    pub grade: f64,
}

fn map_student(row: &Row) -> rusqlite::Result<Student> {
    Ok(Student {
        id: row.get(0)?,
        firstname: row.get(1)?,
        lastname: row.get(2)?,
        email: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn map_grade(row: &Row) -> rusqlite::Result<Grade> {
    Ok(Grade {
        id: row.get(0)?,
        student_id: row.get(1)?,
        grade: row.get(2)?,
    })
}

pub fn student_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Student>> {
    conn.query_row(
        "SELECT id, first_name, last_name, email, created_at FROM students WHERE id = ?",
        [id],
        map_student,
    )
    .optional()
}

pub fn student_by_email(conn: &Connection, email: &str) -> rusqlite::Result<Option<Student>> {
    conn.query_row(
        "SELECT id, first_name, last_name, email, created_at FROM students WHERE email = ?",
        [email],
        map_student,
    )
    .optional()
}

pub fn list_students(conn: &Connection) -> rusqlite::Result<Vec<Student>> {
    let mut stmt = conn.prepare(
        "SELECT id, first_name, last_name, email, created_at FROM students ORDER BY id",
    )?;
    let rows = stmt.query_map([], map_student)?;
    rows.collect()
}

pub fn insert_student(conn: &Connection, new: &NewStudent) -> rusqlite::Result<Student> {
    let created_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO students(first_name, last_name, email, created_at) VALUES(?, ?, ?, ?)",
        (&new.firstname, &new.lastname, &new.email, &created_at),
    )?;
    Ok(Student {
        id: conn.last_insert_rowid(),
        firstname: new.firstname.clone(),
        lastname: new.lastname.clone(),
        email: new.email.clone(),
        created_at,
    })
}

/// Remove a student and every grade that references it, in one transaction.
/// Returns whether a student row existed. Deletes run in dependency order;
/// there is no ON DELETE CASCADE in the schema.
pub fn delete_student(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    let exists: Option<i64> = conn
        .query_row("SELECT 1 FROM students WHERE id = ?", [id], |r| r.get(0))
        .optional()?;
    if exists.is_none() {
        return Ok(false);
    }

    let tx = conn.unchecked_transaction()?;
    for subject in Subject::ALL {
        tx.execute(
            &format!("DELETE FROM {} WHERE student_id = ?", subject.table()),
            [id],
        )?;
    }
    tx.execute("DELETE FROM students WHERE id = ?", [id])?;
    tx.commit()?;
    Ok(true)
}

pub fn grade_by_id(conn: &Connection, subject: Subject, id: i64) -> rusqlite::Result<Option<Grade>> {
    conn.query_row(
        &format!(
            "SELECT id, student_id, grade FROM {} WHERE id = ?",
            subject.table()
        ),
        [id],
        map_grade,
    )
    .optional()
}

pub fn grades_for_student(
    conn: &Connection,
    subject: Subject,
    student_id: i64,
) -> rusqlite::Result<Vec<Grade>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT id, student_id, grade FROM {} WHERE student_id = ? ORDER BY id",
        subject.table()
    ))?;
    let rows = stmt.query_map([student_id], map_grade)?;
    rows.collect()
}

pub fn insert_grade(
    conn: &Connection,
    subject: Subject,
    student_id: i64,
    value: f64,
) -> rusqlite::Result<Grade> {
    let created_at = Utc::now().to_rfc3339();
    conn.execute(
        &format!(
            "INSERT INTO {}(student_id, grade, created_at) VALUES(?, ?, ?)",
            subject.table()
        ),
        (student_id, value, &created_at),
    )?;
    Ok(Grade {
        id: conn.last_insert_rowid(),
        student_id,
        grade: value,
    })
}

pub fn delete_grade(conn: &Connection, subject: Subject, id: i64) -> rusqlite::Result<bool> {
    let n = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?", subject.table()),
        [id],
    )?;
    Ok(n > 0)
}
