use rusqlite::Connection;
use std::path::Path;

/// Open (and if needed create) the gradebook database under `data_dir`.
/// Schema creation is idempotent so reopening an existing workspace is safe.
pub fn open_db(data_dir: &Path) -> anyhow::Result<Connection> {
    std::fs::create_dir_all(data_dir)?;
    let db_path = data_dir.join("gradebook.sqlite3");
    let conn = Connection::open(db_path)?;
    conn.execute("PRAGMA foreign_keys = ON", [])?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL UNIQUE,
            created_at TEXT NOT NULL
        )",
        [],
    )?;

    // One flat table per subject. The store layer treats them as a single
    // generic store keyed by the Subject enum; the schemas must stay in sync.
    for table in ["math_grades", "science_grades", "history_grades"] {
        conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table}(
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    student_id INTEGER NOT NULL,
                    grade REAL NOT NULL,
                    created_at TEXT NOT NULL,
                    FOREIGN KEY(student_id) REFERENCES students(id)
                )"
            ),
            [],
        )?;
        conn.execute(
            &format!("CREATE INDEX IF NOT EXISTS idx_{table}_student ON {table}(student_id)"),
            [],
        )?;
    }

    Ok(conn)
}
