//! Table definitions.
//!
//! Every statement is `IF NOT EXISTS`, so applying the schema to an
//! initialized database is a no-op.

pub const PRAGMAS_SQL: &str = "PRAGMA foreign_keys = ON;";

pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS projects (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    project TEXT UNIQUE
);

CREATE TABLE IF NOT EXISTS people (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    subject TEXT UNIQUE,
    age INTEGER,
    sex TEXT,
    treatment TEXT,
    response TEXT,
    project_id INTEGER,
    FOREIGN KEY (project_id) REFERENCES projects(id)
);

CREATE TABLE IF NOT EXISTS samples (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    sample_id TEXT UNIQUE,
    sample_type TEXT,
    time_from_treatment_start TEXT,
    b_cell INTEGER,
    cd8_t_cell INTEGER,
    cd4_t_cell INTEGER,
    nk_cell INTEGER,
    monocyte INTEGER,
    people_id INTEGER,
    FOREIGN KEY (people_id) REFERENCES people(id)
);
";
