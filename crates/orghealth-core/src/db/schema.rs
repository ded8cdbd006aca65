//! Canonical SQLite schema for the orghealth store.
//!
//! - `company` scopes every record
//! - `subdivision` holds the per-unit attributes with range CHECKs
//! - `link` holds directed dependencies; endpoints are deliberately not
//!   foreign keys, dangling references are a tolerated data condition

/// Migration v1: company, subdivision and link tables plus read-path indexes.
pub const MIGRATION_V1_SQL: &str = r"
CREATE TABLE IF NOT EXISTS company (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS subdivision (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES company(id) ON DELETE CASCADE,
    name TEXT NOT NULL CHECK (length(trim(name)) > 0),
    resources REAL NOT NULL CHECK (resources >= 0 AND resources <= 1000000),
    kpi REAL NOT NULL CHECK (kpi >= 0 AND kpi <= 100),
    state REAL NOT NULL CHECK (state >= 0 AND state <= 1)
);

CREATE TABLE IF NOT EXISTS link (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company_id INTEGER NOT NULL REFERENCES company(id) ON DELETE CASCADE,
    from_sub_id INTEGER NOT NULL,
    to_sub_id INTEGER NOT NULL,
    importance REAL NOT NULL CHECK (importance >= 0 AND importance <= 10),
    delay_hours REAL NOT NULL CHECK (delay_hours >= 0 AND delay_hours <= 72)
);

CREATE INDEX IF NOT EXISTS idx_subdivision_company
    ON subdivision(company_id, id);

CREATE INDEX IF NOT EXISTS idx_link_company
    ON link(company_id, id);

CREATE INDEX IF NOT EXISTS idx_link_endpoints
    ON link(company_id, from_sub_id, to_sub_id);
";

/// Indexes that must exist after all migrations have been applied.
pub const REQUIRED_INDEXES: &[&str] = &[
    "idx_subdivision_company",
    "idx_link_company",
    "idx_link_endpoints",
];
