//! SQL schema for the leavebook SQLite store.
//!
//! Executed at every connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS staff (
    id              TEXT PRIMARY KEY,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL UNIQUE,
    department      TEXT NOT NULL,
    position        TEXT NOT NULL,
    phone           TEXT,
    password_hash   TEXT,            -- argon2 PHC string
    total_leave     INTEGER NOT NULL DEFAULT 0,
    used_leave      INTEGER NOT NULL DEFAULT 0,   -- maintained by the store
    pending_leave   INTEGER NOT NULL DEFAULT 0,   -- maintained by the store
    annual_leave    INTEGER,
    sick_leave      INTEGER,
    maternity_leave INTEGER,
    paternity_leave INTEGER,
    emergency_leave INTEGER,
    created_at      TEXT NOT NULL    -- RFC 3339 UTC
);

-- Rows are only ever removed together with their staff row.
CREATE TABLE IF NOT EXISTS leave_requests (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    staff_id        TEXT NOT NULL REFERENCES staff(id),
    leave_type      TEXT NOT NULL,
    start_date      TEXT NOT NULL,   -- YYYY-MM-DD
    end_date        TEXT NOT NULL,   -- YYYY-MM-DD, inclusive
    days            INTEGER NOT NULL,
    reason          TEXT NOT NULL,
    status          TEXT NOT NULL DEFAULT 'Pending',
    applied_date    TEXT NOT NULL,
    approved_by     TEXT,
    approved_date   TEXT,            -- decision date for either outcome
    rejected_reason TEXT,
    CHECK (status IN ('Pending', 'Approved', 'Rejected')),
    CHECK (start_date <= end_date),
    CHECK (days > 0)
);

CREATE TABLE IF NOT EXISTS notifications (
    id         TEXT PRIMARY KEY,
    staff_id   TEXT NOT NULL REFERENCES staff(id),
    type       TEXT NOT NULL,        -- 'leave' | 'system' | 'alert'
    message    TEXT NOT NULL,
    created_at TEXT NOT NULL,
    read       INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS settings (
    staff_id            TEXT PRIMARY KEY REFERENCES staff(id),
    email_notifications INTEGER NOT NULL DEFAULT 1,
    push_notifications  INTEGER NOT NULL DEFAULT 1,
    leave_reminders     INTEGER NOT NULL DEFAULT 1,
    approval_updates    INTEGER NOT NULL DEFAULT 1
);

-- Global, not staff-scoped.
CREATE TABLE IF NOT EXISTS admin_settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS leave_requests_staff_idx   ON leave_requests(staff_id);
CREATE INDEX IF NOT EXISTS leave_requests_applied_idx ON leave_requests(applied_date);
CREATE INDEX IF NOT EXISTS leave_requests_start_idx   ON leave_requests(start_date);
CREATE INDEX IF NOT EXISTS notifications_staff_idx    ON notifications(staff_id);

PRAGMA user_version = 1;
";
