//! Aggregation queries behind the dashboard reports.
//!
//! All filters are bound as nullable parameters (`?n IS NULL OR …`) so each
//! report is a single static statement.

use chrono::NaiveDate;
use leavebook_core::report::{
  DepartmentStats, LeaveStats, MonthlyTrend, ReportFilter, TopRequester,
  TypeCount,
};
use rusqlite::{Connection, params};

use crate::{
  Result,
  encode::{decode_leave_type, encode_date},
};

/// Filter values in bind order: `from`, `to`, `department`.
fn filter_params(f: &ReportFilter) -> (Option<String>, Option<String>, Option<String>) {
  (
    f.from.map(encode_date),
    f.to.map(encode_date),
    f.department.clone(),
  )
}

pub fn leave_stats(conn: &Connection, as_of: NaiveDate) -> Result<LeaveStats> {
  let month = as_of.format("%Y-%m").to_string();
  let stats = conn.query_row(
    "SELECT COUNT(*),
       COALESCE(SUM(CASE WHEN status = 'Pending' THEN 1 ELSE 0 END), 0),
       COALESCE(SUM(CASE WHEN status = 'Approved'
                          AND substr(approved_date, 1, 7) = ?1 THEN 1 ELSE 0 END), 0),
       AVG(CASE WHEN approved_date IS NOT NULL
                THEN julianday(approved_date) - julianday(applied_date) END)
     FROM leave_requests",
    params![month],
    |row| Ok(LeaveStats::new(row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
  )?;
  Ok(stats)
}

pub fn leave_type_distribution(conn: &Connection, filter: &ReportFilter) -> Result<Vec<TypeCount>> {
  let (from, to, department) = filter_params(filter);
  let mut stmt = conn.prepare(
    "SELECT l.leave_type, COUNT(*) AS n
     FROM leave_requests l
     JOIN staff s ON s.id = l.staff_id
     WHERE (?1 IS NULL OR l.start_date >= ?1)
       AND (?2 IS NULL OR l.start_date <= ?2)
       AND (?3 IS NULL OR s.department = ?3)
     GROUP BY l.leave_type
     ORDER BY n DESC, l.leave_type ASC",
  )?;
  let rows = stmt
    .query_map(params![from, to, department], |row| {
      Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  rows
    .into_iter()
    .map(|(label, count)| Ok(TypeCount { leave_type: decode_leave_type(&label)?, count }))
    .collect()
}

pub fn monthly_trend(conn: &Connection, year: i32) -> Result<Vec<MonthlyTrend>> {
  let mut stmt = conn.prepare(
    "SELECT CAST(strftime('%m', start_date) AS INTEGER) AS m,
       COUNT(*),
       SUM(status = 'Approved'),
       SUM(status = 'Rejected'),
       SUM(status = 'Pending')
     FROM leave_requests
     WHERE strftime('%Y', start_date) = ?1
     GROUP BY m",
  )?;
  let rows = stmt
    .query_map(params![format!("{year:04}")], |row| {
      Ok(MonthlyTrend {
        month:    row.get(0)?,
        total:    row.get(1)?,
        approved: row.get(2)?,
        rejected: row.get(3)?,
        pending:  row.get(4)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let mut months = MonthlyTrend::empty_year();
  for row in rows {
    if let Some(slot) = months.get_mut(row.month.wrapping_sub(1) as usize) {
      *slot = row;
    }
  }
  Ok(months)
}

pub fn department_stats(conn: &Connection, filter: &ReportFilter) -> Result<Vec<DepartmentStats>> {
  let (from, to, department) = filter_params(filter);
  // The date filter sits in the join so departments without matching
  // requests still appear with zero counts.
  let mut stmt = conn.prepare(
    "SELECT s.department,
       COUNT(DISTINCT s.id),
       COUNT(l.id),
       COALESCE(SUM(CASE WHEN l.status = 'Approved' THEN 1 ELSE 0 END), 0),
       AVG(l.days)
     FROM staff s
     LEFT JOIN leave_requests l
       ON l.staff_id = s.id
      AND (?1 IS NULL OR l.start_date >= ?1)
      AND (?2 IS NULL OR l.start_date <= ?2)
     WHERE (?3 IS NULL OR s.department = ?3)
     GROUP BY s.department
     ORDER BY s.department ASC",
  )?;
  let rows = stmt
    .query_map(params![from, to, department], |row| {
      Ok(DepartmentStats::from_counts(
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
      ))
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

pub fn top_requesters(
  conn: &Connection,
  filter: &ReportFilter,
  limit: usize,
) -> Result<Vec<TopRequester>> {
  let (from, to, department) = filter_params(filter);
  let limit = i64::try_from(limit).unwrap_or(i64::MAX);
  let mut stmt = conn.prepare(
    "SELECT s.id, s.name, s.department, SUM(l.days) AS total, COUNT(l.id)
     FROM leave_requests l
     JOIN staff s ON s.id = l.staff_id
     WHERE (?1 IS NULL OR l.start_date >= ?1)
       AND (?2 IS NULL OR l.start_date <= ?2)
       AND (?3 IS NULL OR s.department = ?3)
     GROUP BY s.id
     ORDER BY total DESC, s.name ASC
     LIMIT ?4",
  )?;
  let rows = stmt
    .query_map(params![from, to, department, limit], |row| {
      Ok(TopRequester {
        staff_id:      row.get(0)?,
        name:          row.get(1)?,
        department:    row.get(2)?,
        total_days:    row.get(3)?,
        request_count: row.get(4)?,
      })
    })?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}
