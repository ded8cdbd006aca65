//! Read-path queries over the store.
//!
//! Every function is scoped to one company and returns typed records
//! ordered by ascending id. "Nothing found" is an empty result or `None`,
//! never an error.

use anyhow::{Context, Result};
use rusqlite::{Connection, OptionalExtension, params};
use tracing::instrument;

use crate::model::{CompanyId, CompanySnapshot, Link, LinkId, Subdivision, SubdivisionId};

const SUBDIVISION_COLUMNS: &str = "id, name, resources, kpi, state";
const LINK_COLUMNS: &str = "id, from_sub_id, to_sub_id, importance, delay_hours";

/// Load every subdivision and link of a company for one analysis pass.
///
/// An unknown company yields an empty snapshot.
///
/// # Errors
///
/// Returns an error if either query fails.
#[instrument(skip(conn))]
pub fn load_company(conn: &Connection, company_id: CompanyId) -> Result<CompanySnapshot> {
    let subdivisions = list_subdivisions(conn, company_id)?;
    let links = list_links(conn, company_id)?;
    tracing::debug!(
        subdivisions = subdivisions.len(),
        links = links.len(),
        "loaded company snapshot"
    );
    Ok(CompanySnapshot {
        subdivisions,
        links,
    })
}

/// All subdivisions of a company.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_subdivisions(conn: &Connection, company_id: CompanyId) -> Result<Vec<Subdivision>> {
    let sql = format!(
        "SELECT {SUBDIVISION_COLUMNS} FROM subdivision WHERE company_id = ?1 ORDER BY id"
    );
    let mut stmt = conn
        .prepare(&sql)
        .context("prepare list_subdivisions query")?;
    let rows = stmt
        .query_map(params![company_id], row_to_subdivision)
        .context("execute list_subdivisions query")?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("read subdivision rows")
}

/// All links of a company.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_links(conn: &Connection, company_id: CompanyId) -> Result<Vec<Link>> {
    let sql = format!("SELECT {LINK_COLUMNS} FROM link WHERE company_id = ?1 ORDER BY id");
    let mut stmt = conn.prepare(&sql).context("prepare list_links query")?;
    let rows = stmt
        .query_map(params![company_id], row_to_link)
        .context("execute list_links query")?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("read link rows")
}

/// Fetch a single subdivision by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_subdivision(
    conn: &Connection,
    company_id: CompanyId,
    id: SubdivisionId,
) -> Result<Option<Subdivision>> {
    let sql = format!(
        "SELECT {SUBDIVISION_COLUMNS} FROM subdivision WHERE company_id = ?1 AND id = ?2"
    );
    conn.query_row(&sql, params![company_id, id], row_to_subdivision)
        .optional()
        .with_context(|| format!("get_subdivision for id {id}"))
}

/// Fetch a single link by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_link(conn: &Connection, company_id: CompanyId, id: LinkId) -> Result<Option<Link>> {
    let sql = format!("SELECT {LINK_COLUMNS} FROM link WHERE company_id = ?1 AND id = ?2");
    conn.query_row(&sql, params![company_id, id], row_to_link)
        .optional()
        .with_context(|| format!("get_link for id {id}"))
}

/// Links where `id` is either the source or the target.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn links_touching(
    conn: &Connection,
    company_id: CompanyId,
    id: SubdivisionId,
) -> Result<Vec<Link>> {
    let sql = format!(
        "SELECT {LINK_COLUMNS} FROM link \
         WHERE company_id = ?1 AND (from_sub_id = ?2 OR to_sub_id = ?2) \
         ORDER BY id"
    );
    let mut stmt = conn.prepare(&sql).context("prepare links_touching query")?;
    let rows = stmt
        .query_map(params![company_id, id], row_to_link)
        .context("execute links_touching query")?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("read link rows")
}

/// Whether a company row exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn company_exists(conn: &Connection, company_id: CompanyId) -> Result<bool> {
    conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM company WHERE id = ?1)",
        params![company_id],
        |row| row.get(0),
    )
    .context("check company existence")
}

fn row_to_subdivision(row: &rusqlite::Row<'_>) -> rusqlite::Result<Subdivision> {
    Ok(Subdivision {
        id: row.get(0)?,
        name: row.get(1)?,
        resources: row.get(2)?,
        kpi: row.get(3)?,
        state: row.get(4)?,
    })
}

fn row_to_link(row: &rusqlite::Row<'_>) -> rusqlite::Result<Link> {
    Ok(Link {
        id: row.get(0)?,
        from_id: row.get(1)?,
        to_id: row.get(2)?,
        importance: row.get(3)?,
        delay: row.get(4)?,
    })
}
