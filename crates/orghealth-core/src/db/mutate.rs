//! Write-path operations: add, edit and delete subdivisions and links.
//!
//! These run outside any analysis pass. Range validation of user input
//! happens before these are called; the schema CHECK constraints are the
//! last line.

use anyhow::{Context, Result};
use rusqlite::{Connection, params};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::model::{CompanyId, LinkId, NewLink, NewSubdivision, SubdivisionId};

/// Row counts removed by [`delete_subdivision`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteCounts {
    pub subdivisions: usize,
    pub links: usize,
}

/// Create the company row if it does not exist yet.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn ensure_company(conn: &Connection, company_id: CompanyId) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO company (id, name) VALUES (?1, ?2)",
        params![company_id, format!("company-{company_id}")],
    )
    .with_context(|| format!("ensure company {company_id}"))?;
    Ok(())
}

/// Insert a subdivision and return its id.
///
/// # Errors
///
/// Returns an error if the insert fails (including CHECK violations).
#[instrument(skip(conn, sub), fields(name = %sub.name))]
pub fn insert_subdivision(
    conn: &Connection,
    company_id: CompanyId,
    sub: &NewSubdivision,
) -> Result<SubdivisionId> {
    ensure_company(conn, company_id)?;
    conn.execute(
        "INSERT INTO subdivision (company_id, name, resources, kpi, state) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![company_id, sub.name, sub.resources, sub.kpi, sub.state],
    )
    .context("insert subdivision")?;
    let id = conn.last_insert_rowid();
    debug!(id, "subdivision inserted");
    Ok(id)
}

/// Overwrite a subdivision's attributes. Returns `false` when no row matched.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_subdivision(
    conn: &Connection,
    company_id: CompanyId,
    id: SubdivisionId,
    sub: &NewSubdivision,
) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE subdivision SET name = ?1, resources = ?2, kpi = ?3, state = ?4 \
             WHERE id = ?5 AND company_id = ?6",
            params![sub.name, sub.resources, sub.kpi, sub.state, id, company_id],
        )
        .with_context(|| format!("update subdivision {id}"))?;
    Ok(changed > 0)
}

/// Delete a subdivision together with every link it participates in.
///
/// Both deletes commit in one transaction.
///
/// # Errors
///
/// Returns an error if either delete fails.
#[instrument(skip(conn))]
pub fn delete_subdivision(
    conn: &mut Connection,
    company_id: CompanyId,
    id: SubdivisionId,
) -> Result<DeleteCounts> {
    let tx = conn.transaction().context("begin delete transaction")?;

    let links = tx
        .execute(
            "DELETE FROM link WHERE company_id = ?1 AND (from_sub_id = ?2 OR to_sub_id = ?2)",
            params![company_id, id],
        )
        .context("delete links of subdivision")?;

    let subdivisions = tx
        .execute(
            "DELETE FROM subdivision WHERE company_id = ?1 AND id = ?2",
            params![company_id, id],
        )
        .context("delete subdivision")?;

    tx.commit().context("commit delete transaction")?;
    debug!(subdivisions, links, "subdivision deleted");

    Ok(DeleteCounts {
        subdivisions,
        links,
    })
}

/// Insert a link and return its id. Endpoints are not checked.
///
/// # Errors
///
/// Returns an error if the insert fails (including CHECK violations).
#[instrument(skip(conn))]
pub fn insert_link(conn: &Connection, company_id: CompanyId, link: &NewLink) -> Result<LinkId> {
    ensure_company(conn, company_id)?;
    conn.execute(
        "INSERT INTO link (company_id, from_sub_id, to_sub_id, importance, delay_hours) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            company_id,
            link.from_id,
            link.to_id,
            link.importance,
            link.delay
        ],
    )
    .context("insert link")?;
    Ok(conn.last_insert_rowid())
}

/// Change a link's importance and delay. Endpoints are immutable.
///
/// Returns `false` when no row matched.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_link(
    conn: &Connection,
    company_id: CompanyId,
    id: LinkId,
    importance: f64,
    delay: f64,
) -> Result<bool> {
    let changed = conn
        .execute(
            "UPDATE link SET importance = ?1, delay_hours = ?2 \
             WHERE company_id = ?3 AND id = ?4",
            params![importance, delay, company_id, id],
        )
        .with_context(|| format!("update link {id}"))?;
    Ok(changed > 0)
}

/// Delete a link. Returns `false` when no row matched.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn delete_link(conn: &Connection, company_id: CompanyId, id: LinkId) -> Result<bool> {
    let changed = conn
        .execute(
            "DELETE FROM link WHERE company_id = ?1 AND id = ?2",
            params![company_id, id],
        )
        .with_context(|| format!("delete link {id}"))?;
    Ok(changed > 0)
}
