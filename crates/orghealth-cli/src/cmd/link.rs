//! `orghealth link`: list, add, edit and delete links.
//!
//! Endpoints are stored as given. A link may point at a subdivision that
//! does not exist (yet, or any more); listings show it as `ID{n}`.

use std::io::Write;

use anyhow::Result;
use clap::{Args, Subcommand};
use orghealth_core::db::{mutate, query};
use orghealth_core::error::ErrorCode;
use orghealth_core::model::{Link, LinkId, NameIndex, NewLink, SubdivisionId};
use serde::Serialize;

use super::Session;
use crate::output::{pretty_rule, render, render_mode};
use crate::validate;

#[derive(Args, Debug)]
pub struct LinkArgs {
    #[command(subcommand)]
    pub command: LinkCommand,
}

#[derive(Subcommand, Debug)]
pub enum LinkCommand {
    /// List links with resolved endpoint names
    List,
    /// Add a directed link
    Add(AddArgs),
    /// Change a link's importance or delay; endpoints are fixed
    Edit(EditArgs),
    /// Delete a link
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Source subdivision ID.
    #[arg(long)]
    pub from: SubdivisionId,

    /// Target subdivision ID.
    #[arg(long)]
    pub to: SubdivisionId,

    /// Importance W_ij, 0 to 10.
    #[arg(long, allow_negative_numbers = true)]
    pub importance: f64,

    /// Delay Δt_ij in hours, 0 to 72.
    #[arg(long, allow_negative_numbers = true)]
    pub delay: f64,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Link ID.
    pub id: LinkId,

    #[arg(long, allow_negative_numbers = true)]
    pub importance: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub delay: Option<f64>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Link ID.
    pub id: LinkId,
}

/// A link with endpoint names resolved for display.
#[derive(Debug, Serialize)]
struct LinkRow {
    id: LinkId,
    from_id: SubdivisionId,
    from_name: String,
    to_id: SubdivisionId,
    to_name: String,
    importance: f64,
    delay: f64,
}

impl LinkRow {
    fn new(link: &Link, names: &NameIndex<'_>) -> Self {
        Self {
            id: link.id,
            from_id: link.from_id,
            from_name: names.label(link.from_id).into_owned(),
            to_id: link.to_id,
            to_name: names.label(link.to_id).into_owned(),
            importance: link.importance,
            delay: link.delay,
        }
    }
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    id: LinkId,
    deleted: bool,
}

pub fn run_link(args: &LinkArgs, session: &Session) -> Result<()> {
    match &args.command {
        LinkCommand::List => run_list(session),
        LinkCommand::Add(add) => run_add(add, session),
        LinkCommand::Edit(edit) => run_edit(edit, session),
        LinkCommand::Delete(delete) => run_delete(delete, session),
    }
}

fn run_list(session: &Session) -> Result<()> {
    let config = session.load_config()?;
    let conn = session.open_store()?;
    let snapshot = session.store(query::load_company(&conn, session.company(&config)))?;
    let names = NameIndex::new(&snapshot.subdivisions);
    let rows: Vec<LinkRow> = snapshot
        .links
        .iter()
        .map(|l| LinkRow::new(l, &names))
        .collect();

    render_mode(
        session.output,
        &rows,
        |rows, w| {
            for r in rows {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}",
                    r.id, r.from_name, r.to_name, r.importance, r.delay
                )?;
            }
            Ok(())
        },
        |rows, w| {
            if rows.is_empty() {
                return writeln!(w, "No links found.");
            }
            writeln!(
                w,
                "{:>5}  {:<36} {:>6} {:>8}",
                "ID", "FROM → TO", "W", "Δt (h)"
            )?;
            pretty_rule(w)?;
            for r in rows {
                writeln!(
                    w,
                    "{:>5}  {:<36} {:>6.2} {:>8.2}",
                    r.id,
                    format!("{} → {}", r.from_name, r.to_name),
                    r.importance,
                    r.delay
                )?;
            }
            Ok(())
        },
    )
}

fn run_add(args: &AddArgs, session: &Session) -> Result<()> {
    if let Err(err) = validate::validate_importance(args.importance)
        .and_then(|()| validate::validate_delay(args.delay))
    {
        return session.reject(&err);
    }

    let config = session.load_config()?;
    let company = session.company(&config);
    let conn = session.open_store()?;

    let new = NewLink {
        from_id: args.from,
        to_id: args.to,
        importance: args.importance,
        delay: args.delay,
    };
    let id = session.store(mutate::insert_link(&conn, company, &new))?;

    let subdivisions = session.store(query::list_subdivisions(&conn, company))?;
    let names = NameIndex::new(&subdivisions);
    let row = LinkRow::new(
        &Link {
            id,
            from_id: new.from_id,
            to_id: new.to_id,
            importance: new.importance,
            delay: new.delay,
        },
        &names,
    );
    render(session.output, &row, |r, w| {
        writeln!(
            w,
            "✓ Added link {} → {} (ID={})",
            r.from_name, r.to_name, r.id
        )
    })
}

fn run_edit(args: &EditArgs, session: &Session) -> Result<()> {
    let config = session.load_config()?;
    let company = session.company(&config);
    let conn = session.open_store()?;

    let Some(current) = session.store(query::get_link(&conn, company, args.id))? else {
        return session.fail(
            ErrorCode::LinkNotFound,
            format!("link {} not found", args.id),
        );
    };

    let importance = args.importance.unwrap_or(current.importance);
    let delay = args.delay.unwrap_or(current.delay);
    if let Err(err) =
        validate::validate_importance(importance).and_then(|()| validate::validate_delay(delay))
    {
        return session.reject(&err);
    }

    session.store(mutate::update_link(&conn, company, args.id, importance, delay))?;

    let subdivisions = session.store(query::list_subdivisions(&conn, company))?;
    let names = NameIndex::new(&subdivisions);
    let row = LinkRow::new(
        &Link {
            importance,
            delay,
            ..current
        },
        &names,
    );
    render(session.output, &row, |r, w| {
        writeln!(
            w,
            "✓ Updated link {} → {} (ID={})",
            r.from_name, r.to_name, r.id
        )
    })
}

fn run_delete(args: &DeleteArgs, session: &Session) -> Result<()> {
    let config = session.load_config()?;
    let conn = session.open_store()?;

    if !session.store(mutate::delete_link(&conn, session.company(&config), args.id))? {
        return session.fail(
            ErrorCode::LinkNotFound,
            format!("link {} not found", args.id),
        );
    }

    let payload = DeleteOutput {
        id: args.id,
        deleted: true,
    };
    render(session.output, &payload, |p, w| {
        writeln!(w, "✓ Deleted link {}", p.id)
    })
}
