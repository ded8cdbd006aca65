//! `orghealth subdivision`: list, add, edit and delete subdivisions.

use std::io::{IsTerminal as _, Write};

use anyhow::Result;
use clap::{Args, Subcommand};
use orghealth_core::db::{mutate, query};
use orghealth_core::error::ErrorCode;
use orghealth_core::model::{Link, NameIndex, NewSubdivision, Subdivision, SubdivisionId};
use serde::Serialize;

use super::Session;
use crate::output::{pretty_rule, render, render_mode};
use crate::validate;

#[derive(Args, Debug)]
pub struct SubdivisionArgs {
    #[command(subcommand)]
    pub command: SubdivisionCommand,
}

#[derive(Subcommand, Debug)]
pub enum SubdivisionCommand {
    /// List subdivisions of the company
    List,
    /// Add a subdivision
    Add(AddArgs),
    /// Change a subdivision; omitted flags keep the stored value
    Edit(EditArgs),
    /// Delete a subdivision and every link it participates in
    Delete(DeleteArgs),
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Display name.
    #[arg(long)]
    pub name: String,

    /// Resources R_i, 0 to 1000000.
    #[arg(long, allow_negative_numbers = true)]
    pub resources: f64,

    /// KPI percentage, 0 to 100.
    #[arg(long, allow_negative_numbers = true)]
    pub kpi: f64,

    /// State S_i (load / risk), 0 to 1.
    #[arg(long, allow_negative_numbers = true)]
    pub state: f64,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Subdivision ID.
    pub id: SubdivisionId,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long, allow_negative_numbers = true)]
    pub resources: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub kpi: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub state: Option<f64>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Subdivision ID.
    pub id: SubdivisionId,

    /// Skip the confirmation prompt.
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    id: SubdivisionId,
    name: String,
    deleted: bool,
    subdivisions: usize,
    links: usize,
}

pub fn run_subdivision(args: &SubdivisionArgs, session: &Session) -> Result<()> {
    match &args.command {
        SubdivisionCommand::List => run_list(session),
        SubdivisionCommand::Add(add) => run_add(add, session),
        SubdivisionCommand::Edit(edit) => run_edit(edit, session),
        SubdivisionCommand::Delete(delete) => run_delete(delete, session),
    }
}

fn run_list(session: &Session) -> Result<()> {
    let config = session.load_config()?;
    let conn = session.open_store()?;
    let subdivisions = session.store(query::list_subdivisions(&conn, session.company(&config)))?;

    render_mode(
        session.output,
        &subdivisions,
        |subs, w| {
            for s in subs {
                writeln!(
                    w,
                    "{}\t{}\t{}\t{}\t{}",
                    s.id, s.name, s.resources, s.kpi, s.state
                )?;
            }
            Ok(())
        },
        |subs, w| render_table(subs, w),
    )
}

fn render_table(subs: &[Subdivision], w: &mut dyn Write) -> std::io::Result<()> {
    if subs.is_empty() {
        return writeln!(w, "No subdivisions found.");
    }
    writeln!(
        w,
        "{:>5}  {:<24} {:>12} {:>7} {:>6}",
        "ID", "NAME", "RESOURCES", "KPI", "S_i"
    )?;
    pretty_rule(w)?;
    for s in subs {
        writeln!(
            w,
            "{:>5}  {:<24} {:>12.2} {:>7.2} {:>6.2}",
            s.id, s.name, s.resources, s.kpi, s.state
        )?;
    }
    Ok(())
}

fn validate_fields(sub: &NewSubdivision) -> Result<(), validate::ValidationError> {
    validate::validate_name(&sub.name)?;
    validate::validate_resources(sub.resources)?;
    validate::validate_kpi(sub.kpi)?;
    validate::validate_state(sub.state)
}

fn run_add(args: &AddArgs, session: &Session) -> Result<()> {
    let new = NewSubdivision {
        name: args.name.trim().to_string(),
        resources: args.resources,
        kpi: args.kpi,
        state: args.state,
    };
    if let Err(err) = validate_fields(&new) {
        return session.reject(&err);
    }

    let config = session.load_config()?;
    let conn = session.open_store()?;
    let id = session.store(mutate::insert_subdivision(&conn, session.company(&config), &new))?;

    let created = Subdivision {
        id,
        name: new.name,
        resources: new.resources,
        kpi: new.kpi,
        state: new.state,
    };
    render(session.output, &created, |s, w| {
        writeln!(w, "✓ Added subdivision {} (ID={})", s.name, s.id)
    })
}

fn run_edit(args: &EditArgs, session: &Session) -> Result<()> {
    let config = session.load_config()?;
    let company = session.company(&config);
    let conn = session.open_store()?;

    let Some(current) = session.store(query::get_subdivision(&conn, company, args.id))? else {
        return session.fail(
            ErrorCode::SubdivisionNotFound,
            format!("subdivision {} not found", args.id),
        );
    };

    let edited = NewSubdivision {
        name: args
            .name
            .as_deref()
            .map_or_else(|| current.name.clone(), |n| n.trim().to_string()),
        resources: args.resources.unwrap_or(current.resources),
        kpi: args.kpi.unwrap_or(current.kpi),
        state: args.state.unwrap_or(current.state),
    };
    if let Err(err) = validate_fields(&edited) {
        return session.reject(&err);
    }

    session.store(mutate::update_subdivision(&conn, company, args.id, &edited))?;

    let updated = Subdivision {
        id: args.id,
        name: edited.name,
        resources: edited.resources,
        kpi: edited.kpi,
        state: edited.state,
    };
    render(session.output, &updated, |s, w| {
        writeln!(w, "✓ Updated subdivision {} (ID={})", s.name, s.id)
    })
}

fn run_delete(args: &DeleteArgs, session: &Session) -> Result<()> {
    let config = session.load_config()?;
    let company = session.company(&config);
    let mut conn = session.open_store()?;

    let subdivisions = session.store(query::list_subdivisions(&conn, company))?;
    let names = NameIndex::new(&subdivisions);
    let Some(target) = names.get(args.id) else {
        return session.fail(
            ErrorCode::SubdivisionNotFound,
            format!("subdivision {} not found", args.id),
        );
    };

    let affected = session.store(query::links_touching(&conn, company, args.id))?;

    let interactive = !args.force && !session.output.is_json();
    if interactive && !confirm_delete(target, &affected, &names)? {
        eprintln!("Deletion cancelled.");
        return Ok(());
    }

    let counts = session.store(mutate::delete_subdivision(&mut conn, company, args.id))?;
    let payload = DeleteOutput {
        id: target.id,
        name: target.name.clone(),
        deleted: counts.subdivisions > 0,
        subdivisions: counts.subdivisions,
        links: counts.links,
    };
    render(session.output, &payload, |p, w| {
        writeln!(
            w,
            "✓ Deleted subdivision {} (ID={}): {} subdivision(s), {} link(s) removed",
            p.name, p.id, p.subdivisions, p.links
        )
    })
}

/// Show the links that go with the subdivision and ask on a TTY.
///
/// Non-interactive sessions proceed without asking.
fn confirm_delete(target: &Subdivision, affected: &[Link], names: &NameIndex<'_>) -> Result<bool> {
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return Ok(true);
    }

    let mut err = std::io::stderr().lock();
    writeln!(err, "Subdivision: {} (ID={})", target.name, target.id)?;
    if affected.is_empty() {
        writeln!(err, "No links reference this subdivision.")?;
    } else {
        writeln!(err, "These links will be removed together with it:")?;
        for link in affected {
            writeln!(
                err,
                "  Link ID={}: {} → {}, W={}, Δt={} h",
                link.id,
                names.label(link.from_id),
                names.label(link.to_id),
                link.importance,
                link.delay
            )?;
        }
    }
    write!(err, "Delete this subdivision? [y/N] ")?;
    err.flush()?;
    drop(err);

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let answer = input.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
