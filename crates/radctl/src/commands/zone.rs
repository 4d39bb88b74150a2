//! Zone command handlers.

use std::cmp::Ordering;
use std::fmt::Write as _;

use serde_json::{Map, Value, json};

use radctl_core::{Resource, Session, Zone, ZoneSummary};

use crate::cli::{GlobalOpts, ZoneArgs, ZoneColumn, ZoneCommand};
use crate::error::CliError;
use crate::output::{self, Column, Row};

// ── Columns ─────────────────────────────────────────────────────────

impl ZoneColumn {
    fn column(self) -> Column {
        match self {
            Self::Id => Column::numeric("id"),
            Self::Name => Column::text("name"),
            Self::Brand => Column::text("brand"),
            Self::State => Column::text("state"),
            Self::Auxstate => Column::text("auxstate"),
            Self::Uuid => Column::text("uuid"),
        }
    }

    fn cell(self, zone: &ZoneSummary) -> String {
        let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
        match self {
            Self::Id => zone.id.map_or_else(|| "-".into(), |id| id.to_string()),
            Self::Name => zone.name.clone(),
            Self::Brand => text(&zone.brand),
            Self::State => text(&zone.state),
            Self::Auxstate => zone
                .auxstate
                .as_ref()
                .filter(|aux| !aux.is_empty())
                .map_or_else(|| "-".into(), |aux| aux.join(",")),
            Self::Uuid => text(&zone.uuid),
        }
    }

    fn json(self, zone: &ZoneSummary) -> Value {
        match self {
            Self::Id => json!(zone.id),
            Self::Name => json!(zone.name),
            Self::Brand => json!(zone.brand),
            Self::State => json!(zone.state),
            Self::Auxstate => json!(zone.auxstate),
            Self::Uuid => json!(zone.uuid),
        }
    }

    fn compare(self, a: &ZoneSummary, b: &ZoneSummary) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            other => other.cell(a).cmp(&other.cell(b)),
        }
    }
}

fn zone_row(zone: &ZoneSummary, columns: &[ZoneColumn]) -> Row {
    let mut json = Map::new();
    for column in columns {
        json.insert(column.column().name.into(), column.json(zone));
    }
    Row {
        cells: columns.iter().map(|c| c.cell(zone)).collect(),
        json: Value::Object(json),
    }
}

// ── Detail view ─────────────────────────────────────────────────────

/// `name: value` lines; child resources as `type[id]:` headers with their
/// properties indented below.
fn describe(resource: &Resource, depth: usize, out: &mut String) {
    let indent = "\t".repeat(depth);
    for prop in resource.properties() {
        if !prop.value().is_present() || matches!(prop.name(), "zonename" | "id" | "tmp-id") {
            continue;
        }
        let _ = writeln!(out, "{indent}{}: {}", prop.name(), prop);
    }
    for child in resource.children() {
        let id = child
            .get("id")
            .ok()
            .flatten()
            .or_else(|| child.get("tmp-id").ok().flatten())
            .map(|p| format!("[{p}]"))
            .unwrap_or_default();
        let _ = writeln!(out, "{indent}{}{id}:", child.type_tag());
        describe(child, depth + 1, out);
    }
}

fn detail(resource: &Resource) -> String {
    let mut out = String::new();
    describe(resource, 0, &mut out);
    out.trim_end().to_owned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &Session, args: ZoneArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ZoneCommand::List {
            columns,
            sort_by,
            zonenames,
        } => {
            let zones = Zone::list(session).await?;
            let mut summaries = zones
                .iter()
                .map(Zone::summary)
                .collect::<Result<Vec<_>, _>>()?;
            if !zonenames.is_empty() {
                summaries.retain(|z| zonenames.contains(&z.name));
            }
            if let Some(key) = sort_by {
                summaries.sort_by(|a, b| key.compare(a, b));
            }

            let header: Vec<Column> = columns.iter().map(|c| c.column()).collect();
            let rows: Vec<Row> = summaries.iter().map(|z| zone_row(z, &columns)).collect();
            let out = output::render_rows(&global.output, &header, &rows)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ZoneCommand::GetProperties { zonename } => {
            let zone = Zone::get(session, &zonename)
                .await
                .map_err(|e| CliError::from(e).not_found_as("zone", &zonename, "zone list"))?;
            let tree = zone.get_properties().await?;
            let out = output::render_single(&global.output, &tree.to_json(), |_| detail(&tree))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
