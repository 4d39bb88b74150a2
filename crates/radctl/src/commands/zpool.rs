//! Zpool command handlers.

use radctl_core::{Property, Resource, Session, Zpool};

use crate::cli::{GlobalOpts, PoolColumn, ZpoolArgs, ZpoolCommand};
use crate::error::CliError;
use crate::output::{self, Column};

use super::util;

impl PoolColumn {
    fn property(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Size => "size",
            Self::Allocated => "allocated",
            Self::Free => "free",
            Self::Capacity => "capacity",
            Self::Dedupratio => "dedupratio",
            Self::Health => "health",
            Self::Altroot => "altroot",
        }
    }

    fn column(self) -> Column {
        match self {
            Self::Size | Self::Allocated | Self::Free | Self::Capacity | Self::Dedupratio => {
                Column::numeric(self.property())
            }
            Self::Name | Self::Health | Self::Altroot => Column::text(self.property()),
        }
    }
}

/// Capacity is a percentage; everything else uses its own encoding.
fn pool_cell(prop: &Property) -> String {
    if prop.name() == "capacity" {
        format!("{}%", prop.value())
    } else {
        prop.to_string()
    }
}

pub async fn handle(session: &Session, args: ZpoolArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ZpoolCommand::List { columns, sort_by } => {
            let names: Vec<&str> = columns.iter().map(|c| c.property()).collect();
            let mut wanted = names.clone();
            if let Some(key) = sort_by {
                if !wanted.contains(&key.property()) {
                    wanted.push(key.property());
                }
            }

            let mut pools: Vec<Resource> = Vec::new();
            for pool in Zpool::list(session).await? {
                pools.push(pool.get_properties(Some(wanted.as_slice())).await?);
            }
            if let Some(key) = sort_by {
                pools.sort_by(|a, b| util::compare_by(a, b, key.property()));
            }

            let header: Vec<Column> = columns.iter().map(|c| c.column()).collect();
            let rows = pools
                .iter()
                .map(|p| util::property_row(p, &names, pool_cell))
                .collect::<Result<Vec<_>, _>>()?;
            let out = output::render_rows(&global.output, &header, &rows)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
