//! ZFS dataset command handlers.

use serde_json::json;

use radctl_core::{Resource, Session, ZfsDataset};

use crate::cli::{DatasetColumn, GlobalOpts, ZfsDatasetArgs, ZfsDatasetCommand};
use crate::error::CliError;
use crate::output::{self, Column, Row};

use super::util;

impl DatasetColumn {
    fn property(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Used => "used",
            Self::Available => "available",
            Self::Referenced => "referenced",
            Self::Mountpoint => "mountpoint",
        }
    }

    fn column(self) -> Column {
        match self {
            Self::Name | Self::Mountpoint => Column::text(self.property()),
            Self::Used | Self::Available | Self::Referenced => Column::numeric(self.property()),
        }
    }
}

pub async fn handle(
    session: &Session,
    args: ZfsDatasetArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ZfsDatasetCommand::List { columns, sort_by } => {
            let names: Vec<&str> = columns.iter().map(|c| c.property()).collect();
            let mut wanted = names.clone();
            if let Some(key) = sort_by {
                if !wanted.contains(&key.property()) {
                    wanted.push(key.property());
                }
            }

            let mut datasets: Vec<Resource> = Vec::new();
            for dataset in ZfsDataset::list(session).await? {
                datasets.push(dataset.get_properties(Some(wanted.as_slice())).await?);
            }
            if let Some(key) = sort_by {
                datasets.sort_by(|a, b| util::compare_by(a, b, key.property()));
            }

            let header: Vec<Column> = columns.iter().map(|c| c.column()).collect();
            let rows = datasets
                .iter()
                .map(|d| util::property_row(d, &names, ToString::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            let out = output::render_rows(&global.output, &header, &rows)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ZfsDatasetCommand::GetFilesystems { name, recursive } => {
            let dataset = ZfsDataset::get(session, &name)
                .await
                .map_err(|e| CliError::from(e).not_found_as("dataset", &name, "zfs-dataset list"))?;
            let filesystems = dataset.get_filesystems(recursive).await?;

            let rows: Vec<Row> = filesystems
                .iter()
                .map(|fs| Row {
                    cells: vec![fs.clone()],
                    json: json!(fs),
                })
                .collect();
            let out = output::render_rows(&global.output, &[Column::text("name")], &rows)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
