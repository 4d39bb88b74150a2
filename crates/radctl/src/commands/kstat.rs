//! Kstat command handlers.

use std::collections::BTreeMap;

use serde_json::Value;

use radctl_core::{Kstat, Nv, Session};

use crate::cli::{GlobalOpts, KstatArgs, KstatCommand};
use crate::error::CliError;
use crate::output;

/// One `uri;name:<tab>value` line per statistic, ordered by name.
fn detail(uri: &str, map: &BTreeMap<String, Nv>) -> String {
    map.iter()
        .map(|(name, nv)| {
            let value = match nv.value() {
                Value::String(s) => s,
                other => other.to_string(),
            };
            format!("{uri};{name}:\t{value}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn handle(session: &Session, args: KstatArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        KstatCommand::Get { uri } => {
            let kstat = Kstat::get(session, &uri)
                .await
                .map_err(|e| CliError::from(e).not_found_as("kstat", &uri, "kstat get --help"))?;
            let map = kstat.get_map().await?;
            let values: BTreeMap<&str, Value> =
                map.iter().map(|(name, nv)| (name.as_str(), nv.value())).collect();
            let out = output::render_single(&global.output, &values, |_| detail(&uri, &map))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
