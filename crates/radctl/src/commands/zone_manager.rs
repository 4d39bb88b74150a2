//! Zone manager command handlers: create, delete, import-config.

use tracing::debug;

use radctl_core::{Session, ZoneManager};

use crate::cli::{GlobalOpts, ZoneManagerArgs, ZoneManagerCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(
    session: &Session,
    args: ZoneManagerArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let manager = ZoneManager::open(session).await?;

    match args.command {
        ZoneManagerCommand::Create {
            name,
            path,
            template,
        } => {
            let result = manager
                .create(&name, path.as_deref(), template.as_deref())
                .await?;
            debug!(zone = %name, %result, "create returned");
            if !global.quiet {
                eprintln!("Zone '{name}' created");
            }
            Ok(())
        }

        ZoneManagerCommand::Delete { name, yes } => {
            if !util::confirm(
                &format!("Delete zone '{name}'? This is destructive."),
                "zone-manager delete",
                yes,
            )? {
                return Ok(());
            }
            manager
                .delete(&name)
                .await
                .map_err(|e| CliError::from(e).not_found_as("zone", &name, "zone list"))?;
            if !global.quiet {
                eprintln!("Zone '{name}' deleted");
            }
            Ok(())
        }

        ZoneManagerCommand::ImportConfig {
            zonename,
            source,
            no_execute,
        } => {
            let configuration = match (source.config, source.file) {
                (Some(config), _) => config,
                (None, Some(path)) => util::read_config_file(&path)?,
                (None, None) => {
                    return Err(CliError::Validation {
                        field: "config".into(),
                        reason: "pass --config (-c) or --file (-f)".into(),
                    });
                }
            };
            manager
                .import_config(no_execute, &zonename, &configuration)
                .await?;
            if !global.quiet {
                if no_execute {
                    eprintln!("Configuration for '{zonename}' validated");
                } else {
                    eprintln!("Configuration imported into '{zonename}'");
                }
            }
            Ok(())
        }
    }
}
