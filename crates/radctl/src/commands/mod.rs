//! Command dispatch: bridges CLI args -> session/object calls -> output.

pub mod config_cmd;
pub mod kstat;
pub mod session;
pub mod util;
pub mod zfs_dataset;
pub mod zone;
pub mod zone_manager;
pub mod zpool;

use radctl_core::Session;

use crate::cli::{Command, GlobalOpts};
use crate::config::Target;
use crate::error::CliError;

/// Dispatch a host-bound command. Everything except `session` runs on the
/// cached login.
pub async fn dispatch(
    cmd: Command,
    session: &mut Session,
    target: &Target,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Command::Session(args) = cmd {
        return session::handle(session, target, args, global).await;
    }

    util::require_login(session).await?;
    let session = &*session;
    match cmd {
        Command::Zone(args) => zone::handle(session, args, global).await,
        Command::ZoneManager(args) => zone_manager::handle(session, args, global).await,
        Command::ZfsDataset(args) => zfs_dataset::handle(session, args, global).await,
        Command::Zpool(args) => zpool::handle(session, args, global).await,
        Command::Kstat(args) => kstat::handle(session, args, global).await,
        // Session, Config and Completions are handled before this point
        Command::Session(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
