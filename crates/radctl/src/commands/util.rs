//! Shared helpers for command handlers.

use std::cmp::Ordering;
use std::io::IsTerminal;
use std::path::Path;

use secrecy::SecretString;
use serde_json::{Map, Value};
use tracing::debug;

use radctl_core::{Property, PropertyValue, Resource, Session, SessionState};

use crate::error::CliError;
use crate::output::Row;

/// Restore the cached session, failing unless it is usable.
pub async fn require_login(session: &mut Session) -> Result<(), CliError> {
    let state = session.load(false).await?;
    debug!(%state, endpoint = %session.url(), "session loaded");
    match state {
        SessionState::Cached | SessionState::Authenticated => Ok(()),
        SessionState::Unauthenticated | SessionState::Stale => Err(CliError::NotLoggedIn {
            url: session.url(),
        }),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Ask for a password on the terminal.
pub fn prompt_password(prompt: &str) -> Result<SecretString, CliError> {
    let password = rpassword::prompt_password(prompt)?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "must not be empty".into(),
        });
    }
    Ok(SecretString::from(password))
}

/// Read a zone configuration file for `--file`.
pub fn read_config_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|e| CliError::Validation {
        field: "file".into(),
        reason: format!("{}: {e}", path.display()),
    })
}

// ── Flat property listings ──────────────────────────────────────────

/// A listing row from a flat resource: one cell per column, `-` when unset.
pub fn property_row(
    resource: &Resource,
    columns: &[&str],
    cell: impl Fn(&Property) -> String,
) -> Result<Row, CliError> {
    let mut cells = Vec::with_capacity(columns.len());
    let mut json = Map::new();
    for &name in columns {
        let prop = resource.get(name)?;
        cells.push(prop.map_or_else(|| "-".into(), &cell));
        json.insert(
            name.into(),
            prop.map_or(Value::Null, |p| p.value().to_json()),
        );
    }
    Ok(Row {
        cells,
        json: Value::Object(json),
    })
}

/// Order two resources by one property; unset values sort last and
/// mismatched kinds compare equal.
pub fn compare_by(a: &Resource, b: &Resource, name: &str) -> Ordering {
    fn value<'r>(r: &'r Resource, name: &str) -> Option<&'r PropertyValue> {
        r.get(name).ok().flatten().map(Property::value)
    }
    match (value(a, name), value(b, name)) {
        (Some(x), Some(y)) => x.try_cmp(y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
