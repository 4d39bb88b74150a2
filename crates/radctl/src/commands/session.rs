//! Session command handlers: login, status, logout.

use owo_colors::OwoColorize;
use secrecy::SecretString;
use serde::Serialize;

use radctl_core::{Session, SessionState, TlsMode};

use crate::cli::{GlobalOpts, SessionArgs, SessionCommand};
use crate::config::Target;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Debug, Serialize)]
struct SessionStatus {
    profile: String,
    endpoint: String,
    state: String,
    reference: Option<u64>,
    cache_file: String,
    #[serde(skip)]
    usable: bool,
}

impl SessionStatus {
    fn detail(&self, color: bool) -> String {
        let state = match (color, self.usable) {
            (false, _) => self.state.clone(),
            (true, true) => self.state.green().to_string(),
            (true, false) => self.state.yellow().to_string(),
        };
        let reference = self
            .reference
            .map_or_else(|| "-".to_owned(), |id| id.to_string());
        format!(
            "profile:    {}\nendpoint:   {}\nstate:      {state}\nreference:  {reference}\ncache file: {}",
            self.profile, self.endpoint, self.cache_file
        )
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    session: &mut Session,
    target: &Target,
    args: SessionArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        SessionCommand::Login {
            username,
            password,
            ssl_cert_verify,
            ssl_cert_path,
        } => {
            let username = username
                .or_else(|| target.profile.username.clone())
                .ok_or_else(|| CliError::Validation {
                    field: "username".into(),
                    reason: "pass --username (-u) or set username in the profile".into(),
                })?;
            let password = resolve_password(password, target)?;

            // Flags win; without them the profile decides.
            let tls = if ssl_cert_verify || ssl_cert_path.is_some() {
                TlsMode::from_flags(ssl_cert_verify, ssl_cert_path)
            } else {
                target.profile.tls_mode()
            };

            session.login(&username, &password, tls).await?;
            if !global.quiet {
                eprintln!("Logged in to {} as {username}", session.url());
            }
            Ok(())
        }

        SessionCommand::Status => {
            let state = session.load(false).await?;
            let status = SessionStatus {
                profile: target.profile_name.clone(),
                endpoint: session.url(),
                state: state.to_string(),
                usable: matches!(state, SessionState::Cached | SessionState::Authenticated),
                reference: session.reference_id(),
                cache_file: session.cache_path().display().to_string(),
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(&global.output, &status, |s| s.detail(color))?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        SessionCommand::Logout => {
            session.reset()?;
            if !global.quiet {
                eprintln!("Removed cached session for {}", session.url());
            }
            Ok(())
        }
    }
}

/// `--password`, then env / keyring / plaintext, then an interactive prompt.
fn resolve_password(flag: Option<String>, target: &Target) -> Result<SecretString, CliError> {
    if let Some(password) = flag {
        return Ok(SecretString::from(password));
    }
    match radctl_config::resolve_password(Some(&target.profile), &target.profile_name) {
        Ok(password) => Ok(password),
        Err(radctl_config::ConfigError::NoCredentials { .. }) => util::prompt_password("Password: "),
        Err(e) => Err(e.into()),
    }
}
