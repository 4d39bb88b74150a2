//! CLI error types with miette diagnostics.
//!
//! Maps protocol, model and config errors into user-facing errors with
//! actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use radctl_config::ConfigError;
use radctl_core::CoreError;
use radctl_core::api::Error as ApiError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
#[allow(dead_code, unused_assignments)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to RAD server at {url}")]
    #[diagnostic(
        code(radctl::connection_failed),
        help(
            "Check that rad:remote is online on the host and the port is reachable.\n\
             URL: {url}"
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(radctl::tls_error),
        help(
            "Check the CA bundle given with --ssl-cert-path or ca_cert,\n\
             or log in without --ssl-cert-verify to accept self-signed certificates."
        )
    )]
    TlsError { message: String },

    #[error("Request to {url} timed out")]
    #[diagnostic(
        code(radctl::timeout),
        help("Increase the timeout with --timeout or check the server's responsiveness.")
    )]
    Timeout { url: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(radctl::auth_failed),
        help("Verify the username and password, then run: radctl session login -u <user>")
    )]
    AuthFailed { message: String },

    #[error("Not logged in to {url}")]
    #[diagnostic(
        code(radctl::not_logged_in),
        help("Run: radctl -H <host> session login -u <user>")
    )]
    NotLoggedIn { url: String },

    #[error("No password available for profile '{profile}'")]
    #[diagnostic(
        code(radctl::no_credentials),
        help(
            "Pass --password, set RADCTL_PASSWORD, or store one with:\n\
             radctl --profile {profile} config set-password"
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(radctl::not_found), help("{hint}"))]
    NotFound {
        resource_type: String,
        identifier: String,
        hint: String,
    },

    // ── Remote ───────────────────────────────────────────────────────
    #[error("{method} failed: {message}")]
    #[diagnostic(code(radctl::remote_method))]
    RemoteMethod {
        method: String,
        message: String,
        code: Option<String>,
    },

    #[error("{message}")]
    #[diagnostic(
        code(radctl::unexpected_reply),
        help("Re-run with -vv to see the request flow.")
    )]
    Rad { message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(radctl::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(radctl::profile_not_found),
        help("Available profiles: {available}")
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No RAD host selected")]
    #[diagnostic(
        code(radctl::no_config),
        help(
            "Pass --hostname (-H), or add a profile to the config file.\n\
             Expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(radctl::config))]
    Config(ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(radctl::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render output: {0}")]
    #[diagnostic(code(radctl::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } => exit_code::CONNECTION,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::AuthFailed { .. } | Self::NotLoggedIn { .. } | Self::NoCredentials { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. }
            | Self::ProfileNotFound { .. }
            | Self::NoConfig { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Re-label a generic not-found error with the resource the user asked for.
    pub fn not_found_as(self, resource_type: &str, identifier: &str, list_command: &str) -> Self {
        match self {
            Self::NotFound { .. } => Self::NotFound {
                resource_type: resource_type.into(),
                identifier: identifier.into(),
                hint: format!("Run: radctl {list_command} to see what exists"),
            },
            other => other,
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        if err.is_not_found() {
            let identifier = match &err {
                ApiError::NotFound { href } => href.clone(),
                other => other.to_string(),
            };
            return Self::NotFound {
                resource_type: "object".into(),
                identifier,
                hint: "Check the name and try again.".into(),
            };
        }

        let auth_expired = err.is_auth_expired();
        match err {
            ApiError::Transport(e) => {
                let url = e
                    .url()
                    .map_or_else(|| "(unknown)".into(), ToString::to_string);
                if e.is_timeout() {
                    Self::Timeout { url }
                } else {
                    Self::ConnectionFailed {
                        url,
                        source: Box::new(e),
                    }
                }
            }

            ApiError::Tls(message) => Self::TlsError { message },

            ApiError::Authentication { message } => Self::AuthFailed { message },

            ApiError::RequestFailed { href, .. } if auth_expired => Self::NotLoggedIn { url: href },

            ApiError::RemoteMethod {
                method,
                message,
                code,
                ..
            } => Self::RemoteMethod {
                method,
                message,
                code,
            },

            ApiError::InvalidUrl(e) => Self::Validation {
                field: "hostname".into(),
                reason: e.to_string(),
            },

            ApiError::InvalidEndpoint { url, reason } => Self::Validation {
                field: "hostname".into(),
                reason: format!("{url}: {reason}"),
            },

            other => Self::Rad {
                message: other.to_string(),
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Api(e) => e.into(),
            other => Self::Rad {
                message: other.to_string(),
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::ProfileNotFound { name, available } => {
                Self::ProfileNotFound { name, available }
            }
            ConfigError::NoCredentials { profile } => Self::NoCredentials { profile },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config(other),
        }
    }
}
