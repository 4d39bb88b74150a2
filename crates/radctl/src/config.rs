//! Resolve the RAD target from the config file, the active profile, and
//! global flags.
//!
//! Precedence is flag > env (handled by clap) > profile > defaults.

use std::time::Duration;

use radctl_config::{Config, Profile};
use radctl_core::{Protocol, SessionConfig};

use crate::cli::{GlobalOpts, ProtocolArg};
use crate::error::CliError;

/// The host a command talks to, with the profile it came from.
#[derive(Debug, Clone)]
pub struct Target {
    pub profile_name: String,
    /// The profile after flag overrides. Synthesized from `--hostname`
    /// when the config has no matching profile.
    pub profile: Profile,
    pub session: SessionConfig,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Http => Self::Http,
            ProtocolArg::Https => Self::Https,
        }
    }
}

/// Build the target from config and flags.
///
/// An explicitly requested profile must exist. Without a matching profile
/// `--hostname` is required.
pub fn resolve_target(global: &GlobalOpts, cfg: &Config) -> Result<Target, CliError> {
    let profile_name = cfg.active_profile_name(global.profile.as_deref());

    let base = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => cfg.profile(&profile_name)?.clone(),
        None => {
            let hostname = global.hostname.as_deref().ok_or_else(|| CliError::NoConfig {
                path: radctl_config::config_path().display().to_string(),
            })?;
            Profile::new(hostname)
        }
    };

    let profile = apply_overrides(base, global);
    let mut session = radctl_config::session_config(&profile, &cfg.defaults)?;
    if let Some(timeout) = global.timeout {
        session = session.with_timeout(Duration::from_secs(timeout));
    }
    if let Some(max) = global.max_session_time {
        session = session.with_max_session_time(Duration::from_secs(max));
    }
    if let Some(dir) = &global.cache_dir {
        session = session.with_cache_dir(dir.clone());
    }

    Ok(Target {
        profile_name,
        profile,
        session,
    })
}

fn apply_overrides(mut profile: Profile, global: &GlobalOpts) -> Profile {
    if let Some(hostname) = &global.hostname {
        profile.hostname.clone_from(hostname);
    }
    if let Some(port) = global.port {
        profile.port = port;
    }
    if let Some(protocol) = global.protocol {
        profile.protocol = protocol.into();
    }
    profile
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(args: &[&str]) -> GlobalOpts {
        let mut argv = vec!["radctl"];
        argv.extend_from_slice(args);
        argv.extend_from_slice(&["config", "show"]);
        Cli::try_parse_from(argv).unwrap().global
    }

    fn config_with_lab() -> Config {
        let mut cfg = Config::default();
        let mut lab = Profile::new("sol11.lab");
        lab.port = 7000;
        lab.timeout = Some(10);
        cfg.profiles.insert("lab".into(), lab);
        cfg
    }

    #[test]
    fn hostname_flag_without_profile() {
        let target = resolve_target(
            &global(&["-H", "10.0.0.9", "-Z", "http", "--cache-dir", "/tmp/rc"]),
            &Config::default(),
        )
        .unwrap();
        assert_eq!(target.session.endpoint.url(), "http://10.0.0.9:6788");
        assert_eq!(target.session.cache_dir, PathBuf::from("/tmp/rc"));
    }

    #[test]
    fn profile_values_with_flag_overrides() {
        let target = resolve_target(
            &global(&["--profile", "lab", "-P", "7100", "--timeout", "99"]),
            &config_with_lab(),
        )
        .unwrap();
        assert_eq!(target.profile_name, "lab");
        assert_eq!(target.session.endpoint.url(), "https://sol11.lab:7100");
        assert_eq!(target.session.timeout, Duration::from_secs(99));
    }

    #[test]
    fn missing_requested_profile_is_an_error() {
        let err = resolve_target(&global(&["--profile", "prod"]), &config_with_lab()).unwrap_err();
        assert!(matches!(err, CliError::ProfileNotFound { .. }), "got: {err:?}");
    }

    #[test]
    fn no_host_at_all_is_an_error() {
        let err = resolve_target(&global(&[]), &Config::default()).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }), "got: {err:?}");
    }
}
