//! Config subcommand handlers. None of these touch a RAD host.

use radctl_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const REDACTED: &str = "********";

/// A copy of the config that is safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    cfg
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = redacted(&radctl_config::load_config_or_default());
            let text = toml::to_string_pretty(&cfg).map_err(|e| CliError::Render(e.to_string()))?;
            let out = output::render_single(&global.output, &cfg, |_| text.trim_end().to_owned())?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(
                &radctl_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = radctl_config::load_config_or_default();
            let profile_name = cfg.active_profile_name(global.profile.as_deref());
            let password = util::prompt_password(&format!("Password for profile '{profile_name}': "))?;
            radctl_config::store_password(&profile_name, &password)?;
            if !global.quiet {
                eprintln!("Password for '{profile_name}' stored in the system keyring");
            }
            Ok(())
        }
    }
}
