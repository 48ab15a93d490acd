//! Config file management: guided init, inspection, profile selection.

use std::fs;

use dialoguer::Input;
use owo_colors::OwoColorize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init => init(global),
        ConfigCommand::Show => show(global),
        ConfigCommand::Profiles => profiles(global),
        ConfigCommand::Use { name } => use_profile(&name, global),
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}

// ── Init ─────────────────────────────────────────────────────────────

fn init(global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();

    let name: String = Input::new()
        .with_prompt("Profile name")
        .default("default".into())
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    if cfg.profiles.contains_key(&name) && !global.yes {
        return Err(CliError::ProfileExists { name });
    }

    let host: String = Input::new()
        .with_prompt("Device host or IP")
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    let username: String = Input::new()
        .with_prompt("Username")
        .default("admin".into())
        .interact_text()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;

    let password = rpassword::prompt_password("Password (empty to be prompted each time): ")?;

    cfg.profiles.insert(
        name.clone(),
        Profile {
            host,
            username: Some(username),
            password: (!password.is_empty()).then_some(password),
            poll_interval: None,
            timeout: None,
        },
    );
    if cfg.default_profile.is_none() {
        cfg.default_profile = Some(name.clone());
    }

    save(&cfg)?;

    if !global.quiet {
        eprintln!("Profile '{name}' written to {}", config::config_path().display());
    }
    Ok(())
}

// ── Show / Profiles / Use ────────────────────────────────────────────

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config()?;
    let redacted = redact(&cfg);

    let rendered = toml::to_string_pretty(&redacted).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    output::print_output(rendered.trim_end(), global.quiet);
    Ok(())
}

fn profiles(global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let default = cfg.default_profile.as_deref().unwrap_or("default");
    let color = output::should_color(&global.color);

    let mut names: Vec<&String> = cfg.profiles.keys().collect();
    names.sort_unstable();

    for name in names {
        let host = &cfg.profiles[name].host;
        if name == default && color {
            println!("{} {host} (default)", name.bold());
        } else if name == default {
            println!("{name} {host} (default)");
        } else {
            println!("{name} {host}");
        }
    }
    Ok(())
}

fn use_profile(name: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let mut cfg = config::load_config_or_default();

    if !cfg.profiles.contains_key(name) {
        let mut available: Vec<&str> = cfg.profiles.keys().map(String::as_str).collect();
        available.sort_unstable();
        return Err(CliError::ProfileNotFound {
            name: name.into(),
            available: available.join(", "),
        });
    }

    cfg.default_profile = Some(name.into());
    save(&cfg)?;

    if !global.quiet {
        eprintln!("Default profile set to '{name}'");
    }
    Ok(())
}

// ── Helpers ──────────────────────────────────────────────────────────

fn save(cfg: &Config) -> Result<(), CliError> {
    let path = config::config_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let rendered = toml::to_string_pretty(cfg).map_err(|e| CliError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    fs::write(&path, rendered)?;
    Ok(())
}

/// Copy of the config with every stored password masked.
fn redact(cfg: &Config) -> Config {
    Config {
        default_profile: cfg.default_profile.clone(),
        defaults: cfg.defaults.clone(),
        profiles: cfg
            .profiles
            .iter()
            .map(|(name, p)| {
                (
                    name.clone(),
                    Profile {
                        host: p.host.clone(),
                        username: p.username.clone(),
                        password: p.password.as_ref().map(|_| "********".into()),
                        poll_interval: p.poll_interval,
                        timeout: p.timeout,
                    },
                )
            })
            .collect(),
    }
}
