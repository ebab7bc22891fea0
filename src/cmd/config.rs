//! Configuration view and validation commands: `brand-console config`.

use anyhow::Result;
use std::path::PathBuf;

use crate::{Cli, ConfigCommands};
use brand_console::console_config::{
    CONFIG_DIR, CONFIG_FILE, ConsoleConfig, ConsoleToml, default_config_path,
};

fn masked(secret: &Option<String>) -> &'static str {
    if secret.is_some() { "(set)" } else { "(not set)" }
}

pub fn cmd_config(cli: &Cli, command: Option<ConfigCommands>) -> Result<()> {
    match command {
        None | Some(ConfigCommands::Show) => {
            let path = cli.config.clone().unwrap_or_else(default_config_path);
            println!();
            println!("Brand Console Configuration");
            println!("===========================");
            println!();

            if path.exists() {
                println!("Config file: {}", path.display());
            } else {
                println!("No console.toml found at {}", path.display());
                println!("Using default configuration.");
            }
            println!();

            let config = ConsoleConfig::load(Some(path), cli.base_url.clone())?;
            let toml = &config.toml;
            println!("[server]");
            println!("  base_url = \"{}\"", toml.server.base_url);
            println!("  timeout_secs = {}", toml.server.timeout_secs);
            println!();
            println!("[session]");
            println!("  session_cookie = {}", masked(&toml.session.session_cookie));
            println!("  csrf_token = {}", masked(&toml.session.csrf_token));
            println!();
            println!("[client]");
            if let Some(timezone) = &toml.client.timezone {
                println!("  timezone = \"{}\"", timezone);
            }
            if let Some(offset) = &toml.client.utc_offset {
                println!("  utc_offset = \"{}\"", offset);
            }
            println!();

            println!("Effective values (with env/CLI overrides):");
            println!("  base_url = \"{}\"", config.base_url);
            println!("  session_cookie = {}", masked(&config.session.session_cookie));
            println!("  csrf_token = {}", masked(&config.session.csrf_token));
            println!("  client timezone = \"{}\"", config.client_timezone().label());
            println!();
        }
        Some(ConfigCommands::Validate) => {
            let path = cli.config.clone().unwrap_or_else(default_config_path);
            println!();
            println!("Validating configuration...");
            println!();

            if !path.exists() {
                println!("No console.toml found at {}.", path.display());
                println!("Run 'brand-console config init' to create one.");
                return Ok(());
            }

            let toml = ConsoleToml::load(&path)?;
            let warnings = toml.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join(CONFIG_FILE));
            if path.exists() {
                println!("console.toml already exists at {}", path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            ConsoleToml::default().save(&path)?;

            println!("Created console.toml at {}", path.display());
            println!();
            println!("You can now customize:");
            println!("  - [server] base_url, timeout_secs");
            println!("  - [session] session_cookie, csrf_token (copy from a logged-in browser)");
            println!("  - [client] timezone, utc_offset");
            println!();
        }
    }

    Ok(())
}
