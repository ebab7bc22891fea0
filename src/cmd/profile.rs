//! AI profile commands: `brand-console profile`.

use anyhow::{Context, Result, bail};
use std::io::Read;
use std::path::Path;

use crate::{Cli, ProfileCommands};
use brand_console::console_config::ConsoleConfig;
use brand_console::document::FieldPath;
use brand_console::document::raw::to_raw_text;
use brand_console::editor::{ProfileSession, SECTIONS, TABS, tabs};
use brand_console::gateway::HttpGateway;
use brand_console::profile::ProfileGateway;
use console_common::{BrandCategory, BrandId};
use serde_json::Value;

async fn open_session(config: &ConsoleConfig, brand: BrandId) -> Result<ProfileSession<HttpGateway>> {
    let session = ProfileSession::new(brand, config.gateway()?);
    session
        .load()
        .await
        .with_context(|| format!("Failed to load the profile of brand {}", brand))?;
    Ok(session)
}

async fn save(session: &ProfileSession<HttpGateway>) -> Result<()> {
    session
        .save()
        .await
        .map_err(|err| {
            let message = err.user_message();
            anyhow::Error::new(err).context(message)
        })
        .with_context(|| format!("Failed to save the profile of brand {}", session.brand_id()))?;
    println!(
        "{} profile of brand {}",
        console::style("Saved").green().bold(),
        session.brand_id()
    );
    Ok(())
}

fn read_document_text(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read the document from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))
}

/// Split `FIELD=TEXT` at the first `=`.
fn parse_assignment(raw: &str) -> Result<(&str, &str)> {
    let (field, text) = raw
        .split_once('=')
        .with_context(|| format!("Expected FIELD=TEXT, got '{}'", raw))?;
    let field = field.trim();
    if field.is_empty() {
        bail!("Expected FIELD=TEXT, got '{}'", raw);
    }
    Ok((field, text))
}

/// JSON when it parses, plain text otherwise.
fn parse_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

pub async fn cmd_profile(cli: &Cli, config: &ConsoleConfig, command: ProfileCommands) -> Result<()> {
    match command {
        ProfileCommands::Fields => {
            println!();
            for tab in TABS {
                println!("{} ({})", console::style(tab.title).bold(), tab.id);
                for field in tab.fields {
                    println!("  {:<28} {}", field.key, field.label);
                }
                println!();
            }
        }
        ProfileCommands::Templates { category: None } => {
            let templates = ProfileGateway::new(config.gateway()?)
                .templates()
                .await
                .context("Failed to load category templates")?;
            println!();
            for template in &templates {
                let keys: Vec<&str> = template.template.keys().collect();
                println!(
                    "  {:<12} {}",
                    console::style(&template.category).bold(),
                    keys.join(", ")
                );
            }
            println!();
        }
        ProfileCommands::Templates {
            category: Some(category),
        } => {
            let category: BrandCategory = category
                .parse()
                .map_err(|reason: String| anyhow::anyhow!(reason))?;
            let template = ProfileGateway::new(config.gateway()?)
                .template(category)
                .await
                .with_context(|| format!("Failed to load the {} template", category))?;
            println!("{}", to_raw_text(&template.template));
        }
        ProfileCommands::Section {
            brand,
            section,
            set,
        } => {
            let spec = tabs::section(&section).with_context(|| {
                format!(
                    "Unknown section '{}' (expected one of: {})",
                    section,
                    SECTIONS.iter().map(|s| s.id).collect::<Vec<_>>().join(", ")
                )
            })?;
            let mut assignments = Vec::with_capacity(set.len());
            for raw in &set {
                let (field, text) = parse_assignment(raw)?;
                if !spec.fields().any(|f| f.key == field) {
                    bail!("Field '{}' is not part of the {} section", field, spec.id);
                }
                assignments.push((field, text));
            }

            let session = open_session(config, brand).await?;
            session.edit(|editor| {
                assignments
                    .iter()
                    .try_for_each(|(field, text)| editor.set_field(field, text))
            })??;
            session
                .save_section(spec.id)
                .await
                .map_err(|err| {
                    let message = err.user_message();
                    anyhow::Error::new(err).context(message)
                })
                .with_context(|| {
                    format!("Failed to save the {} section of brand {}", spec.id, brand)
                })?;
            println!(
                "{} {} section of brand {}",
                console::style("Saved").green().bold(),
                spec.id,
                brand
            );
        }
        ProfileCommands::Show { brand, tab } => {
            let session = open_session(config, brand).await?;
            let selected: Vec<_> = match tab.as_deref() {
                Some(id) => vec![tabs::tab(id).with_context(|| format!("Unknown tab '{}'", id))?],
                None => TABS.iter().collect(),
            };
            let (category, sections, extra_keys) = session.edit(|editor| {
                let covered = tabs::covered_top_level_keys();
                let extra: Vec<String> = editor
                    .document()
                    .keys()
                    .filter(|key| !covered.iter().any(|c| c == key))
                    .map(str::to_string)
                    .collect();
                let sections: Vec<_> = selected
                    .iter()
                    .map(|tab| (tab.title, editor.tab_values(tab.id)))
                    .collect();
                (editor.category().map(str::to_string), sections, extra)
            })?;

            println!();
            println!(
                "Brand {} profile (category: {})",
                brand,
                category.as_deref().unwrap_or("-")
            );
            for (title, values) in sections {
                println!();
                println!("{}", console::style(title).bold().cyan());
                for (label, text) in values? {
                    if text.contains('\n') {
                        println!("  {}:", label);
                        for line in text.lines() {
                            println!("    {}", line);
                        }
                    } else {
                        println!("  {:<24} {}", format!("{}:", label), text);
                    }
                }
            }
            if tab.is_none() && !extra_keys.is_empty() {
                println!();
                println!(
                    "{} {}",
                    console::style("Other keys (raw view only):").dim(),
                    extra_keys.join(", ")
                );
            }
            println!();
        }
        ProfileCommands::Raw { brand } => {
            let session = open_session(config, brand).await?;
            let text = session.edit(|editor| editor.raw_text().to_string())?;
            println!("{}", text);
        }
        ProfileCommands::Get { brand, path } => {
            let path = FieldPath::parse(&path)?;
            let session = open_session(config, brand).await?;
            let value = session.edit(|editor| editor.document().get(&path).cloned())?;
            match value {
                Some(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                None => bail!("No value at '{}'", path),
            }
        }
        ProfileCommands::Set { brand, path, value } => {
            let path = FieldPath::parse(&path)?;
            let session = open_session(config, brand).await?;
            session.edit(|editor| editor.set_path(&path, parse_value(&value)))??;
            save(&session).await?;
        }
        ProfileCommands::Field { brand, key, text } => {
            let session = open_session(config, brand).await?;
            session.edit(|editor| editor.set_field(&key, &text))??;
            save(&session).await?;
            let stored = session.edit(|editor| editor.field_value(&key))??;
            println!("  {} = {}", key, stored);
        }
        ProfileCommands::Replace { brand, file } => {
            let text = read_document_text(&file)?;
            let session = open_session(config, brand).await?;
            session.edit(|editor| editor.edit_raw(text))?;
            save(&session).await?;
        }
        ProfileCommands::Template { brand, category } => {
            let category: BrandCategory = category
                .parse()
                .map_err(|reason: String| anyhow::anyhow!(reason))?;
            if !cli.yes {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!(
                        "Replace the whole profile of brand {} with the {} template?",
                        brand, category
                    ))
                    .default(false)
                    .interact()
                    .unwrap_or(false);
                if !confirm {
                    println!("Template not applied");
                    return Ok(());
                }
            }

            ProfileGateway::new(config.gateway()?)
                .apply_template(brand, category)
                .await
                .with_context(|| format!("Failed to apply the {} template", category))?;
            let session = open_session(config, brand).await?;
            let keys = session.edit(|editor| editor.document().keys().count())?;
            println!(
                "{} {} template to brand {} ({} top-level sections)",
                console::style("Applied").green().bold(),
                category,
                brand,
                keys
            );
        }
    }

    Ok(())
}
