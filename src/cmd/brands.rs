//! Brand administration commands: `brand-console brands`.

use anyhow::{Context, Result};

use crate::BrandsCommands;
use brand_console::brands::{BrandCredentials, BrandDraft, BrandGateway, BrandUpdate};
use brand_console::console_config::ConsoleConfig;
use console_common::BrandCategory;

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub async fn cmd_brands(config: &ConsoleConfig, command: BrandsCommands) -> Result<()> {
    let gateway = BrandGateway::new(config.gateway()?);

    match command {
        BrandsCommands::List => {
            let brands = gateway.list().await.context("Failed to list brands")?;
            println!();
            if brands.is_empty() {
                println!("No brands visible to this session.");
                println!();
                return Ok(());
            }
            println!(
                "{:>5}  {:<24} {:<28} {:<10} {:<16} {}",
                "ID", "SLUG", "NAME", "CATEGORY", "TIMEZONE", "STATUS"
            );
            for brand in &brands {
                println!(
                    "{:>5}  {:<24} {:<28} {:<10} {:<16} {}",
                    brand.id,
                    brand.slug,
                    brand.name,
                    brand.category,
                    brand.timezone,
                    brand.status.as_deref().unwrap_or("-")
                );
            }
            println!();
            println!("{} brand(s)", brands.len());
            println!();
        }
        BrandsCommands::Create {
            slug,
            name,
            category,
            description,
            product_label,
            timezone,
            telegram_bot_token,
            telegram_webhook_secret,
            allowed_user_ids,
        } => {
            let mut draft = BrandDraft::new(&slug, &name).category(&category)?;
            draft.description = non_empty(description);
            draft.primary_product_label = non_empty(product_label);
            draft.timezone = timezone;
            draft.telegram_bot_token = non_empty(telegram_bot_token);
            draft.telegram_webhook_secret = non_empty(telegram_webhook_secret);
            draft.allowed_user_ids = non_empty(allowed_user_ids);

            gateway
                .create(draft)
                .await
                .with_context(|| format!("Failed to create brand '{}'", slug))?;
            println!(
                "{} brand '{}' with the {} starter profile",
                console::style("Created").green().bold(),
                slug.trim(),
                category.trim().to_lowercase()
            );
        }
        BrandsCommands::Update {
            brand,
            name,
            category,
            description,
            timezone,
            telegram_bot_token,
            telegram_webhook_secret,
            allowed_user_ids,
        } => {
            let category = category
                .map(|raw| raw.parse::<BrandCategory>())
                .transpose()
                .map_err(|reason: String| anyhow::anyhow!(reason))?;
            let update = BrandUpdate {
                name,
                category,
                description,
                timezone: non_empty(timezone),
                telegram_bot_token: non_empty(telegram_bot_token),
                telegram_webhook_secret: non_empty(telegram_webhook_secret),
                allowed_user_ids: non_empty(allowed_user_ids),
            };
            gateway
                .update(brand, update)
                .await
                .with_context(|| format!("Failed to update brand {}", brand))?;
            println!("{} brand {}", console::style("Updated").green().bold(), brand);
        }
        BrandsCommands::Credentials {
            brand,
            app_id,
            app_secret,
            page_token,
            ig_account_id,
            graph_version,
        } => {
            let credentials = BrandCredentials {
                meta_app_id: app_id,
                meta_app_secret: app_secret,
                meta_page_access_token: page_token,
                instagram_business_account_id: ig_account_id,
                meta_graph_api_version: graph_version,
            };
            gateway
                .set_credentials(brand, credentials)
                .await
                .with_context(|| format!("Failed to store credentials for brand {}", brand))?;
            println!(
                "{} Meta credentials for brand {}",
                console::style("Stored").green().bold(),
                brand
            );
        }
        BrandsCommands::Onboarding { brand } => {
            let report = gateway
                .validate_onboarding(brand)
                .await
                .with_context(|| format!("Failed to validate onboarding for brand {}", brand))?;
            println!();
            println!("Onboarding checks for brand {}", brand);
            println!();
            for (check, passed) in report.requirements() {
                let mark = if passed {
                    console::style("ok").green()
                } else {
                    console::style("missing").red()
                };
                println!("  {:<32} {}", check, mark);
            }
            for (flag, on) in report.informational() {
                let state = if on { "on" } else { "off" };
                println!("  {:<32} {}", flag, console::style(state).dim());
            }
            println!();
            if report.is_ready() {
                println!("{}", console::style("Brand is ready to publish.").green().bold());
            } else {
                println!(
                    "{} {}",
                    console::style("Not ready:").yellow().bold(),
                    report.failing().join(", ")
                );
            }
            println!();
        }
    }

    Ok(())
}
