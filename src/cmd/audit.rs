//! Audit trail listing: `brand-console audit`.

use anyhow::{Context, Result};

use brand_console::audit::{AuditGateway, filter_by_action};
use brand_console::console_config::ConsoleConfig;
use console_common::BrandId;

pub async fn cmd_audit(
    config: &ConsoleConfig,
    brand: Option<BrandId>,
    action: Option<&str>,
    limit: usize,
) -> Result<()> {
    let entries = AuditGateway::new(config.gateway()?)
        .list(brand)
        .await
        .context("Failed to load the audit trail")?;
    let shown = filter_by_action(&entries, action.unwrap_or(""));

    if shown.is_empty() {
        println!("No audit entries");
        return Ok(());
    }

    println!();
    println!(
        "  {:<17} {:<32} {:<6} {:<26} {}",
        "WHEN", "ACTION", "BRAND", "ENTITY", "DETAILS"
    );
    for entry in shown.iter().take(limit) {
        let when = entry
            .created_at
            .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let brand = entry
            .brand_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<17} {:<32} {:<6} {:<26} {}",
            when,
            console::style(&entry.action).cyan(),
            brand,
            entry.entity(),
            console::style(entry.details_summary()).dim()
        );
    }
    if shown.len() > limit {
        println!();
        println!("  ... {} older entries not shown (--limit)", shown.len() - limit);
    }
    println!();
    Ok(())
}
