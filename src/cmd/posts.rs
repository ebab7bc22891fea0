//! Post review and publishing commands: `brand-console posts`.

use anyhow::{Context, Result};

use crate::PostsCommands;
use brand_console::console_config::ConsoleConfig;
use brand_console::errors::TransitionError;
use brand_console::gateway::HttpGateway;
use brand_console::lifecycle::{Capabilities, LifecycleEngine, PostBoard, PostGateway};
use console_common::{BrandId, PostId, PostRecord};

async fn open_board(config: &ConsoleConfig, brand: BrandId) -> Result<LifecycleEngine<HttpGateway>> {
    let engine = LifecycleEngine::new(brand, config.gateway()?, config.client_timezone());
    engine
        .reload()
        .await
        .with_context(|| format!("Failed to load posts of brand {}", brand))?;
    Ok(engine)
}

fn actions_label(capabilities: Capabilities) -> String {
    let mut actions = Vec::new();
    if capabilities.publish {
        actions.push("publish");
    }
    if capabilities.schedule {
        actions.push("schedule");
    }
    if actions.is_empty() {
        "-".to_string()
    } else {
        actions.join(",")
    }
}

fn print_post(board: &PostBoard, post: &PostRecord) {
    let scheduled = post
        .scheduled_for
        .map(|at| {
            format!(
                "{} ({})",
                at.format("%Y-%m-%d %H:%M UTC"),
                post.scheduled_timezone.as_deref().unwrap_or("-")
            )
        })
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{:>6}  {:<13} {:<9} {:<17} {:<34} {}",
        post.id,
        post.status.as_str(),
        post.media_kind.as_str(),
        post.created_at.format("%Y-%m-%d %H:%M"),
        scheduled,
        actions_label(board.capabilities(post.id).unwrap_or(Capabilities::NONE))
    );
    if let Some(failure) = post.failure() {
        println!(
            "        {} [{}] {}",
            console::style("failed:").red(),
            failure.code,
            failure.message
        );
    }
    if let Some(error) = board.error(post.id) {
        println!(
            "        {} {}",
            console::style(format!("{} failed:", error.action)).red(),
            error.message
        );
    }
}

/// Report a transition outcome the way the board shows it.
fn report(
    engine: &LifecycleEngine<HttpGateway>,
    post: PostId,
    result: Result<(), TransitionError>,
    done: &str,
) -> Result<()> {
    match result {
        Ok(()) => {
            let status = engine
                .board()
                .read(|board| board.post(post).map(|p| p.status.as_str().to_string()))
                .flatten()
                .unwrap_or_else(|| "unknown".to_string());
            println!(
                "{} post {} (now {})",
                console::style(done).green().bold(),
                post,
                status
            );
            Ok(())
        }
        Err(err) if err.was_accepted() => {
            println!(
                "{} post {} ({})",
                console::style(done).green().bold(),
                post,
                console::style(err.user_message()).yellow()
            );
            Ok(())
        }
        Err(err) => {
            crate::cmd::print_failure(&err.user_message());
            Err(anyhow::Error::new(err).context(format!("Post {} was not changed", post)))
        }
    }
}

pub async fn cmd_posts(config: &ConsoleConfig, command: PostsCommands) -> Result<()> {
    match command {
        PostsCommands::List { brand } => {
            let engine = open_board(config, brand).await?;
            println!();
            engine.board().read(|board| {
                if board.posts().is_empty() {
                    println!("No posts for brand {}.", brand);
                    return;
                }
                println!(
                    "{:>6}  {:<13} {:<9} {:<17} {:<34} {}",
                    "ID", "STATUS", "MEDIA", "CREATED", "SCHEDULED", "ACTIONS"
                );
                for post in board.posts() {
                    print_post(board, post);
                }
            });
            println!();
        }
        PostsCommands::Publish { brand, post } => {
            let engine = open_board(config, brand).await?;
            let result = engine.publish(post).await;
            report(&engine, post, result, "Published")?;
        }
        PostsCommands::Schedule { brand, post, at } => {
            let engine = open_board(config, brand).await?;
            let result = engine.schedule(post, at.as_deref()).await;
            report(&engine, post, result, "Scheduled")?;
        }
        PostsCommands::Calendar { brand } => {
            let entries = PostGateway::new(config.gateway()?)
                .calendar(brand)
                .await
                .with_context(|| format!("Failed to load the calendar of brand {}", brand))?;
            println!();
            if entries.is_empty() {
                println!("Nothing scheduled for brand {}.", brand);
            }
            for entry in &entries {
                println!(
                    "  {}  post {:<6} {:<11} {}",
                    entry.scheduled_for.format("%Y-%m-%d %H:%M UTC"),
                    entry.post_id,
                    entry.status.as_str(),
                    entry.scheduled_timezone.as_deref().unwrap_or("-")
                );
            }
            println!();
        }
    }

    Ok(())
}
