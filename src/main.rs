use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use brand_console::console_config::ConsoleConfig;
use brand_console::logging;

mod cmd;

#[derive(Parser)]
#[command(name = "brand-console")]
#[command(version, about = "Operator console for brand AI profiles and post publishing")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to console.toml (defaults to ./.brand-console/console.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL. Overrides console.toml and BRAND_CONSOLE_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(long, global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List, create and configure brands
    Brands {
        #[command(subcommand)]
        command: BrandsCommands,
    },
    /// View and edit a brand's AI generation profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Review, publish and schedule generated posts
    Posts {
        #[command(subcommand)]
        command: PostsCommands,
    },
    /// Show the backend audit trail
    Audit {
        /// Only this brand's entries
        #[arg(long)]
        brand: Option<i64>,
        /// Only actions starting with this prefix (e.g. brand.ai_profile)
        #[arg(long)]
        action: Option<String>,
        #[arg(long, default_value_t = 50)]
        limit: usize,
    },
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
pub enum BrandsCommands {
    /// List brands visible to this session
    List,
    /// Create a brand
    Create {
        /// URL-safe identifier (lowercase letters, digits, hyphens)
        slug: String,
        /// Display name
        name: String,
        /// fashion, furniture, food, beauty or general
        #[arg(long, default_value = "general")]
        category: String,
        #[arg(long)]
        description: Option<String>,
        /// Seeds product_vocabulary in the starter profile
        #[arg(long)]
        product_label: Option<String>,
        #[arg(long, default_value = "Asia/Kolkata")]
        timezone: String,
        #[arg(long)]
        telegram_bot_token: Option<String>,
        #[arg(long)]
        telegram_webhook_secret: Option<String>,
        /// Comma-separated Telegram user ids allowed to talk to the bot
        #[arg(long)]
        allowed_user_ids: Option<String>,
    },
    /// Change brand fields; only the flags given are sent
    Update {
        brand: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        timezone: Option<String>,
        #[arg(long)]
        telegram_bot_token: Option<String>,
        #[arg(long)]
        telegram_webhook_secret: Option<String>,
        #[arg(long)]
        allowed_user_ids: Option<String>,
    },
    /// Store Meta publishing credentials
    Credentials {
        brand: i64,
        #[arg(long)]
        app_id: String,
        #[arg(long)]
        app_secret: String,
        #[arg(long)]
        page_token: String,
        #[arg(long)]
        ig_account_id: String,
        #[arg(long, default_value = "v25.0")]
        graph_version: String,
    },
    /// Run the onboarding readiness checks
    Onboarding { brand: i64 },
}

#[derive(Subcommand, Clone)]
pub enum ProfileCommands {
    /// Show the structured tabs
    Show {
        brand: i64,
        /// Only this tab (basics, colors, visual, props, display, hashtags, captions, occasions)
        #[arg(long)]
        tab: Option<String>,
    },
    /// Print the whole profile document
    Raw { brand: i64 },
    /// Print the value at a dotted path
    Get { brand: i64, path: String },
    /// Set a value at a dotted path (JSON, or plain text) and save
    Set {
        brand: i64,
        path: String,
        value: String,
    },
    /// Set a structured field from its display text and save
    Field {
        brand: i64,
        key: String,
        text: String,
    },
    /// Set structured fields of one section and save only that section
    Section {
        brand: i64,
        /// basics, colors, typography, visual, props, display, hashtags, captions or occasions
        section: String,
        /// FIELD=TEXT, repeatable; fields must belong to the section
        #[arg(long = "set", value_name = "FIELD=TEXT")]
        set: Vec<String>,
    },
    /// List structured field keys
    Fields,
    /// List category starter templates, or print one
    Templates { category: Option<String> },
    /// Replace the whole document from a file ("-" for stdin) and save
    Replace {
        brand: i64,
        #[arg(long)]
        file: PathBuf,
    },
    /// Reset the profile to a category starter template
    Template { brand: i64, category: String },
}

#[derive(Subcommand, Clone)]
pub enum PostsCommands {
    /// List a brand's posts with their available actions
    List { brand: i64 },
    /// Publish a post now
    Publish { brand: i64, post: i64 },
    /// Schedule a post at a local date-time
    Schedule {
        brand: i64,
        post: i64,
        /// Local wall-clock time, YYYY-MM-DDTHH:MM
        #[arg(long)]
        at: Option<String>,
    },
    /// Show scheduled posts in time order
    Calendar { brand: i64 },
}

#[derive(Subcommand, Clone)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Validate configuration and show any warnings
    Validate,
    /// Initialize a default console.toml file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_json)?;

    if let Commands::Config { command } = &cli.command {
        return cmd::cmd_config(&cli, command.clone());
    }

    let config = ConsoleConfig::load(cli.config.clone(), cli.base_url.clone())?;
    let result = match &cli.command {
        Commands::Brands { command } => cmd::cmd_brands(&config, command.clone()).await,
        Commands::Profile { command } => cmd::cmd_profile(&cli, &config, command.clone()).await,
        Commands::Posts { command } => cmd::cmd_posts(&config, command.clone()).await,
        Commands::Audit {
            brand,
            action,
            limit,
        } => cmd::cmd_audit(&config, *brand, action.as_deref(), *limit).await,
        Commands::Config { .. } => Ok(()),
    };

    if let Err(err) = &result
        && cmd::is_auth_failure(err)
    {
        eprintln!(
            "{} Your admin session is missing or expired. Log in again and update [session] in {}.",
            console::style("Not signed in:").red().bold(),
            config.path.display()
        );
    }
    result
}
