//! Command-line interface for brainlink.
//!
//! Provides commands for signing in, managing the collection, sharing it,
//! and viewing collections others have shared.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dialoguer::{Confirm as Prompt, Password};

use crate::adapters::{Clipboard, HttpStore, NoClipboard, SystemClipboard};
use crate::auth::{Credentials, FileTokenStore};
use crate::config::{self, paths, ResolvedConfig};
use crate::core::{
    classify, display_host, present, to_embed, AssumeYes, Confirm, ContentError, Delivery,
    LifecycleController, Refreshed, RemoveOutcome, SessionController, ShareController, SharedView,
};
use crate::library::{ContentId, ContentItem, ContentKind, NewContent};

pub mod render;

use render::{item_count, render_cards};

/// brainlink - Save, classify, preview and share links
#[derive(Parser, Debug)]
#[command(name = "brainlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Remote store base URL (overrides configuration)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Signup {
        username: String,

        /// Password (prompted if not given)
        #[arg(long)]
        password: Option<String>,
    },

    /// Sign in and store the session token
    Signin {
        username: String,

        /// Password (prompted if not given)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session token
    Signout,

    /// List your saved content
    List {
        /// Filter by content kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Only items with this tag
        #[arg(short, long)]
        tag: Option<String>,

        /// Search titles, links and tags
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Save a link
    Add {
        /// Link to save (absolute URL)
        link: String,

        /// Display title
        #[arg(long)]
        title: String,

        /// Content kind (detected from the link if not specified)
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,

        /// Tags to apply (comma-separated)
        #[arg(short, long)]
        tags: Option<String>,
    },

    /// Delete a saved item
    Remove {
        /// Content ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a share link for your whole collection
    Share {
        /// Revoke the current share link instead
        #[arg(long)]
        disable: bool,

        /// Print the link instead of copying it
        #[arg(long)]
        no_clipboard: bool,
    },

    /// View a collection someone shared with you
    Shared {
        /// Share token (the last path segment of a share link)
        token: String,
    },

    /// Show how a link would be classified and rendered
    Inspect {
        url: String,

        /// Declared content kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Content kind for CLI (maps to ContentKind)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Twitter,
    Youtube,
    Linkedin,
    Other,
}

impl From<KindArg> for ContentKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Twitter => ContentKind::Twitter,
            KindArg::Youtube => ContentKind::YouTube,
            KindArg::Linkedin => ContentKind::LinkedIn,
            KindArg::Other => ContentKind::Other,
        }
    }
}

/// Shared handles for one CLI invocation
struct App {
    config: ResolvedConfig,
    store: Arc<HttpStore>,
    credentials: Arc<FileTokenStore>,
}

impl App {
    fn load(api_url: Option<String>) -> Result<Self> {
        let mut config = config::config()?.clone();
        if let Some(url) = api_url {
            config.api.base_url = url;
        }

        let store = Arc::new(HttpStore::from_config(&config)?);
        let credentials = Arc::new(FileTokenStore::open_default()?);

        Ok(Self {
            config,
            store,
            credentials,
        })
    }

    fn session(&self) -> SessionController {
        SessionController::new(self.store.clone(), self.credentials.clone())
    }

    fn lifecycle(&self) -> LifecycleController {
        LifecycleController::new(self.store.clone(), self.credentials.clone())
    }

    fn share(&self) -> ShareController {
        ShareController::new(
            self.store.clone(),
            self.credentials.clone(),
            self.config.share_origin.clone(),
        )
    }
}

/// Terminal confirmation gate
struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        Prompt::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false)
    }
}

/// Turn a controller error into the message the user sees
fn report(err: ContentError) -> anyhow::Error {
    if err.requires_sign_in() {
        anyhow::anyhow!("Session expired or missing, run `brainlink signin <username>`")
    } else {
        anyhow::anyhow!(err.user_message())
    }
}

/// The change went through; only the reload after it failed
fn refresh_failed(done: &str, err: &ContentError) -> String {
    if err.requires_sign_in() {
        format!(
            "{}, but refreshing the list failed: session expired, run `brainlink signin <username>`",
            done
        )
    } else {
        format!("{}, but refreshing the list failed: {}", done, err.user_message())
    }
}

fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|s| {
        s.split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

fn read_credentials(username: String, password: Option<String>, confirm: bool) -> Result<Credentials> {
    let password = match password {
        Some(p) => p,
        None if confirm => Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords do not match")
            .interact()
            .context("Failed to read password")?,
        None => Password::new()
            .with_prompt("Password")
            .interact()
            .context("Failed to read password")?,
    };

    Ok(Credentials::new(username, password)?)
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        // Commands that need no store
        match &self.command {
            Commands::Inspect { url, kind } => return inspect(url, kind.map(Into::into)),
            Commands::Config => return show_config(),
            _ => {}
        }

        let ctx = App::load(self.api_url)?;

        match self.command {
            Commands::Signup { username, password } => {
                let credentials = read_credentials(username, password, true)?;
                ctx.session().sign_up(&credentials).await.map_err(report)?;
                eprintln!("Account created. Run `brainlink signin {}`", credentials.username);
                Ok(())
            }
            Commands::Signin { username, password } => {
                let credentials = read_credentials(username, password, false)?;
                ctx.session().sign_in(&credentials).await.map_err(report)?;
                eprintln!("Signed in as {}", credentials.username);
                Ok(())
            }
            Commands::Signout => {
                ctx.session().sign_out().map_err(report)?;
                eprintln!("Signed out");
                Ok(())
            }
            Commands::List { kind, tag, search } => {
                list_content(&ctx, kind.map(Into::into), tag, search).await
            }
            Commands::Add {
                link,
                title,
                kind,
                tags,
            } => add_content(&ctx, link, title, kind.map(Into::into), parse_tags(tags)).await,
            Commands::Remove { id, yes } => remove_content(&ctx, &ContentId::new(id), yes).await,
            Commands::Share {
                disable,
                no_clipboard,
            } => share(&ctx, disable, no_clipboard).await,
            Commands::Shared { token } => show_shared(&ctx, &token).await,
            Commands::Inspect { .. } | Commands::Config => Ok(()),
        }
    }
}

async fn list_content(
    ctx: &App,
    kind: Option<ContentKind>,
    tag: Option<String>,
    search: Option<String>,
) -> Result<()> {
    let collection = ctx.lifecycle().load().await.map_err(report)?;

    if collection.is_empty() {
        println!("Nothing saved yet. Use 'brainlink add <link> --title <title>' to add content.");
        return Ok(());
    }

    let mut items: Vec<&ContentItem> = match &search {
        Some(query) => collection.search(query),
        None => collection.iter().collect(),
    };
    if let Some(kind) = kind {
        items.retain(|item| item.kind == kind);
    }
    if let Some(tag) = &tag {
        items.retain(|item| item.tags.contains(tag));
    }

    if items.is_empty() {
        println!("No items match");
    } else {
        println!("{}", render_cards(items.iter().copied()));
    }

    println!("\nTotal: {}", item_count(&collection));
    Ok(())
}

async fn add_content(
    ctx: &App,
    link: String,
    title: String,
    kind: Option<ContentKind>,
    tags: Vec<String>,
) -> Result<()> {
    let mut content = NewContent::new(title, link).with_tags(tags);
    content.kind = kind;

    match ctx.lifecycle().add(&content).await.map_err(report)? {
        Refreshed::Current(collection) => {
            eprintln!("Saved. Your collection now has {}.", item_count(&collection));
        }
        Refreshed::Stale(e) => eprintln!("{}", refresh_failed("Saved", &e)),
    }
    Ok(())
}

async fn remove_content(ctx: &App, id: &ContentId, yes: bool) -> Result<()> {
    let lifecycle = ctx.lifecycle();

    // Load first so the prompt can name the item
    lifecycle.load().await.map_err(report)?;

    let confirm: &dyn Confirm = if yes { &AssumeYes } else { &TerminalConfirm };
    let outcome = lifecycle.remove(id, confirm).await.map_err(report)?;

    match outcome {
        RemoveOutcome::Removed(Refreshed::Current(collection)) => {
            eprintln!("Deleted. {} left.", item_count(&collection));
        }
        RemoveOutcome::Removed(Refreshed::Stale(e)) => {
            eprintln!("{}", refresh_failed("Deleted", &e));
        }
        RemoveOutcome::Cancelled => eprintln!("Operation cancelled"),
    }
    Ok(())
}

async fn share(ctx: &App, disable: bool, no_clipboard: bool) -> Result<()> {
    let controller = ctx.share();

    if disable {
        controller.disable_sharing().await.map_err(report)?;
        eprintln!("Sharing disabled");
        return Ok(());
    }

    let clipboard: Box<dyn Clipboard> = if no_clipboard {
        Box::new(NoClipboard)
    } else {
        Box::new(SystemClipboard::new())
    };

    let link = controller
        .create_share_link(clipboard.as_ref())
        .await
        .map_err(report)?;

    match link.delivery {
        Delivery::Copied => eprintln!("Share link copied to clipboard: {}", link.url),
        Delivery::Displayed => println!("{}", link.url),
    }
    Ok(())
}

async fn show_shared(ctx: &App, token: &str) -> Result<()> {
    match ctx.share().resolve_shared_collection(token).await.map_err(report)? {
        SharedView::Available(collection) => {
            println!("Shared collection · {} shared\n", item_count(&collection));
            if collection.is_empty() {
                println!("This collection is empty");
            } else {
                println!("{}", render_cards(&collection));
            }
            Ok(())
        }
        SharedView::InvalidLink => {
            anyhow::bail!("{}", crate::core::error::INVALID_SHARE_LINK)
        }
    }
}

fn inspect(url: &str, declared: Option<ContentKind>) -> Result<()> {
    let kind = classify(url, declared);
    let presentation = present(kind);
    let embed = to_embed(url, kind);

    println!("Kind:    {} {}", presentation.glyph, presentation.label);
    println!("Host:    {}", display_host(url));
    match embed.iframe_src() {
        Some(src) => println!("Embed:   {}", src),
        None => println!("Embed:   none ({} {})", presentation.call_to_action, embed.url()),
    }
    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("brainlink configuration");
    println!();
    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Paths:");
    println!("  Home:          {}", cfg.home.display());
    println!("  Session token: {}", paths::token_file()?.display());
    println!();
    println!("Store:");
    println!("  Base URL:      {}", cfg.api.base_url);
    println!("  Timeout:       {}s", cfg.api.timeout_seconds);
    println!();
    println!("Share origin:    {}", cfg.share_origin);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(Some(" rust, async ,,".to_string())), vec!["rust", "async"]);
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn test_kind_arg_mapping() {
        assert_eq!(ContentKind::from(KindArg::Youtube), ContentKind::YouTube);
        assert_eq!(ContentKind::from(KindArg::Linkedin), ContentKind::LinkedIn);
    }

    #[test]
    fn test_cli_parses_add() {
        let cli = Cli::try_parse_from([
            "brainlink",
            "add",
            "https://youtu.be/abc",
            "--title",
            "Talk",
            "--tags",
            "a,b",
        ])
        .unwrap();

        match cli.command {
            Commands::Add { link, title, kind, tags } => {
                assert_eq!(link, "https://youtu.be/abc");
                assert_eq!(title, "Talk");
                assert!(kind.is_none());
                assert_eq!(tags.as_deref(), Some("a,b"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_refresh_failure_still_reports_success() {
        let msg = refresh_failed("Saved", &ContentError::Transport("reset".into()));
        assert_eq!(
            msg,
            "Saved, but refreshing the list failed: Request failed, please try again"
        );
    }

    #[test]
    fn test_report_unauthorized_points_to_signin() {
        let err = report(ContentError::Unauthorized);
        assert!(err.to_string().contains("brainlink signin"));
    }
}
