//! Spark Canvas CLI - browse, upload, and curate images from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (the session is kept in SPARK_SESSION_FILE)
//! spark login -u ada
//!
//! # Browse the feed and search by tag
//! spark images list --limit 10
//! spark images tag sunset
//!
//! # Upload an image
//! spark images upload ./cat.png --caption "Nap time" --tags cats,cozy
//!
//! # Create a collection
//! spark collections create "My Board" --description "Things I like"
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `images` - Feed, tag search, hearts, uploads
//! - `tags trending` - Most used tags
//! - `users` - Profiles and their uploads
//! - `collections` - Mood boards
//!
//! When the server rejects the stored session, it is cleared and the CLI
//! prints the login location to return to.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use sentry::integrations::tracing as sentry_tracing;
use spark_canvas_client::ClientConfig;
use spark_canvas_client::core::{CollectionId, ImageId, Page, UserId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{CommandError, Context};

#[derive(Parser)]
#[command(name = "spark")]
#[command(author, version, about = "Spark Canvas command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session
    Login {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "SPARK_PASSWORD", hide_env_values = true)]
        password: String,

        /// Screen to continue at after logging in
        #[arg(long)]
        from: Option<String>,
    },
    /// Create an account and log into it
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long, env = "SPARK_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Browse and upload images
    Images {
        #[command(subcommand)]
        action: ImagesAction,
    },
    /// Tag statistics
    Tags {
        #[command(subcommand)]
        action: TagsAction,
    },
    /// User profiles
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
    /// Collections of images
    Collections {
        #[command(subcommand)]
        action: CollectionsAction,
    },
}

#[derive(clap::Args)]
struct PageArgs {
    #[arg(long, default_value_t = Page::DEFAULT_LIMIT)]
    limit: u32,

    #[arg(long, default_value_t = 0)]
    offset: u32,
}

impl From<PageArgs> for Page {
    fn from(args: PageArgs) -> Self {
        Self::new(args.limit, args.offset)
    }
}

#[derive(Subcommand)]
enum ImagesAction {
    /// List the newest images
    List {
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show one image
    Show { id: ImageId },
    /// List images with a tag
    Tag {
        tag: String,

        #[command(flatten)]
        page: PageArgs,
    },
    /// Heart an image as the logged-in user
    Heart { id: ImageId },
    /// Upload an image file
    Upload {
        file: PathBuf,

        #[arg(long)]
        caption: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// MIME type (guessed from the extension when omitted)
        #[arg(long)]
        content_type: Option<String>,
    },
}

#[derive(Subcommand)]
enum TagsAction {
    /// Most used tags
    Trending,
}

#[derive(Subcommand)]
enum UsersAction {
    /// Show a profile
    Show { id: UserId },
    /// List a user's uploads
    Images { id: UserId },
}

#[derive(Subcommand)]
enum CollectionsAction {
    /// List all collections
    List,
    /// Show a collection and its images
    Show { id: CollectionId },
    /// Create a collection
    Create {
        title: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN")
        .ok()
        .filter(|dsn| !dsn.trim().is_empty())?;

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "spark_canvas_client=info".into());

    // Logs go to stderr so command output stays pipeable
    let json = std::env::var("SPARK_LOG_JSON").is_ok();
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before anything reads the environment
    let _ = dotenvy::dotenv();

    init_tracing();
    let sentry_guard = init_sentry();

    let cli = Cli::parse();
    let code = finish(run(cli).await);

    // Flush queued Sentry events before the process exits
    drop(sentry_guard);
    code
}

/// Log a failed command and pick the exit code.
fn finish(result: Result<(), CommandError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CommandError> {
    let config = ClientConfig::from_env()?;
    let ctx = Context::new(&config)?;

    let result = dispatch(&ctx, cli.command).await;
    if result.is_err() {
        report_redirect(&ctx);
    }
    result
}

async fn dispatch(ctx: &Context, command: Commands) -> Result<(), CommandError> {
    match command {
        Commands::Login {
            username,
            password,
            from,
        } => {
            let password = SecretString::from(password);
            commands::auth::login(ctx, &username, &password, from.as_deref()).await
        }
        Commands::Register {
            username,
            password,
            avatar_url,
        } => {
            let password = SecretString::from(password);
            commands::auth::register(ctx, &username, &password, avatar_url).await
        }
        Commands::Logout => commands::auth::logout(ctx),
        Commands::Whoami => commands::auth::whoami(ctx),
        Commands::Images { action } => match action {
            ImagesAction::List { page } => commands::images::list(ctx, page.into()).await,
            ImagesAction::Show { id } => commands::images::show(ctx, id).await,
            ImagesAction::Tag { tag, page } => {
                commands::images::by_tag(ctx, &tag, page.into()).await
            }
            ImagesAction::Heart { id } => commands::images::heart(ctx, id).await,
            ImagesAction::Upload {
                file,
                caption,
                tags,
                content_type,
            } => {
                commands::images::upload(ctx, &file, caption, tags.as_deref(), content_type).await
            }
        },
        Commands::Tags { action } => match action {
            TagsAction::Trending => commands::tags::trending(ctx).await,
        },
        Commands::Users { action } => match action {
            UsersAction::Show { id } => commands::users::show(ctx, id).await,
            UsersAction::Images { id } => commands::users::images(ctx, id).await,
        },
        Commands::Collections { action } => match action {
            CollectionsAction::List => commands::collections::list(ctx).await,
            CollectionsAction::Show { id } => commands::collections::show(ctx, id).await,
            CollectionsAction::Create { title, description } => {
                commands::collections::create(ctx, &title, &description).await
            }
        },
    }
}

/// Tell the user where to log in again after the session was rejected.
#[allow(clippy::print_stderr)]
fn report_redirect(ctx: &Context) {
    if let Some(target) = ctx.redirect_target() {
        eprintln!("Session expired. Log in again at {target}");
        eprintln!(
            "  spark login -u <username> --from {}",
            spark_canvas_client::post_login_destination(&target)
        );
    }
}
