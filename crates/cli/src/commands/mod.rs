//! Subcommand implementations.
//!
//! Every command first moves the navigation history to the screen it stands
//! for, so a rejected session yields the same login redirect a browser would
//! see.

pub mod auth;
pub mod collections;
pub mod images;
pub mod tags;
pub mod users;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use spark_canvas_client::core::{GatewayRewriter, User, ValidationError};
use spark_canvas_client::{
    ApiClient, ApiError, ClientConfig, ConfigError, FileSessionStore, History, LoginRedirect,
    Navigator, SessionError, Unauthorized, UnauthorizedHandler,
};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Invalid input: {0}")]
    Validation(#[from] ValidationError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Not logged in. Run `spark login` first")]
    NotLoggedIn,

    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Login redirect that remembers where it sent the user.
///
/// A 401 on the login screen itself (bad credentials) does not navigate and
/// so records nothing.
struct RecordedRedirect {
    redirect: LoginRedirect<Arc<History>>,
    target: Arc<Mutex<Option<String>>>,
}

impl UnauthorizedHandler for RecordedRedirect {
    fn on_unauthorized(&self, event: &Unauthorized<'_>) {
        let target = self
            .redirect
            .target_for(&self.redirect.navigator().current_path());
        self.redirect.on_unauthorized(event);
        if let (Some(target), Ok(mut recorded)) = (target, self.target.lock()) {
            *recorded = Some(target);
        }
    }
}

/// Everything a command needs: the client and the state around it.
pub struct Context {
    pub client: ApiClient,
    pub history: Arc<History>,
    pub gateway: GatewayRewriter,
    pub login_path: String,
    redirected_to: Arc<Mutex<Option<String>>>,
}

impl Context {
    /// Build the client with a file-backed session and a login redirect hook.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &ClientConfig) -> Result<Self, CommandError> {
        let history = Arc::new(History::default());
        let store = FileSessionStore::new(&config.session_file);
        let redirected_to = Arc::new(Mutex::new(None));
        let redirect = RecordedRedirect {
            redirect: LoginRedirect::new(Arc::clone(&history), config.login_path.clone()),
            target: Arc::clone(&redirected_to),
        };

        let client = ApiClient::builder(config.clone())
            .session(spark_canvas_client::Session::new(store))
            .on_unauthorized(redirect)
            .build()?;

        Ok(Self {
            client,
            history,
            gateway: GatewayRewriter::new(config.gateway_url.clone()),
            login_path: config.login_path.clone(),
            redirected_to,
        })
    }

    /// Move to the screen a command stands for.
    pub fn visit(&self, path: &str) {
        self.history.navigate(path);
    }

    /// Login location a rejected session sent us to, if that happened.
    #[must_use]
    pub fn redirect_target(&self) -> Option<String> {
        self.redirected_to
            .lock()
            .ok()
            .and_then(|target| target.clone())
    }

    /// Profile of the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `CommandError::NotLoggedIn` if there is no stored profile.
    pub fn current_user(&self) -> Result<User, CommandError> {
        let session = self.client.session().ok_or(CommandError::NotLoggedIn)?;
        if !session.is_authenticated() {
            return Err(CommandError::NotLoggedIn);
        }
        session.user::<User>()?.ok_or(CommandError::NotLoggedIn)
    }
}
