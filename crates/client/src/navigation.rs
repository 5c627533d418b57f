//! Unauthorized hook and login redirect policy.
//!
//! The client does not navigate anywhere itself. On a 401 it clears the
//! session and calls the [`UnauthorizedHandler`] it was built with; the host
//! decides what that means. [`LoginRedirect`] is the policy the screens use:
//! send the user to the login path, remembering where they were.

use std::sync::Mutex;

use reqwest::Method;
use tracing::{debug, info};

/// Query parameter carrying the path to return to after login.
pub const REDIRECT_PARAM: &str = "redirect";

/// Details of a request the server rejected with 401.
#[derive(Debug, Clone, Copy)]
pub struct Unauthorized<'a> {
    pub method: &'a Method,
    /// Path the request was made to, relative to the base URL.
    pub path: &'a str,
    /// Server-provided error message, if any.
    pub message: Option<&'a str>,
}

/// Subscriber notified once per 401 response, after the session is cleared.
pub trait UnauthorizedHandler: Send + Sync {
    fn on_unauthorized(&self, event: &Unauthorized<'_>);
}

impl<F> UnauthorizedHandler for F
where
    F: Fn(&Unauthorized<'_>) + Send + Sync,
{
    fn on_unauthorized(&self, event: &Unauthorized<'_>) {
        self(event);
    }
}

/// Where the user currently is, and a way to send them elsewhere.
pub trait Navigator: Send + Sync {
    /// Current location (path plus optional query).
    fn current_path(&self) -> String;

    fn navigate(&self, target: &str);
}

/// In-process navigation history. The current location is the last entry.
#[derive(Debug)]
pub struct History {
    entries: Mutex<Vec<String>>,
}

impl History {
    /// Start a history at `initial`.
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(vec![initial.into()]),
        }
    }

    /// Every location visited, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new("/")
    }
}

impl Navigator for History {
    fn current_path(&self) -> String {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.last().cloned())
            .unwrap_or_else(|| "/".to_owned())
    }

    fn navigate(&self, target: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(target.to_owned());
        }
    }
}

impl<N: Navigator + ?Sized> Navigator for std::sync::Arc<N> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn navigate(&self, target: &str) {
        (**self).navigate(target);
    }
}

/// Redirects to the login screen when the session is rejected.
///
/// - No redirect when the user is already on the login path (query ignored).
/// - With `preserve_origin`, the target carries `?redirect=<current path>`.
#[derive(Debug)]
pub struct LoginRedirect<N> {
    navigator: N,
    login_path: String,
    preserve_origin: bool,
}

impl<N: Navigator> LoginRedirect<N> {
    /// Redirect to `login_path`, preserving the originating path.
    #[must_use]
    pub fn new(navigator: N, login_path: impl Into<String>) -> Self {
        Self {
            navigator,
            login_path: login_path.into(),
            preserve_origin: true,
        }
    }

    #[must_use]
    pub const fn preserve_origin(mut self, preserve: bool) -> Self {
        self.preserve_origin = preserve;
        self
    }

    #[must_use]
    pub const fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Target the navigator should be sent to from `current`, or `None` when
    /// `current` already is the login screen.
    #[must_use]
    pub fn target_for(&self, current: &str) -> Option<String> {
        if path_only(current) == path_only(&self.login_path) {
            return None;
        }
        if self.preserve_origin {
            Some(format!(
                "{}?{REDIRECT_PARAM}={}",
                self.login_path,
                urlencoding::encode(current)
            ))
        } else {
            Some(self.login_path.clone())
        }
    }
}

impl<N: Navigator> UnauthorizedHandler for LoginRedirect<N> {
    fn on_unauthorized(&self, event: &Unauthorized<'_>) {
        let current = self.navigator.current_path();
        match self.target_for(&current) {
            Some(target) => {
                info!(
                    method = %event.method,
                    path = %event.path,
                    target = %target,
                    "Session rejected, redirecting to login"
                );
                self.navigator.navigate(&target);
            }
            None => debug!(current = %current, "Already on login path, not redirecting"),
        }
    }
}

/// Where to send the user after a successful login.
///
/// Reads the `redirect` parameter from the login location. Only same-origin
/// relative paths are honoured; anything else (absent, absolute URL,
/// protocol-relative `//host` or `/\host`, control characters) yields `/`.
#[must_use]
pub fn post_login_destination(login_location: &str) -> String {
    let Some((_, query)) = login_location.split_once('?') else {
        return "/".to_owned();
    };

    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == REDIRECT_PARAM)
        .and_then(|(_, value)| urlencoding::decode(value).ok())
        .map(|value| value.into_owned())
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| "/".to_owned())
}

/// A path on this origin: one leading `/`, not followed by `/` or `\`
/// (browsers read both as protocol-relative), and no control characters.
fn is_local_path(path: &str) -> bool {
    let mut chars = path.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/' | '\\'))
        && !path.chars().any(char::is_control)
}

fn path_only(location: &str) -> &str {
    location
        .split_once(['?', '#'])
        .map_or(location, |(path, _)| path)
}
