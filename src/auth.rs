//! Login and registration flows.
//!
//! Both flows surface the server's message verbatim when it sends one and a
//! fixed fallback otherwise. Neither touches the session cell: a successful
//! login reloads the page, and the fresh session check picks up the cookie.

use crate::api::{ApiError, NewsClient};
use crate::app::AppEvent;
use secrecy::SecretString;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub const MISSING_FIELDS_MESSAGE: &str = "Username and password are required";
pub const LOGIN_FAILED_MESSAGE: &str = "Login failed!";
pub const REGISTER_FAILED_MESSAGE: &str = "Registration failed!";
pub const REGISTER_SUCCESS_MESSAGE: &str = "Registration successful! You can now log in.";
pub const TRANSPORT_FAILED_MESSAGE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Register,
}

impl AuthMode {
    pub fn title(self) -> &'static str {
        match self {
            AuthMode::Login => "Login",
            AuthMode::Register => "Register",
        }
    }

    fn fallback_message(self) -> &'static str {
        match self {
            AuthMode::Login => LOGIN_FAILED_MESSAGE,
            AuthMode::Register => REGISTER_FAILED_MESSAGE,
        }
    }
}

/// Result of one submitted form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    LoggedIn { username: String },
    Registered,
    /// User-facing failure text.
    Failed(String),
}

/// Which input of the dialog has the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    #[default]
    Username,
    Password,
}

/// Contents of the login/register dialog.
#[derive(Debug)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub username: String,
    password: String,
    pub field: AuthField,
    /// Last outcome message shown under the inputs.
    pub message: Option<String>,
    /// A request is in flight; further submits are ignored.
    pub submitting: bool,
}

impl AuthForm {
    pub fn new(mode: AuthMode) -> Self {
        Self {
            mode,
            username: String::new(),
            password: String::new(),
            field: AuthField::Username,
            message: None,
            submitting: false,
        }
    }

    pub fn push_char(&mut self, c: char) {
        match self.field {
            AuthField::Username => self.username.push(c),
            AuthField::Password => self.password.push(c),
        }
    }

    pub fn pop_char(&mut self) {
        match self.field {
            AuthField::Username => self.username.pop(),
            AuthField::Password => self.password.pop(),
        };
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            AuthField::Username => AuthField::Password,
            AuthField::Password => AuthField::Username,
        };
    }

    /// Password rendered as bullets.
    pub fn masked_password(&self) -> String {
        "•".repeat(self.password.chars().count())
    }

    /// Validate locally and hand out the credentials for submission.
    ///
    /// On missing input the form message is set and `None` is returned.
    pub fn take_credentials(&mut self) -> Option<(String, SecretString)> {
        let username = self.username.trim();
        if username.is_empty() || self.password.is_empty() {
            self.message = Some(MISSING_FIELDS_MESSAGE.to_string());
            return None;
        }
        self.message = None;
        self.submitting = true;
        Some((username.to_string(), SecretString::from(self.password.clone())))
    }

    /// Record an outcome. A successful registration clears the inputs so
    /// the user can log in next.
    pub fn finish(&mut self, outcome: &AuthOutcome) {
        self.submitting = false;
        match outcome {
            AuthOutcome::Registered => {
                self.username.clear();
                self.password.clear();
                self.field = AuthField::Username;
                self.message = Some(REGISTER_SUCCESS_MESSAGE.to_string());
            }
            AuthOutcome::Failed(message) => self.message = Some(message.clone()),
            AuthOutcome::LoggedIn { .. } => self.message = None,
        }
    }
}

/// Map a failed credential request to the text shown in the dialog.
pub fn failure_message(mode: AuthMode, err: &ApiError) -> String {
    match err {
        ApiError::Api { message, .. } => message
            .clone()
            .unwrap_or_else(|| mode.fallback_message().to_string()),
        ApiError::NotAuthenticated => mode.fallback_message().to_string(),
        _ => TRANSPORT_FAILED_MESSAGE.to_string(),
    }
}

/// Submit credentials for `mode` and classify the result.
pub async fn submit(
    client: &NewsClient,
    mode: AuthMode,
    username: &str,
    password: &SecretString,
) -> AuthOutcome {
    let result = match mode {
        AuthMode::Login => client
            .login(username, password)
            .await
            .map(|username| AuthOutcome::LoggedIn { username }),
        AuthMode::Register => client
            .register(username, password)
            .await
            .map(|()| AuthOutcome::Registered),
    };

    result.unwrap_or_else(|e| {
        tracing::warn!(mode = mode.title(), error = %e, "Credential request failed");
        AuthOutcome::Failed(failure_message(mode, &e))
    })
}

/// Submit on a background task; the outcome comes back as
/// [`AppEvent::AuthCompleted`] tagged with `page`.
pub fn spawn_submit(
    client: &NewsClient,
    mode: AuthMode,
    username: String,
    password: SecretString,
    page: u64,
    event_tx: &mpsc::Sender<AppEvent>,
) -> JoinHandle<()> {
    let client = client.clone();
    let tx = event_tx.clone();

    tokio::spawn(async move {
        let outcome = submit(&client, mode, &username, &password).await;
        if let Err(e) = tx.send(AppEvent::AuthCompleted { page, mode, outcome }).await {
            tracing::warn!(error = %e, "Failed to send auth outcome (receiver dropped)");
        }
    })
}
