//! Email sign-in link generation and SMTP delivery.
//!
//! Sign-in tokens are opaque random strings; only their SHA-256 hash is
//! stored (see `login_tokens`). When SMTP is not configured the link is
//! logged at debug level instead of emailed, which keeps local development
//! working without a mail server.

use uuid::Uuid;

use crate::auth::jwt::hash_token;

/// Sign-in token lifetime in minutes.
pub const LOGIN_TOKEN_EXPIRY_MINS: i64 = 15;

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@taskflow.local";

/// Error type for sign-in email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

/// Configuration for the SMTP sign-in email service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and links should be logged instead.
    ///
    /// | Variable        | Required | Default                   |
    /// |-----------------|----------|---------------------------|
    /// | `SMTP_HOST`     | yes      | --                        |
    /// | `SMTP_PORT`     | no       | `587`                     |
    /// | `SMTP_FROM`     | no       | `noreply@taskflow.local`  |
    /// | `SMTP_USER`     | no       | --                        |
    /// | `SMTP_PASSWORD` | no       | --                        |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
        })
    }
}

/// Generate a random sign-in token.
///
/// Returns `(plaintext_token, sha256_hex_hash)`. The plaintext goes into the
/// emailed link; only the hash is persisted.
pub fn generate_login_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let hash = hash_token(&plaintext);
    (plaintext, hash)
}

/// Build the sign-in URL embedded in the email.
pub fn build_login_link(app_url: &str, token: &str) -> String {
    format!("{}/auth/verify?token={token}", app_url.trim_end_matches('/'))
}

/// Send a sign-in link to `to_email` via SMTP.
pub async fn send_login_email(
    config: &EmailConfig,
    to_email: &str,
    link: &str,
) -> Result<(), EmailError> {
    use lettre::{
        message::header::ContentType, transport::smtp::authentication::Credentials,
        AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    };

    let body = format!(
        "Sign in to Taskflow\n\n\
         Click the link below to sign in. It expires in {LOGIN_TOKEN_EXPIRY_MINS} minutes \
         and can be used once.\n\n{link}\n\n\
         If you did not request this email you can safely ignore it.\n"
    );

    let email = Message::builder()
        .from(config.from_address.parse()?)
        .to(to_email.parse()?)
        .subject("Sign in to Taskflow")
        .header(ContentType::TEXT_PLAIN)
        .body(body)
        .map_err(|e| EmailError::Build(e.to_string()))?;

    let mut builder =
        AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port);

    if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
        builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
    }

    let transport = builder.build();
    transport.send(email).await?;
    Ok(())
}
