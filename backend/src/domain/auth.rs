//! Authentication primitives: login credentials and strategy outcomes.
//!
//! Inbound adapters build [`LoginCredentials`] from request bodies; a
//! strategy turns them into an [`AuthResult`].

use std::fmt;

use zeroize::Zeroizing;

use super::{Email, Error, User};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication strategies.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use session_gateway::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" test@test.com", "password").unwrap();
/// assert_eq!(creds.email().as_ref(), "test@test.com");
/// assert_eq!(creds.password(), "password");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(|_| LoginValidationError::EmptyEmail)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used for the directory lookup.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Plaintext password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reason a login attempt was rejected.
///
/// Rejections are reported to the client verbatim; they intentionally reveal
/// whether the email or the password was wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No directory record matches the email.
    UnknownEmail,
    /// The record exists but the password does not match its hash.
    WrongPassword,
    /// Email or password was absent from the request.
    MissingCredentials,
}

impl AuthFailure {
    /// Short machine-oriented reason.
    pub fn reason(self) -> &'static str {
        match self {
            Self::UnknownEmail => "no email address",
            Self::WrongPassword => "wrong password",
            Self::MissingCredentials => "missing credentials",
        }
    }

    /// Plain-text body returned to the client.
    ///
    /// Only the strategy's own verdicts end in a newline; the missing
    /// credentials body is the bare string.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnknownEmail => "Invalid credentials. No email address.\n",
            Self::WrongPassword => "Invalid credentials. Wrong Password.\n",
            Self::MissingCredentials => "Missing credentials",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

impl From<LoginValidationError> for AuthFailure {
    fn from(_: LoginValidationError) -> Self {
        Self::MissingCredentials
    }
}

/// Non-error outcome of an authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    /// Credentials matched this directory record.
    Success(User),
    /// Credentials were rejected.
    Failure(AuthFailure),
}

/// Result of running a strategy: success, rejection, or an underlying fault.
pub type AuthResult = Result<AuthOutcome, Error>;
