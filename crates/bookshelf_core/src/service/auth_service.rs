//! Authentication use-case service.
//!
//! # Responsibility
//! - Provide login/signup/logout flows over the persisted user collection.
//! - Own the explicit session object: load at startup, clear on logout.
//!
//! # Invariants
//! - Email lookup is exact and case-sensitive.
//! - A failed login never modifies the session, persisted or in-memory.
//! - Passwords never appear in logs.

use crate::model::user::User;
use crate::model::ValidationError;
use crate::repo::catalog_repo::{CatalogError, CatalogRepository, CatalogResult};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for authentication use-cases.
#[derive(Debug)]
pub enum AuthError {
    /// No account with the supplied email.
    UserNotFound,
    /// Account exists but the password does not match.
    InvalidCredentials,
    /// Signup email is already registered.
    DuplicateEmail(String),
    /// Candidate account record failed validation.
    Validation(ValidationError),
    /// Persistence-layer failure.
    Catalog(CatalogError),
}

impl Display for AuthError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UserNotFound => write!(f, "user not found"),
            Self::InvalidCredentials => write!(f, "incorrect password"),
            Self::DuplicateEmail(email) => write!(f, "email already registered: `{email}`"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::Catalog(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AuthError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Catalog(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CatalogError> for AuthError {
    fn from(value: CatalogError) -> Self {
        match value {
            CatalogError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            CatalogError::Validation(err) => Self::Validation(err),
            other => Self::Catalog(other),
        }
    }
}

/// Authentication service holding the current session.
///
/// The session is explicit state on this service rather than an ambient
/// process-wide value: it is loaded from the store at construction and
/// cleared on `logout`.
pub struct AuthService<R: CatalogRepository> {
    repo: R,
    current: Option<User>,
}

impl<R: CatalogRepository> AuthService<R> {
    /// Creates the service, loading any persisted session.
    pub fn new(repo: R) -> CatalogResult<Self> {
        let current = repo.session()?;
        Ok(Self { repo, current })
    }

    /// Authenticates against the stored user collection.
    ///
    /// # Contract
    /// - `UserNotFound` when no account matches the email exactly.
    /// - `InvalidCredentials` on a password mismatch.
    /// - On success the session is persisted and the user returned.
    pub fn login(&mut self, email: &str, password: &str) -> Result<User, AuthError> {
        let Some(user) = self.repo.find_user_by_email(email)? else {
            info!("event=login module=auth status=denied reason=user_not_found");
            return Err(AuthError::UserNotFound);
        };

        if user.password != password {
            info!(
                "event=login module=auth status=denied reason=bad_password user_id={}",
                user.id
            );
            return Err(AuthError::InvalidCredentials);
        }

        self.repo.set_session(Some(&user))?;
        self.current = Some(user.clone());
        info!("event=login module=auth status=ok user_id={}", user.id);
        Ok(user)
    }

    /// Registers a new account and immediately establishes a session.
    ///
    /// # Contract
    /// - `DuplicateEmail` when the email is taken; the existing account is
    ///   left untouched.
    /// - The new account gets a fresh stable ID and current timestamp.
    pub fn signup(
        &mut self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        let user = User::new(email, password, name);
        self.repo.add_user(&user)?;
        self.repo.set_session(Some(&user))?;
        self.current = Some(user.clone());
        info!("event=signup module=auth status=ok user_id={}", user.id);
        Ok(user)
    }

    /// Clears the session unconditionally. No error cases beyond storage
    /// failure.
    pub fn logout(&mut self) -> CatalogResult<()> {
        self.repo.set_session(None)?;
        self.current = None;
        info!("event=logout module=auth status=ok");
        Ok(())
    }

    /// The currently authenticated user, if any.
    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref()
    }
}
