use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::actions::PendingAction;
use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// A configured password, either as plain text or as a bcrypt hash.
#[derive(Clone)]
pub enum Secret {
    Plain(String),
    Hashed(String),
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Secret::Plain(_) => f.write_str("Secret::Plain(<redacted>)"),
            Secret::Hashed(_) => f.write_str("Secret::Hashed(<redacted>)"),
        }
    }
}

impl Secret {
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Secret::Plain(expected) => expected == candidate,
            Secret::Hashed(hash) => bcrypt::verify(candidate, hash).unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Credentials {
    admin: Secret,
    user: Secret,
}

impl Credentials {
    pub fn new(admin: Secret, user: Secret) -> Self {
        Self { admin, user }
    }

    /// The admin secret is checked first.
    pub fn resolve(&self, password: &str) -> Option<Role> {
        if self.admin.matches(password) {
            Some(Role::Admin)
        } else if self.user.matches(password) {
            Some(Role::User)
        } else {
            None
        }
    }
}

/// Matches `password` on the blocking pool; bcrypt must not run on a runtime worker.
pub async fn resolve_password(credentials: Arc<Credentials>, password: String) -> Option<Role> {
    tokio::task::spawn_blocking(move || credentials.resolve(&password))
        .await
        .unwrap_or_else(|e| {
            log::error!("Password check panicked: {}", e);
            None
        })
}

pub enum GateOutcome {
    /// Run the action now.
    Proceed(PendingAction),
    /// The action is parked until the challenge is confirmed.
    ChallengeRequired,
}

/// Login state plus the re-authentication challenge.
///
/// Admins mutate directly. A user's mutation is parked as the single pending
/// action until the admin password is entered; dismissing the challenge or
/// logging out drops it. Passwords are resolved to a role with
/// [`resolve_password`] before the gate is consulted.
pub struct AuthGate {
    credentials: Arc<Credentials>,
    role: Option<Role>,
    pending: Option<PendingAction>,
}

impl AuthGate {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials: Arc::new(credentials),
            role: None,
            pending: None,
        }
    }

    pub fn credentials(&self) -> Arc<Credentials> {
        self.credentials.clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    /// A failed attempt keeps whatever role is already signed in.
    pub fn login(&mut self, resolved: Option<Role>) -> Result<Role, AppError> {
        match resolved {
            Some(role) => {
                log::info!("Logged in as {:?}", role);
                self.role = Some(role);
                Ok(role)
            }
            None => {
                log::warn!("Rejected login attempt");
                Err(AppError::Authentication)
            }
        }
    }

    pub fn logout(&mut self) {
        self.role = None;
        self.pending = None;
    }

    pub fn require_session(&self) -> Result<Role, AppError> {
        self.role.ok_or(AppError::NotAuthenticated)
    }

    pub fn request(&mut self, action: PendingAction) -> Result<GateOutcome, AppError> {
        match self.require_session()? {
            Role::Admin => Ok(GateOutcome::Proceed(action)),
            Role::User => {
                log::info!("Holding {} until the challenge is confirmed", action.label());
                self.pending = Some(action);
                Ok(GateOutcome::ChallengeRequired)
            }
        }
    }

    /// Only the admin secret releases the pending action. A wrong password
    /// leaves it parked.
    pub fn confirm(&mut self, resolved: Option<Role>) -> Result<PendingAction, AppError> {
        if self.pending.is_none() {
            return Err(AppError::NoPendingAction);
        }
        if resolved != Some(Role::Admin) {
            log::warn!("Rejected challenge confirmation");
            return Err(AppError::Authentication);
        }
        self.pending.take().ok_or(AppError::NoPendingAction)
    }

    pub fn dismiss(&mut self) -> bool {
        self.pending.take().is_some()
    }
}
