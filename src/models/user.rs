use jiff::Timestamp;
use validator::ValidateEmail;

use crate::error::{AppError, AppResult};

/// A registered user.
///
/// `id` and `created_at` are fixed at construction; `updated_at` moves
/// forward on every successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Input for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub name: String,
}

/// Partial update. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub name: Option<String>,
}

impl User {
    /// Builds a validated user with `created_at == updated_at == now`.
    pub fn new(id: String, input: NewUser, now: Timestamp) -> AppResult<Self> {
        validate_name(&input.name)?;
        validate_email(&input.email)?;
        Ok(Self {
            id,
            email: input.email,
            name: input.name,
            created_at: now,
            updated_at: now,
        })
    }

    /// Applies every present field after validating it, then refreshes
    /// `updated_at` even when nothing else changed.
    ///
    /// Nothing is modified if any present field is invalid.
    pub fn apply(&mut self, changes: UserChanges, now: Timestamp) -> AppResult<()> {
        if let Some(email) = &changes.email {
            validate_email(email)?;
        }
        if let Some(name) = &changes.name {
            validate_name(name)?;
        }

        if let Some(email) = changes.email {
            self.email = email;
        }
        if let Some(name) = changes.name {
            self.name = name;
        }
        self.touch(now);
        Ok(())
    }

    fn touch(&mut self, now: Timestamp) {
        self.updated_at = now.max(self.created_at);
    }
}

fn validate_name(name: &str) -> AppResult<()> {
    if name.trim().is_empty() {
        return Err(AppError::validation("name", "Name is required"));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    if email.trim().is_empty() {
        return Err(AppError::validation("email", "Email is required"));
    }
    if !email.validate_email() {
        return Err(AppError::validation("email", "Invalid email format"));
    }
    Ok(())
}
