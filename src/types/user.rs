//! Ledger users

use serde::{Deserialize, Serialize};

/// User identifier
pub type UserId = String;

/// A person who owns accounts across one or more banks
///
/// Ownership is not structural: an account belongs to a user when its
/// `owner.owner_id` equals the user's id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
    pub email: String,
    pub password: String,
    pub created_at: String,
}

impl User {
    pub fn new(
        user_id: impl Into<UserId>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        User {
            user_id: user_id.into(),
            email: email.into(),
            password: password.into(),
            ..Default::default()
        }
    }
}
