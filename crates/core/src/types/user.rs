//! Session user types.

use serde::{Deserialize, Serialize};

use super::UserId;

/// The identity the API asserts for the current session.
///
/// Opaque to the client beyond display; the email is not validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID issued by the API.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address as stored by the API.
    pub email: String,
}

/// Body of `GET /api/auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The logged-in user.
    pub user: User,
}
