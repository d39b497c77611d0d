//! Client-facing projection of a user.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::user::{Address, Role, User, Verified};

/// Field names a [`UserProfile`] exposes, in wire order
pub const CLIENT_SCHEMA: [&str; 8] = [
    "_id",
    "avatarURL",
    "name",
    "email",
    "phone",
    "address",
    "role",
    "verified",
];

/// The allow-listed view of a [`User`]. Credentials and one-time codes are
/// never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "avatarURL")]
    pub avatar_url: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Vec<Address>,
    pub role: Role,
    pub verified: Verified,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            avatar_url: user.avatar_url.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            role: user.role,
            verified: user.verified,
        }
    }
}
