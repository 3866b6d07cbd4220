use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An account. Only staff users may log in and manage letters.
///
/// The password hash lives in storage only and is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
}
