use serde::{Deserialize, Serialize};

/// The single administrator record. Only salted bcrypt digests are stored;
/// the plaintext password and security answer never leave the seeding or
/// recovery call that received them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredential {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub security_answer_hash: String,
}
