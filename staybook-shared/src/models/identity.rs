use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user as stored. Deliberately not `Serialize`: the hash must
/// never reach a response body, so handlers go through [`IdentitySummary`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

impl Identity {
    pub fn summary(&self) -> IdentitySummary {
        IdentitySummary {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    pub fn reference(&self) -> IdentityRef {
        IdentityRef {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

/// Outward view of an identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentitySummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// What a verified session token proves: who the caller is, nothing more.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRef {
    pub id: Uuid,
    pub email: String,
}
