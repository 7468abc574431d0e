//! Identity model and the login boundary type

use serde::{Deserialize, Serialize};

use crate::error::AccessError;
use crate::models::Role;

/// The signed-in actor
///
/// This is also the persisted session record: `{id, email, name, role}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl Identity {
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
            role,
        }
    }
}

/// Successful login result as delivered by the authentication backend
///
/// The role arrives as a raw string and is only trusted once it parses into
/// a known [`Role`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl TryFrom<LoginResult> for Identity {
    type Error = AccessError;

    fn try_from(result: LoginResult) -> Result<Self, Self::Error> {
        let role = result.role.parse()?;
        Ok(Identity {
            id: result.id,
            email: result.email,
            name: result.name,
            role,
        })
    }
}
