use bearergate_auth::{ClaimsError, RegisteredClaims, ValidateClaims};
use serde::{Deserialize, Serialize};

/// Claims carried by access tokens accepted by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    #[serde(flatten)]
    pub registered: RegisteredClaims,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl AccessClaims {
    pub fn subject(&self) -> Option<&str> {
        self.registered.sub.as_deref()
    }
}

impl ValidateClaims for AccessClaims {
    fn validate(&self, leeway: u64) -> Result<(), ClaimsError> {
        self.registered.validate(leeway)?;

        match self.subject() {
            Some(sub) if !sub.is_empty() => Ok(()),
            _ => Err(ClaimsError::Invalid("missing subject".to_string())),
        }
    }
}

/// Response body for `POST /api/profile/form`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEcho {
    pub subject: Option<String>,
    pub fields: Vec<String>,
}
