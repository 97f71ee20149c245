use serde::{Deserialize, Serialize};

/// Identidad verificada que el Auth Gate inyecta en las extensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}
