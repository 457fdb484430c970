use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::models::fields::{pick_str, str_or};
use crate::models::Role;

/// Signed-in user as kept in the session file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub name: String,
    /// Application role after login mapping
    pub role: Role,
    /// Role string exactly as the API reported it
    #[serde(default)]
    pub api_role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub instansi: Option<String>,
}

impl UserProfile {
    /// Build the profile from the login response's user object.
    pub fn from_login_json(v: &Value) -> Self {
        let username = str_or(v, &["username", "email", "name"], "");
        let api_role = pick_str(v, &["role"]);
        let role = Role::from_login(&username, api_role.as_deref().unwrap_or(""));
        Self {
            name: pick_str(v, &["name", "full_name"]).unwrap_or_else(|| username.clone()),
            username,
            role,
            api_role,
            email: pick_str(v, &["email"]),
            instansi: pick_str(v, &["instansi", "dinas"]),
        }
    }
}
