// Session lifecycle: login, logout, and the persisted session file.
//
// The session is the only client-side state that outlives an invocation.
// Data commands read it; only `login` and `logout` write it.

use std::fs;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use crate::api::{envelope, ApiClient, ApiError};
use crate::models::fields::pick_str;
use crate::models::UserProfile;

/// Failure reading, writing, or establishing a session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to read session file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write session file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse session file {path}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Login failed: No token received")]
    NoToken,
    #[error("Login failed: No user data received")]
    NoUser,
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl SessionError {
    /// Session file problems are internal; login rejections are user errors.
    pub fn is_internal(&self) -> bool {
        matches!(self, SessionError::Read { .. } | SessionError::Write { .. } | SessionError::Corrupt { .. })
    }
}

/// Persisted `{token, user}` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: UserProfile,
}

/// File-backed session storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the session; `None` when nobody is logged in.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&self.path).map_err(|source| SessionError::Read {
            path: self.path.clone(),
            source,
        })?;
        let session = serde_json::from_str(&contents).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(session))
    }

    /// Load the session or fail with the not-logged-in error.
    pub fn require(&self) -> Result<Session, SessionError> {
        self.load()?.ok_or(SessionError::Api(ApiError::NotAuthenticated))
    }

    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| SessionError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let contents = serde_json::to_string_pretty(session).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, contents).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Remove the session file. Clearing an absent session is not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("Session cleared at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Extract the session from a login response body.
///
/// Token comes from `data.token`, `token`, or `access_token`; the user from
/// `data.user` or `user`.
pub fn session_from_login(body: &Value) -> Result<Session, SessionError> {
    let data = body.get("data").unwrap_or(&Value::Null);
    let token = pick_str(data, &["token"])
        .or_else(|| pick_str(body, &["token", "access_token"]))
        .ok_or(SessionError::NoToken)?;
    let user = [data.get("user"), body.get("user")]
        .into_iter()
        .flatten()
        .find(|u| u.is_object())
        .ok_or(SessionError::NoUser)?;
    Ok(Session {
        token,
        user: UserProfile::from_login_json(user),
    })
}

/// Authenticate and persist the session. Nothing is written on failure.
pub fn login(client: &ApiClient, store: &SessionStore, username: &str, password: &str) -> Result<Session, SessionError> {
    let body = client.post("/auth/login", Some(json!({ "username": username, "password": password })))?;
    let session = session_from_login(&body)?;
    store.save(&session)?;
    log::info!("Logged in as {} ({})", session.user.username, session.user.role);
    Ok(session)
}

/// Notify the server, then clear the local session regardless of the outcome.
pub fn logout(client: &ApiClient, store: &SessionStore) -> Result<(), SessionError> {
    if client.has_token() {
        if let Err(e) = client.post("/auth/logout", None) {
            log::warn!("Logout request failed, clearing local session anyway: {}", e);
        }
    }
    store.clear()
}

/// Server-side profile of the signed-in user
pub fn profile(client: &ApiClient) -> Result<Value, ApiError> {
    let body = client.get("/auth/profile")?;
    Ok(envelope::payload(&body).clone())
}

/// Ask the server to send a password reset message
pub fn forgot_password(client: &ApiClient, email: &str) -> Result<Value, ApiError> {
    client.post("/auth/forgot-password", Some(json!({ "email": email })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::client::testing::FakeTransport;
    use crate::models::Role;
    use tempfile::TempDir;

    fn store() -> (TempDir, SessionStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::new(temp_dir.path().join("session.json"));
        (temp_dir, store)
    }

    #[test]
    fn test_session_from_nested_data() {
        let session = session_from_login(&json!({
            "data": {"token": "abc", "user": {"username": "kasi", "role": "ADMIN"}}
        })).unwrap();
        assert_eq!(session.token, "abc");
        assert_eq!(session.user.role, Role::Kasi);
    }

    #[test]
    fn test_session_from_flat_body() {
        let session = session_from_login(&json!({
            "access_token": "xyz",
            "user": {"username": "budi", "role": "ADMIN"}
        })).unwrap();
        assert_eq!(session.token, "xyz");
        assert_eq!(session.user.role, Role::Diskominfo);
    }

    #[test]
    fn test_session_missing_parts() {
        assert!(matches!(session_from_login(&json!({"data": {"user": {}}})), Err(SessionError::NoToken)));
        assert!(matches!(session_from_login(&json!({"token": "t"})), Err(SessionError::NoUser)));
    }

    #[test]
    fn test_store_roundtrip_and_clear() {
        let (_dir, store) = store();
        assert!(store.load().unwrap().is_none());
        let session = session_from_login(&json!({"token": "t", "user": {"username": "kabid"}})).unwrap();
        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn test_corrupt_session_is_internal() {
        let (_dir, store) = store();
        fs::write(store.path(), "{not json").unwrap();
        let err = store.load().unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_login_without_token_persists_nothing() {
        let (_dir, store) = store();
        let fake = FakeTransport::new();
        fake.respond(200, json!({"data": {"user": {"username": "kasi"}}}));
        let client = ApiClient::anonymous(fake.clone());
        let err = login(&client, &store, "kasi", "pw").unwrap_err();
        assert_eq!(err.to_string(), "Login failed: No token received");
        assert!(!store.path().exists());
        let sent = fake.sent();
        assert_eq!(sent[0].path, "/auth/login");
        assert_eq!(sent[0].body, Some(json!({"username": "kasi", "password": "pw"})));
    }

    #[test]
    fn test_logout_clears_even_when_request_fails() {
        let (_dir, store) = store();
        let session = session_from_login(&json!({"token": "t", "user": {"username": "kasi"}})).unwrap();
        store.save(&session).unwrap();
        let fake = FakeTransport::new();
        fake.fail("connection refused");
        let client = ApiClient::new(fake.clone(), Some(session.token.clone()));
        logout(&client, &store).unwrap();
        assert!(!store.path().exists());
        assert_eq!(fake.sent()[0].path, "/auth/logout");
    }

    #[test]
    fn test_profile_unwraps_data() {
        let fake = FakeTransport::new();
        fake.respond(200, json!({"data": {"username": "kasi", "email": "kasi@example.org"}}));
        let client = ApiClient::new(fake.clone(), Some("t".to_string()));
        let body = profile(&client).unwrap();
        assert_eq!(body["email"], "kasi@example.org");
        assert_eq!(fake.sent()[0].path, "/auth/profile");
    }

    #[test]
    fn test_forgot_password_posts_email() {
        let fake = FakeTransport::new();
        fake.respond(200, json!({"message": "sent"}));
        let client = ApiClient::anonymous(fake.clone());
        forgot_password(&client, "kasi@example.org").unwrap();
        let sent = fake.sent();
        assert_eq!(sent[0].path, "/auth/forgot-password");
        assert_eq!(sent[0].body, Some(json!({"email": "kasi@example.org"})));
        assert!(sent[0].bearer.is_none());
    }
}
