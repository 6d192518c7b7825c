//! Demo session layer. Credentials are checked for shape only — any
//! well-formed username/password pair is accepted and given an Admin
//! session. Roles carry an advisory permission set; nothing in the core
//! enforces it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PharmaError, Result};
use crate::store::{BlobStore, SESSION_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    View,
    Edit,
    Delete,
    ManageUsers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Pharmacist,
    Assistant,
}

impl Role {
    pub fn permissions(&self) -> &'static [Permission] {
        match self {
            Role::Admin => &[
                Permission::View,
                Permission::Edit,
                Permission::Delete,
                Permission::ManageUsers,
            ],
            Role::Pharmacist => &[Permission::View, Permission::Edit],
            Role::Assistant => &[Permission::View],
        }
    }

    pub fn allows(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => f.write_str("Admin"),
            Role::Pharmacist => f.write_str("Pharmacist"),
            Role::Assistant => f.write_str("Assistant"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub name: String,
    pub role: Role,
    pub token: String,
    pub logged_in_at: DateTime<Utc>,
}

/// Reads and writes the session record under [`SESSION_KEY`]. Storage
/// failures are logged and absorbed, matching the record store's policy.
pub struct SessionManager<B: BlobStore> {
    blob: B,
}

impl<B: BlobStore> SessionManager<B> {
    pub fn new(blob: B) -> Self {
        Self { blob }
    }

    /// Validate the credentials' shape, then issue a demo session. The only
    /// way to fail is malformed input.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Session> {
        validate_credentials(username, password)?;

        let session = Session {
            name: username.trim().to_string(),
            role: Role::Admin,
            token: format!("demo_token_{}", Uuid::new_v4().simple()),
            logged_in_at: Utc::now(),
        };

        match serde_json::to_string(&session) {
            Ok(text) => {
                if let Err(e) = self.blob.put(SESSION_KEY, &text) {
                    log::error!("could not persist session: {}", e);
                }
            }
            Err(e) => log::error!("could not serialize session: {}", e),
        }

        Ok(session)
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.blob.remove(SESSION_KEY) {
            log::error!("could not clear stored session: {}", e);
        }
    }

    /// The stored session, if any. Absent or unreadable content is treated
    /// as logged out.
    pub fn current(&self) -> Option<Session> {
        let text = match self.blob.get(SESSION_KEY) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("could not read stored session: {}", e);
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("stored session is malformed: {}", e);
                None
            }
        }
    }
}

fn validate_credentials(username: &str, password: &str) -> Result<()> {
    let mut problems = Vec::new();
    if username.trim().len() < 3 {
        problems.push("username must be at least 3 characters long");
    }
    if password.len() < 6 {
        problems.push("password must be at least 6 characters long");
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(PharmaError::Invalid(problems.join("; ")))
    }
}
