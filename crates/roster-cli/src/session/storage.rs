//! Session storage for persisting login state.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use roster_core::{AccessToken, ApiUrl, RefreshToken, Session};
use roster_http::HttpSession;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Stored session data.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredSession {
    pub api: String,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub user: Option<Value>,
    pub logged_in_at: DateTime<Utc>,
}

impl StoredSession {
    /// Capture a freshly opened session.
    pub fn capture(session: &HttpSession) -> Self {
        Self {
            api: session.api().to_string(),
            access_token: session.access_token().as_str().to_string(),
            refresh_token: session.refresh_token().map(|t| t.as_str().to_string()),
            user: session.user(),
            logged_in_at: Utc::now(),
        }
    }

    /// Rebuild the HTTP session from the stored tokens.
    pub fn into_session(self) -> Result<HttpSession> {
        let api = ApiUrl::new(&self.api).context("Invalid API URL in session")?;
        let session = HttpSession::from_persisted(
            api,
            AccessToken::new(self.access_token),
            self.refresh_token.map(RefreshToken::new),
            self.user,
        )?;
        Ok(session)
    }
}

/// Get the session file path.
fn session_path() -> Result<PathBuf> {
    let dirs =
        ProjectDirs::from("", "", "roster").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// Save a session to disk.
pub fn save_session(stored: &StoredSession) -> Result<()> {
    let path = session_path()?;
    let json = serde_json::to_string_pretty(stored)?;

    fs::write(&path, &json).context("Failed to write session file")?;

    #[cfg(unix)]
    {
        let mut perms = fs::metadata(&path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(&path, perms)?;
    }

    tracing::debug!(path = %path.display(), "Session saved");
    Ok(())
}

/// Load the stored session, if there is one.
pub fn load_session() -> Result<Option<StoredSession>> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(None);
    }

    let json = fs::read_to_string(&path).context("Failed to read session file")?;
    let stored = serde_json::from_str(&json).context("Invalid session file")?;
    Ok(Some(stored))
}

/// Load the stored session as a live HTTP session, or fail with a hint.
pub fn require_session() -> Result<HttpSession> {
    load_session()
        .context("Failed to load session")?
        .context("No active session. Run 'roster login' first.")?
        .into_session()
}

/// Clear the stored session. Returns whether there was one.
pub fn clear_session() -> Result<bool> {
    let path = session_path()?;

    if !path.exists() {
        return Ok(false);
    }

    fs::remove_file(&path).context("Failed to remove session file")?;
    Ok(true)
}
