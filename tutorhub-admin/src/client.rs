//! HTTP client for the admin API
//!
//! Wraps the REST endpoints and keeps the signed-in session on disk so
//! separate invocations stay authenticated.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use tutorhub_core::model::{Account, AdminProfile, Booking, TutorApplication};
use tutorhub_core::stats::DashboardStats;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A signed-in session as persisted between invocations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSession {
    pub token: String,
    pub admin: AdminProfile,
}

#[derive(Deserialize)]
struct LoginEnvelope {
    token: String,
    admin: AdminProfile,
}

#[derive(Deserialize)]
struct MessageEnvelope {
    message: String,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    users: Vec<Account>,
}

#[derive(Deserialize)]
struct ApplicationsEnvelope {
    applications: Vec<TutorApplication>,
}

#[derive(Deserialize)]
struct BookingsEnvelope {
    bookings: Vec<Booking>,
}

/// Client for the admin API
pub struct AdminClient {
    http: Client,
    base_url: String,
    session_path: PathBuf,
    session: Option<StoredSession>,
}

impl AdminClient {
    /// Create a client, restoring any session stored at `session_path`
    pub fn new(base_url: &str, session_path: &Path) -> Self {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let session = load_session(session_path);

        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_path: session_path.to_path_buf(),
            session,
        }
    }

    /// The restored session, if any
    pub fn session(&self) -> Option<&StoredSession> {
        self.session.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Result<&str, ClientError> {
        self.session
            .as_ref()
            .map(|s| s.token.as_str())
            .ok_or(ClientError::NotLoggedIn)
    }

    fn authed(&self, builder: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        Ok(builder.bearer_auth(self.token()?))
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }
        Ok(response.json().await?)
    }

    fn clear_session(&mut self) -> Result<(), ClientError> {
        self.session = None;
        if self.session_path.exists() {
            std::fs::remove_file(&self.session_path)?;
        }
        Ok(())
    }

    /// POST /api/admin/login, persisting the session on success
    pub async fn login(&mut self, email: &str, password: &str) -> Result<AdminProfile, ClientError> {
        let response = self
            .http
            .post(self.url("/api/admin/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        let body: LoginEnvelope = Self::parse(response).await?;
        let session = StoredSession {
            token: body.token,
            admin: body.admin.clone(),
        };
        save_session(&self.session_path, &session)?;
        self.session = Some(session);

        Ok(body.admin)
    }

    /// POST /api/admin/logout, then drop the stored session
    ///
    /// A token the server already rejects still clears the local
    /// session; only transport failures keep it.
    pub async fn logout(&mut self) -> Result<String, ClientError> {
        let request = self.authed(self.http.post(self.url("/api/admin/logout")))?;
        let result = async { Self::parse::<MessageEnvelope>(request.send().await?).await }.await;

        match result {
            Ok(body) => {
                self.clear_session()?;
                Ok(body.message)
            }
            Err(ClientError::Api { status: 401, .. }) => {
                self.clear_session()?;
                Ok("Logged out".to_string())
            }
            Err(err) => Err(err),
        }
    }

    /// GET /api/admin/me
    pub async fn me(&self) -> Result<AdminProfile, ClientError> {
        let request = self.authed(self.http.get(self.url("/api/admin/me")))?;
        Self::parse(request.send().await?).await
    }

    /// GET /api/admin/users
    pub async fn list_users(&self, role: Option<&str>) -> Result<Vec<Account>, ClientError> {
        let mut request = self.authed(self.http.get(self.url("/api/admin/users")))?;
        if let Some(role) = role {
            request = request.query(&[("role", role)]);
        }
        let body: UsersEnvelope = Self::parse(request.send().await?).await?;
        Ok(body.users)
    }

    /// PATCH /api/admin/users/:uid/block
    pub async fn set_block_status(&self, uid: &str, blocked: bool) -> Result<String, ClientError> {
        let request = self
            .authed(
                self.http
                    .patch(self.url(&format!("/api/admin/users/{uid}/block"))),
            )?
            .json(&json!({ "isBlocked": blocked }));
        let body: MessageEnvelope = Self::parse(request.send().await?).await?;
        Ok(body.message)
    }

    /// GET /api/admin/tutor-applications
    pub async fn list_applications(
        &self,
        status: Option<&str>,
    ) -> Result<Vec<TutorApplication>, ClientError> {
        let mut request = self.authed(self.http.get(self.url("/api/admin/tutor-applications")))?;
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }
        let body: ApplicationsEnvelope = Self::parse(request.send().await?).await?;
        Ok(body.applications)
    }

    /// PATCH /api/admin/tutor-applications/:id/status
    pub async fn review_application(&self, id: &str, status: &str) -> Result<String, ClientError> {
        let request = self
            .authed(
                self.http
                    .patch(self.url(&format!("/api/admin/tutor-applications/{id}/status"))),
            )?
            .json(&json!({ "status": status }));
        let body: MessageEnvelope = Self::parse(request.send().await?).await?;
        Ok(body.message)
    }

    /// GET /api/admin/bookings
    pub async fn list_bookings(
        &self,
        status: Option<&str>,
        from: Option<&str>,
        to: Option<&str>,
    ) -> Result<Vec<Booking>, ClientError> {
        let mut request = self.authed(self.http.get(self.url("/api/admin/bookings")))?;
        if let Some(status) = status {
            request = request.query(&[("status", status)]);
        }
        if let Some(from) = from {
            request = request.query(&[("from", from)]);
        }
        if let Some(to) = to {
            request = request.query(&[("to", to)]);
        }
        let body: BookingsEnvelope = Self::parse(request.send().await?).await?;
        Ok(body.bookings)
    }

    /// GET /api/admin/stats
    pub async fn stats(&self) -> Result<DashboardStats, ClientError> {
        let request = self.authed(self.http.get(self.url("/api/admin/stats")))?;
        Self::parse(request.send().await?).await
    }

    /// GET /api/admin/stats/live, invoking `on_stats` for every frame
    ///
    /// Runs until the server closes the stream.
    pub async fn watch_stats<F>(&self, mut on_stats: F) -> Result<(), ClientError>
    where
        F: FnMut(DashboardStats),
    {
        // The stream stays open indefinitely, so this request skips the
        // client-wide timeout
        let stream_client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let response = stream_client
            .get(self.url("/api/admin/stats/live"))
            .bearer_auth(self.token()?)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(pos) = buffer.find("\n\n") {
                let frame = buffer[..pos].to_string();
                buffer.drain(..pos + 2);
                if let Some(stats) = parse_sse_frame(&frame)? {
                    on_stats(stats);
                }
            }
        }

        Ok(())
    }
}

async fn api_error(response: Response) -> ClientError {
    let status = response.status().as_u16();
    let message = match response.json::<MessageEnvelope>().await {
        Ok(body) => body.message,
        Err(_) => "Unknown error".to_string(),
    };
    ClientError::Api { status, message }
}

/// Parse one server-sent event frame, returning the payload for data
/// frames and `None` for comments and keep-alives
fn parse_sse_frame(frame: &str) -> Result<Option<DashboardStats>, ClientError> {
    let mut data = String::new();
    for line in frame.lines() {
        if let Some(rest) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(rest.trim_start());
        }
    }

    if data.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&data)?))
}

fn load_session(path: &Path) -> Option<StoredSession> {
    let raw = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

fn save_session(path: &Path, session: &StoredSession) -> Result<(), ClientError> {
    std::fs::write(path, serde_json::to_string_pretty(session)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorhub_core::model::Role;

    fn session() -> StoredSession {
        StoredSession {
            token: "token-123".to_string(),
            admin: AdminProfile {
                uid: "admin-1".to_string(),
                email: "admin@tutorhub.test".to_string(),
                display_name: "Admin".to_string(),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn test_session_round_trips_through_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        save_session(&path, &session()).unwrap();
        let restored = load_session(&path).unwrap();

        assert_eq!(restored.token, "token-123");
        assert_eq!(restored.admin.uid, "admin-1");
    }

    #[test]
    fn test_corrupt_session_file_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(load_session(&path).is_none());
    }

    #[test]
    fn test_missing_session_file_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        assert!(load_session(&dir.path().join("absent.json")).is_none());
    }

    #[test]
    fn test_parse_sse_data_frame() {
        let stats = DashboardStats {
            total_users: 3,
            ..DashboardStats::default()
        };
        let frame = format!("data: {}", serde_json::to_string(&stats).unwrap());

        let parsed = parse_sse_frame(&frame).unwrap().unwrap();
        assert_eq!(parsed, stats);
    }

    #[test]
    fn test_parse_sse_keep_alive_frame() {
        assert!(parse_sse_frame(":").unwrap().is_none());
        assert!(parse_sse_frame(": keep-alive").unwrap().is_none());
    }

    #[test]
    fn test_parse_sse_garbage_data_errors() {
        assert!(parse_sse_frame("data: not-json").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let dir = tempfile::TempDir::new().unwrap();
        let client = AdminClient::new("http://localhost:3000/", &dir.path().join("s.json"));

        assert_eq!(client.url("/api/admin/me"), "http://localhost:3000/api/admin/me");
    }
}
