use std::sync::Arc;

use rand::Rng;

use crate::api::{InkwellApi, Session};
use crate::auth::storage::SessionStorage;
use crate::error::AppResult;

/// Where a browser context's sign-in is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    /// Persistent area, chosen with "remember me".
    Remembered,
    /// Volatile area, gone when the browser session or the process ends.
    Volatile,
}

/// Auth state of one browser context, read from storage once per request.
#[derive(Debug, Clone)]
pub struct AuthContext {
    context_id: String,
    session: Option<Session>,
    persistence: Option<Persistence>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self {
            context_id: generate_token(),
            session: None,
            persistence: None,
        }
    }

    pub fn context_id(&self) -> &str {
        &self.context_id
    }

    pub fn user(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn persistence(&self) -> Option<Persistence> {
        self.persistence
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Owns the two storage areas and is the only writer to them.
#[derive(Clone)]
pub struct SessionStore {
    persistent: Arc<dyn SessionStorage>,
    volatile: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(persistent: Arc<dyn SessionStorage>, volatile: Arc<dyn SessionStorage>) -> Self {
        Self {
            persistent,
            volatile,
        }
    }

    /// Restore the context named by `context_id`. The persistent area wins over the volatile
    /// one. Unreadable or malformed entries count as signed out.
    pub fn open(&self, context_id: &str) -> AuthContext {
        let areas = [
            (&self.persistent, Persistence::Remembered),
            (&self.volatile, Persistence::Volatile),
        ];

        for (storage, persistence) in areas {
            let payload = match storage.read(context_id) {
                Ok(Some(payload)) => payload,
                Ok(None) => continue,
                Err(e) => {
                    tracing::warn!(?persistence, "failed to read stored session: {}", e);
                    continue;
                }
            };
            match serde_json::from_str::<Session>(&payload) {
                Ok(session) => {
                    return AuthContext {
                        context_id: context_id.to_string(),
                        session: Some(session),
                        persistence: Some(persistence),
                    }
                }
                Err(e) => {
                    tracing::warn!(?persistence, "discarding malformed stored session: {}", e);
                }
            }
        }

        AuthContext {
            context_id: context_id.to_string(),
            session: None,
            persistence: None,
        }
    }

    /// Sign `session` in. The context gets a fresh token, the session is written to the area
    /// selected by `remember`, and the other area is cleared.
    pub fn login(&self, ctx: &mut AuthContext, session: Session, remember: bool) -> AppResult<()> {
        self.clear_all(&ctx.context_id)?;

        let context_id = generate_token();
        let payload = serde_json::to_string(&session)?;
        let (keep, other, persistence) = if remember {
            (&self.persistent, &self.volatile, Persistence::Remembered)
        } else {
            (&self.volatile, &self.persistent, Persistence::Volatile)
        };
        keep.write(&context_id, &payload)?;
        other.clear(&context_id)?;

        tracing::info!(username = %session.username, ?persistence, "signed in");
        ctx.context_id = context_id;
        ctx.session = Some(session);
        ctx.persistence = Some(persistence);
        Ok(())
    }

    /// Sign out. The server is told on a best-effort basis; local state and both storage areas
    /// are cleared whatever it answers.
    pub async fn logout(&self, ctx: &mut AuthContext, api: &dyn InkwellApi) {
        if let Err(e) = api.logout().await {
            tracing::warn!("Logout request failed: {}", e);
        }

        if let Some(session) = ctx.session.take() {
            tracing::info!(username = %session.username, "signed out");
        }
        ctx.persistence = None;
        if let Err(e) = self.clear_all(&ctx.context_id) {
            tracing::error!("failed to clear stored session: {}", e);
        }
    }

    fn clear_all(&self, context_id: &str) -> AppResult<()> {
        self.persistent.clear(context_id)?;
        self.volatile.clear(context_id)
    }
}

/// Generate a cryptographically random 32-byte hex token.
fn generate_token() -> String {
    let mut rng = rand::thread_rng();
    let bytes: [u8; 32] = rng.gen();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
