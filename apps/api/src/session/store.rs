use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::roi::InputSnapshot;
use crate::session::state::{CalculatorState, FieldEdit};

#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub state: CalculatorState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Copy of a session taken under the lock; safe to compute on after release.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub inputs: InputSnapshot,
}

impl From<&Session> for SessionSnapshot {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            created_at: session.created_at,
            updated_at: session.updated_at,
            inputs: session.state.snapshot(),
        }
    }
}

/// In-memory calculator sessions keyed by id.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session seeded with the default inputs.
    pub async fn create(&self) -> SessionSnapshot {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            state: CalculatorState::new(),
            created_at: now,
            updated_at: now,
        };
        let snapshot = SessionSnapshot::from(&session);
        self.sessions.write().await.insert(session.id, session);
        info!(session_id = %snapshot.session_id, "Calculator session created");
        snapshot
    }

    pub async fn get(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&id)
            .map(SessionSnapshot::from)
            .ok_or_else(|| not_found(id))
    }

    pub async fn apply(&self, id: Uuid, edit: FieldEdit) -> Result<SessionSnapshot, AppError> {
        self.update(id, |state| state.apply(edit)).await
    }

    pub async fn reset(&self, id: Uuid) -> Result<SessionSnapshot, AppError> {
        self.update(id, |state| {
            state.reset();
            Ok(())
        })
        .await
    }

    pub async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        self.sessions
            .write()
            .await
            .remove(&id)
            .map(|_| info!(session_id = %id, "Calculator session removed"))
            .ok_or_else(|| not_found(id))
    }

    pub async fn count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn update<F>(&self, id: Uuid, f: F) -> Result<SessionSnapshot, AppError>
    where
        F: FnOnce(&mut CalculatorState) -> Result<(), AppError>,
    {
        let mut sessions = self.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| not_found(id))?;
        f(&mut session.state)?;
        session.updated_at = Utc::now();
        debug!(session_id = %id, "Calculator session updated");
        Ok(SessionSnapshot::from(&*session))
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
