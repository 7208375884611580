use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::auth::models::PasswordRedemption;
use crate::domain::auth::models::RedemptionOutcome;
use crate::domain::auth::models::ResetToken;
use crate::domain::auth::models::SessionToken;
use crate::domain::auth::ports::ResetRepository;
use crate::domain::auth::ports::SessionRepository;
use crate::domain::errors::PersistenceError;
use crate::domain::health::DatabaseHealth;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PageRequest;
use crate::domain::user::models::User;
use crate::domain::user::models::UserFilter;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    sessions: HashMap<String, SessionToken>,
    resets: HashMap<String, ResetToken>,
}

/// Process-local store implementing every repository port.
///
/// A single mutex guards all three tables, held only for the duration of one
/// call, so `redeem` is atomic with respect to every other operation.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, PersistenceError> {
        self.state
            .lock()
            .map_err(|_| PersistenceError::Unavailable("in-memory store lock poisoned".to_string()))
    }

    /// Number of stored reset records for `email`.
    pub fn reset_count(&self, email: &EmailAddress) -> Result<usize, PersistenceError> {
        Ok(self
            .state()?
            .resets
            .values()
            .filter(|reset| &reset.email == email)
            .count())
    }

    /// Number of stored sessions, live or not.
    pub fn session_count(&self) -> Result<usize, PersistenceError> {
        Ok(self.state()?.sessions.len())
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, PersistenceError> {
        let mut state = self.state()?;

        if state.users.values().any(|u| u.email == user.email) {
            return Err(PersistenceError::Duplicate("users_email_key".to_string()));
        }

        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, PersistenceError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|u| &u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, PersistenceError> {
        Ok(self.state()?.users.get(id).cloned())
    }

    async fn update(&self, mut user: User) -> Result<User, PersistenceError> {
        let mut state = self.state()?;

        if state
            .users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(PersistenceError::Duplicate("users_email_key".to_string()));
        }

        match state.users.get_mut(&user.id) {
            Some(stored) => {
                user.updated_at = Utc::now();
                *stored = user.clone();
                Ok(user)
            }
            None => Err(PersistenceError::NotFound(format!("user {}", user.id))),
        }
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> Result<(Vec<User>, u64), PersistenceError> {
        let state = self.state()?;

        let mut matching: Vec<&User> = state.users.values().filter(|u| filter.matches(u)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .cloned()
            .collect();

        Ok((items, total))
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create(&self, session: SessionToken) -> Result<SessionToken, PersistenceError> {
        let mut state = self.state()?;

        if state.sessions.contains_key(&session.token) {
            return Err(PersistenceError::Duplicate(
                "refresh_tokens_token_key".to_string(),
            ));
        }

        state.sessions.insert(session.token.clone(), session.clone());
        Ok(session)
    }

    async fn find(&self, token: &str) -> Result<Option<SessionToken>, PersistenceError> {
        Ok(self.state()?.sessions.get(token).cloned())
    }

    async fn revoke(&self, token: &str) -> Result<bool, PersistenceError> {
        let mut state = self.state()?;

        match state.sessions.get_mut(token) {
            Some(session) if !session.revoked => {
                session.revoked = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn revoke_all(&self, user_id: &UserId) -> Result<u64, PersistenceError> {
        let mut state = self.state()?;
        Ok(revoke_sessions(&mut state, user_id))
    }

    async fn cleanup_expired(&self) -> Result<u64, PersistenceError> {
        let mut state = self.state()?;
        let now = Utc::now();

        let before = state.sessions.len();
        state
            .sessions
            .retain(|_, session| !session.revoked && !session.is_expired(now));

        Ok((before - state.sessions.len()) as u64)
    }
}

fn revoke_sessions(state: &mut State, user_id: &UserId) -> u64 {
    let mut revoked = 0;
    for session in state.sessions.values_mut() {
        if session.user_id == *user_id && !session.revoked {
            session.revoked = true;
            revoked += 1;
        }
    }
    revoked
}

#[async_trait]
impl ResetRepository for InMemoryStore {
    async fn create(&self, reset: ResetToken) -> Result<ResetToken, PersistenceError> {
        let mut state = self.state()?;

        if state.resets.contains_key(&reset.token) {
            return Err(PersistenceError::Duplicate(
                "password_resets_token_key".to_string(),
            ));
        }

        state.resets.insert(reset.token.clone(), reset.clone());
        Ok(reset)
    }

    async fn find(&self, token: &str) -> Result<Option<ResetToken>, PersistenceError> {
        Ok(self.state()?.resets.get(token).cloned())
    }

    async fn mark_used(&self, token: &str) -> Result<bool, PersistenceError> {
        let mut state = self.state()?;

        match state.resets.get_mut(token) {
            Some(reset) if !reset.used => {
                reset.used = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn redeem(
        &self,
        redemption: &PasswordRedemption,
    ) -> Result<RedemptionOutcome, PersistenceError> {
        let mut state = self.state()?;

        match state.resets.get(&redemption.token) {
            Some(reset) if !reset.used => {}
            _ => return Ok(RedemptionOutcome::AlreadyUsed),
        }

        let Some(user) = state.users.get_mut(&redemption.user_id) else {
            return Err(PersistenceError::NotFound(format!(
                "user {}",
                redemption.user_id
            )));
        };
        user.password_hash = redemption.password_hash.clone();
        user.updated_at = Utc::now();

        if let Some(reset) = state.resets.get_mut(&redemption.token) {
            reset.used = true;
        }

        let revoked_sessions = revoke_sessions(&mut state, &redemption.user_id);

        Ok(RedemptionOutcome::Redeemed { revoked_sessions })
    }

    async fn cleanup_expired(&self) -> Result<u64, PersistenceError> {
        let mut state = self.state()?;
        let now = Utc::now();

        let before = state.resets.len();
        state
            .resets
            .retain(|_, reset| !reset.used && !reset.is_expired(now));

        Ok((before - state.resets.len()) as u64)
    }
}

#[async_trait]
impl DatabaseHealth for InMemoryStore {
    async fn ping(&self) -> Result<(), PersistenceError> {
        self.state().map(|_| ())
    }
}
