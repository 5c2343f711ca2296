//! Persistence of the session across the durable and session-scoped areas.

use super::{
    errors::{AuthError, AuthResult},
    models::{Session, User},
};
use crate::storage::{KeyValueStore, StorageError, StorageResult};
use std::sync::Arc;

/// Key holding the raw bearer token
pub const TOKEN_KEY: &str = "auth_token";
/// Key holding the JSON user record
pub const USER_KEY: &str = "user_info";
/// Key holding the "remember me" preference ("true"/"false"), durable area only
pub const REMEMBER_KEY: &str = "remember_me";

/// Token store over a durable and a session-scoped storage area.
///
/// The `remember_me` flag always lives in the durable area and decides where
/// the token and user record go.
#[derive(Clone)]
pub struct TokenStore {
    durable: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl TokenStore {
    /// Create a token store
    ///
    /// # Arguments
    ///
    /// * `durable` - Area that survives restarts
    /// * `session` - Area scoped to the current process
    pub fn new(durable: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { durable, session }
    }

    /// Persisted "remember me" preference
    pub fn remember_me(&self) -> bool {
        self.durable.get(REMEMBER_KEY).as_deref() == Some("true")
    }

    /// Preferred area first, the other one second
    fn areas(&self) -> [&dyn KeyValueStore; 2] {
        if self.remember_me() {
            [self.durable.as_ref(), self.session.as_ref()]
        } else {
            [self.session.as_ref(), self.durable.as_ref()]
        }
    }

    /// Persist a session
    ///
    /// Token and user go to the durable area when `remember_me` is set,
    /// otherwise to the session area. Copies left in the other area by an
    /// earlier login are removed so they cannot resurface on fallback.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if an area cannot be written; whatever was
    /// already written for this session is cleared again
    pub fn save(&self, token: &str, user: &User, remember_me: bool) -> StorageResult<()> {
        let user_json = serde_json::to_string(user)?;

        self.write_session(token, &user_json, remember_me)
            .inspect_err(|e| {
                log::warn!("Failed to persist session ({}); clearing partial record", e);
                if let Err(e) = self.clear() {
                    log::error!("Failed to clear partial session: {}", e);
                }
            })
    }

    fn write_session(&self, token: &str, user_json: &str, remember_me: bool) -> StorageResult<()> {
        self.durable
            .set(REMEMBER_KEY, if remember_me { "true" } else { "false" })?;

        let (target, other) = if remember_me {
            (&self.durable, &self.session)
        } else {
            (&self.session, &self.durable)
        };

        target.set(TOKEN_KEY, token)?;
        target.set(USER_KEY, user_json)?;
        other.remove(TOKEN_KEY)?;
        other.remove(USER_KEY)?;

        Ok(())
    }

    /// Load the persisted session, if any
    ///
    /// Reads the area selected by the `remember_me` flag and falls back to the
    /// other one. A token without a parseable user record wipes every area and
    /// yields `None`.
    pub fn load(&self) -> Option<Session> {
        match self.read_session() {
            Ok(session) => session,
            Err(e) => {
                log::warn!("{}; clearing session storage", e);
                if let Err(e) = self.clear() {
                    log::error!("Failed to clear corrupted session storage: {}", e);
                }
                None
            }
        }
    }

    /// Read the stored session without healing
    ///
    /// # Errors
    ///
    /// * `AuthError::CorruptedCache` - Token present but user record missing or unparseable
    pub fn read_session(&self) -> AuthResult<Option<Session>> {
        let Some((area, token)) = self
            .areas()
            .into_iter()
            .find_map(|area| area.get(TOKEN_KEY).map(|token| (area, token)))
        else {
            return Ok(None);
        };

        let user = area
            .get(USER_KEY)
            .and_then(|json| serde_json::from_str::<User>(&json).ok())
            .ok_or(AuthError::CorruptedCache)?;

        Ok(Some(Session { token, user }))
    }

    /// Raw token from the preferred area, falling back to the other one
    pub fn token(&self) -> Option<String> {
        self.areas().into_iter().find_map(|area| area.get(TOKEN_KEY))
    }

    /// Remove token, user and preference from both areas
    ///
    /// Every key is attempted even if an earlier removal fails; the first
    /// failure is returned.
    ///
    /// # Errors
    ///
    /// Returns the first `StorageError` encountered
    pub fn clear(&self) -> StorageResult<()> {
        let mut first_error: Option<StorageError> = None;

        for area in [&self.durable, &self.session] {
            for key in [TOKEN_KEY, USER_KEY, REMEMBER_KEY] {
                if let Err(e) = area.remove(key) {
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::Role;
    use crate::storage::MemoryStore;

    fn user() -> User {
        User {
            id: 42,
            name: "Carla".to_string(),
            email: "carla@laec.edu".to_string(),
            role: Role::Tecnico,
        }
    }

    /// Memory area that refuses writes to one key
    struct RefusingStore {
        inner: MemoryStore,
        refused: &'static str,
    }

    impl KeyValueStore for RefusingStore {
        fn get(&self, key: &str) -> Option<String> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            if key == self.refused {
                return Err(std::io::Error::other("disk full").into());
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_failed_save_leaves_no_partial_record() {
        let durable = Arc::new(RefusingStore {
            inner: MemoryStore::new(),
            refused: USER_KEY,
        });
        let session = Arc::new(MemoryStore::new());
        let store = TokenStore::new(durable.clone(), session);

        assert!(store.save("t.o.k", &user(), true).is_err());
        assert!(durable.get(REMEMBER_KEY).is_none());
        assert!(durable.get(TOKEN_KEY).is_none());
        assert!(store.token().is_none());
    }

    fn stores() -> (Arc<MemoryStore>, Arc<MemoryStore>, TokenStore) {
        let durable = Arc::new(MemoryStore::new());
        let session = Arc::new(MemoryStore::new());
        let store = TokenStore::new(durable.clone(), session.clone());
        (durable, session, store)
    }

    #[test]
    fn test_remembered_session_goes_to_durable_area() {
        let (durable, session, store) = stores();
        store.save("t.o.k", &user(), true).unwrap();

        assert_eq!(durable.get(TOKEN_KEY).as_deref(), Some("t.o.k"));
        assert_eq!(durable.get(REMEMBER_KEY).as_deref(), Some("true"));
        assert!(session.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_unremembered_session_goes_to_session_area() {
        let (durable, session, store) = stores();
        store.save("t.o.k", &user(), false).unwrap();

        assert_eq!(session.get(TOKEN_KEY).as_deref(), Some("t.o.k"));
        assert_eq!(durable.get(REMEMBER_KEY).as_deref(), Some("false"));
        assert!(durable.get(TOKEN_KEY).is_none());
        assert!(durable.get(USER_KEY).is_none());
    }

    #[test]
    fn test_load_round_trip() {
        let (_, _, store) = stores();
        store.save("t.o.k", &user(), false).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "t.o.k");
        assert_eq!(loaded.user, user());
    }

    #[test]
    fn test_load_falls_back_to_other_area() {
        let (durable, session, store) = stores();
        // Flag says durable, but the token only exists in the session area
        durable.set(REMEMBER_KEY, "true").unwrap();
        session.set(TOKEN_KEY, "s.e.s").unwrap();
        session
            .set(USER_KEY, &serde_json::to_string(&user()).unwrap())
            .unwrap();

        assert_eq!(store.load().unwrap().token, "s.e.s");
        assert_eq!(store.token().as_deref(), Some("s.e.s"));
    }

    #[test]
    fn test_corrupted_user_wipes_storage() {
        let (durable, session, store) = stores();
        store.save("t.o.k", &user(), true).unwrap();
        durable.set(USER_KEY, "{broken").unwrap();

        assert!(store.load().is_none());
        assert!(durable.is_empty());
        assert!(session.is_empty());
    }

    #[test]
    fn test_token_without_user_is_treated_as_corrupted() {
        let (durable, _, store) = stores();
        durable.set(REMEMBER_KEY, "true").unwrap();
        durable.set(TOKEN_KEY, "t.o.k").unwrap();

        assert!(matches!(store.read_session(), Err(AuthError::CorruptedCache)));

        assert!(store.load().is_none());
        assert!(durable.get(TOKEN_KEY).is_none());
    }

    #[test]
    fn test_relogin_without_remember_drops_durable_copy() {
        let (durable, _, store) = stores();
        store.save("old.tok.en", &user(), true).unwrap();
        store.save("new.tok.en", &user(), false).unwrap();

        assert!(durable.get(TOKEN_KEY).is_none());
        assert_eq!(store.load().unwrap().token, "new.tok.en");
    }

    #[test]
    fn test_clear_removes_everything() {
        let (durable, session, store) = stores();
        store.save("a.b.c", &user(), true).unwrap();
        session.set(TOKEN_KEY, "x.y.z").unwrap();

        store.clear().unwrap();
        assert!(durable.is_empty());
        assert!(session.is_empty());
        assert!(store.load().is_none());
    }
}
