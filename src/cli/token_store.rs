use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::cli::config::get_config_dir;

const TOKEN_FILE: &str = "token";

/// Where the CLI keeps the session token between invocations
pub trait TokenStore: Send + Sync {
    fn get(&self) -> io::Result<Option<String>>;
    fn set(&self, token: &str) -> io::Result<()>;
    fn remove(&self) -> io::Result<()>;
}

/// Token persisted to a single file in the CLI config directory
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: config_dir.into().join(TOKEN_FILE),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> io::Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                Ok((!token.is_empty()).then(|| token.to_string()))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&self, token: &str) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(token.as_bytes())
    }

    fn remove(&self) -> io::Result<()> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// Token kept for the lifetime of the process only
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> io::Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, token: &str) -> io::Result<()> {
        *self.lock()? = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> io::Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}

impl MemoryTokenStore {
    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "token store lock poisoned"))
    }
}

/// `SCHEDULE_TOKEN_STORE=memory|file` forces a backend; otherwise the file
/// store is used whenever a config directory can be resolved.
pub fn select_token_store() -> Arc<dyn TokenStore> {
    match std::env::var("SCHEDULE_TOKEN_STORE").as_deref() {
        Ok("memory") => return Arc::new(MemoryTokenStore::new()),
        Ok("file") | Err(_) => {}
        Ok(other) => tracing::warn!("Unknown SCHEDULE_TOKEN_STORE '{}', using default", other),
    }

    match get_config_dir() {
        Ok(dir) => Arc::new(FileTokenStore::new(dir)),
        Err(e) => {
            tracing::warn!("No config directory ({}), token will not persist", e);
            Arc::new(MemoryTokenStore::new())
        }
    }
}

#[derive(Debug, Deserialize)]
struct ExpiryClaims {
    #[allow(dead_code)]
    exp: i64,
}

/// Local expiry check without the server secret.
fn is_unexpired(token: &str) -> bool {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.leeway = 0;

    decode::<ExpiryClaims>(token, &DecodingKey::from_secret(&[]), &validation).is_ok()
}

/// Stored token if it is still usable. Expired or malformed tokens are
/// dropped from the store.
pub fn valid_token(store: &dyn TokenStore) -> io::Result<Option<String>> {
    let Some(token) = store.get()? else {
        return Ok(None);
    };

    if is_unexpired(&token) {
        Ok(Some(token))
    } else {
        tracing::debug!("Discarding expired or malformed token");
        store.remove()?;
        Ok(None)
    }
}

pub fn token_is_valid(store: &dyn TokenStore) -> io::Result<bool> {
    Ok(valid_token(store)?.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtKeys;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get().unwrap(), None);
        store.set("abc").unwrap();
        assert_eq!(store.get().unwrap().as_deref(), Some("abc"));
        store.remove().unwrap();
        assert_eq!(store.get().unwrap(), None);
    }

    #[test]
    fn file_store_persists_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());

        assert_eq!(store.get().unwrap(), None);
        store.set("tok-1").unwrap();
        assert_eq!(FileTokenStore::new(dir.path()).get().unwrap().as_deref(), Some("tok-1"));

        store.remove().unwrap();
        assert!(!store.path().exists());
        // removing twice is fine
        store.remove().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path());
        store.set("secret").unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn valid_token_keeps_fresh_token() {
        let keys = JwtKeys::new("any-secret", 24);
        let token = keys.issue(1, "a@example.com").unwrap();

        let store = MemoryTokenStore::new();
        store.set(&token).unwrap();
        assert!(token_is_valid(&store).unwrap());
        assert_eq!(valid_token(&store).unwrap(), Some(token));
    }

    #[test]
    fn valid_token_drops_expired_and_garbage() {
        let keys = JwtKeys::new("any-secret", 24);
        let now = chrono::Utc::now().timestamp();
        let expired = keys
            .sign(&crate::auth::Claims {
                user_id: 1,
                email: "a@example.com".into(),
                iat: now - 7200,
                exp: now - 3600,
            })
            .unwrap();

        let store = MemoryTokenStore::new();
        store.set(&expired).unwrap();
        assert_eq!(valid_token(&store).unwrap(), None);
        assert_eq!(store.get().unwrap(), None);

        store.set("not-a-jwt").unwrap();
        assert_eq!(valid_token(&store).unwrap(), None);
        assert_eq!(store.get().unwrap(), None);
    }
}
