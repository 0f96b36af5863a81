//! Bundled in-process backend.
//!
//! Implements both seams so the console runs self-contained: accounts with
//! argon2 password hashes behind [`IdentityProvider`], and JSON document
//! collections behind [`DocumentStore`]. State optionally persists to one
//! snapshot file, written under an exclusive lock with a temp-file rename so
//! a crash mid-write never leaves a torn snapshot.
//!
//! The backend also carries fault hooks (`break_filtered`,
//! `break_collection`) that make a collection misbehave on demand. Tests use
//! them to exercise the dashboard's query-fallback policy.

use anyhow::{anyhow, Result};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use fs2::FileExt;
use log::{debug, warn};
use password_hash::{PasswordHasher, PasswordVerifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

use super::documents::{resolve_server_timestamps, Document, DocumentStore, StoreError};
use super::identity::{AuthError, Credential, IdentityProvider};
use crate::validation;

/// Snapshot files larger than this are refused at load time.
const MAX_SNAPSHOT_BYTES: usize = 8_000_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    uid: String,
    email: String,
    display_name: Option<String>,
    password_hash: String,
}

/// On-disk form of the backend state.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default)]
    accounts: Vec<Account>,
    #[serde(default)]
    collections: BTreeMap<String, BTreeMap<String, Document>>,
}

#[derive(Debug, Default)]
struct State {
    /// Keyed by lowercased email.
    accounts: HashMap<String, Account>,
    collections: BTreeMap<String, BTreeMap<String, Document>>,
    broken_queries: HashSet<String>,
    broken_collections: HashSet<String>,
}

/// In-process identity provider and document store.
pub struct MemoryBackend {
    state: Mutex<State>,
    session: watch::Sender<Option<Credential>>,
    snapshot_path: Option<PathBuf>,
    argon2: Argon2<'static>,
}

impl MemoryBackend {
    /// Fully in-memory backend with no snapshot file.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            session: watch::channel(None).0,
            snapshot_path: None,
            argon2: Argon2::default(),
        }
    }

    /// Backend persisted to `snapshot`, loading it when present. The parent
    /// directory is created as needed; the file appears on the first write.
    pub async fn open(snapshot: &Path) -> Result<Self> {
        if let Some(dir) = snapshot.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| anyhow!("Failed to create data directory {}: {}", dir.display(), e))?;
        }
        let mut state = State::default();
        match tokio::fs::read_to_string(snapshot).await {
            Ok(content) => {
                if content.len() > MAX_SNAPSHOT_BYTES {
                    return Err(anyhow!(
                        "Snapshot {} exceeds {} bytes",
                        snapshot.display(),
                        MAX_SNAPSHOT_BYTES
                    ));
                }
                // Guard against any accidental leading NULs
                let parsed: Snapshot = serde_json::from_str(content.trim_start_matches('\0'))
                    .map_err(|e| anyhow!("Failed to parse snapshot {}: {}", snapshot.display(), e))?;
                state.accounts = parsed
                    .accounts
                    .into_iter()
                    .map(|account| (account.email.to_lowercase(), account))
                    .collect();
                state.collections = parsed.collections;
                debug!("Loaded backend snapshot from {}", snapshot.display());
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(anyhow!("Failed reading snapshot {}: {}", snapshot.display(), e)),
        }
        Ok(Self {
            state: Mutex::new(state),
            session: watch::channel(None).0,
            snapshot_path: Some(snapshot.to_path_buf()),
            argon2: Argon2::default(),
        })
    }

    /// Make backend-filtered queries on `collection` fail while scans and
    /// point reads keep working, like an index outage.
    #[doc(hidden)]
    pub fn break_filtered(&self, collection: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.broken_queries.insert(collection.to_string());
        }
    }

    /// Make every operation on `collection` fail.
    #[doc(hidden)]
    pub fn break_collection(&self, collection: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.broken_collections.insert(collection.to_string());
        }
    }

    /// Clear both fault hooks for `collection`.
    #[doc(hidden)]
    pub fn restore(&self, collection: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.broken_queries.remove(collection);
            state.broken_collections.remove(collection);
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("backend state poisoned".to_string()))
    }

    fn check_collection(state: &State, collection: &str) -> Result<(), StoreError> {
        if state.broken_collections.contains(collection) {
            return Err(StoreError::Unavailable(collection.to_string()));
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = password_hash::SaltString::generate(&mut rand::thread_rng());
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::other(format!("Password hash failure: {e}")))?;
        Ok(hash.to_string())
    }

    /// Render the snapshot content while the lock is held; the file write
    /// happens after the lock is released.
    fn render_snapshot(&self, state: &State) -> Option<String> {
        self.snapshot_path.as_ref()?;
        let mut accounts: Vec<Account> = state.accounts.values().cloned().collect();
        accounts.sort_by(|a, b| a.email.cmp(&b.email));
        let snapshot = Snapshot {
            accounts,
            collections: state.collections.clone(),
        };
        match serde_json::to_string_pretty(&snapshot) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("Failed to serialize backend snapshot: {}", e);
                None
            }
        }
    }

    async fn persist(&self, content: Option<String>) -> Result<(), StoreError> {
        if let (Some(path), Some(content)) = (self.snapshot_path.as_ref(), content) {
            write_file_locked(path, &content)
                .map_err(|e| StoreError::Backend(format!("snapshot write failed: {e}")))?;
        }
        Ok(())
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Credential, AuthError> {
        let credential = {
            let state = self
                .state
                .lock()
                .map_err(|_| AuthError::other("backend state poisoned"))?;
            let key = email.trim().to_lowercase();
            let account = state.accounts.get(&key).ok_or(AuthError::UserNotFound)?;
            let parsed = password_hash::PasswordHash::new(&account.password_hash)
                .map_err(|e| AuthError::other(format!("Corrupt password hash: {e}")))?;
            if self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_err()
            {
                return Err(AuthError::WrongPassword);
            }
            Credential {
                uid: account.uid.clone(),
                email: account.email.clone(),
                display_name: account.display_name.clone(),
            }
        };
        self.session.send_replace(Some(credential.clone()));
        Ok(credential)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Credential, AuthError> {
        let clean = validation::validate_email(email).map_err(|_| AuthError::InvalidEmail)?;
        if password.len() < validation::MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let hash = self.hash_password(password)?;
        let (credential, snapshot) = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| AuthError::other("backend state poisoned"))?;
            let key = clean.to_lowercase();
            if state.accounts.contains_key(&key) {
                return Err(AuthError::EmailAlreadyInUse);
            }
            let account = Account {
                uid: Uuid::new_v4().to_string(),
                email: clean.clone(),
                display_name: None,
                password_hash: hash,
            };
            let credential = Credential {
                uid: account.uid.clone(),
                email: account.email.clone(),
                display_name: None,
            };
            state.accounts.insert(key, account);
            (credential, self.render_snapshot(&state))
        };
        self.persist(snapshot)
            .await
            .map_err(|e| AuthError::other(e.to_string()))?;
        Ok(credential)
    }

    async fn update_display_name(&self, uid: &str, display_name: &str) -> Result<(), AuthError> {
        let snapshot = {
            let mut state = self
                .state
                .lock()
                .map_err(|_| AuthError::other("backend state poisoned"))?;
            let account = state
                .accounts
                .values_mut()
                .find(|account| account.uid == uid)
                .ok_or(AuthError::UserNotFound)?;
            account.display_name = Some(display_name.to_string());
            self.render_snapshot(&state)
        };
        // A signed-in profile edit is a credential transition too
        let mut current = self.session.borrow().clone();
        if let Some(cred) = current.as_mut() {
            if cred.uid == uid {
                cred.display_name = Some(display_name.to_string());
                self.session.send_replace(current);
            }
        }
        self.persist(snapshot)
            .await
            .map_err(|e| AuthError::other(e.to_string()))?;
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.session.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<Credential>> {
        self.session.subscribe()
    }
}

#[async_trait]
impl DocumentStore for MemoryBackend {
    async fn add(&self, collection: &str, mut doc: Document) -> Result<String, StoreError> {
        let (id, snapshot) = {
            let mut state = self.lock()?;
            Self::check_collection(&state, collection)?;
            resolve_server_timestamps(&mut doc, Utc::now());
            let id = Uuid::new_v4().to_string();
            state
                .collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.clone(), doc);
            (id, self.render_snapshot(&state))
        };
        self.persist(snapshot).await?;
        Ok(id)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let state = self.lock()?;
        Self::check_collection(&state, collection)?;
        Ok(state
            .collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn put(&self, collection: &str, id: &str, mut doc: Document) -> Result<(), StoreError> {
        let snapshot = {
            let mut state = self.lock()?;
            Self::check_collection(&state, collection)?;
            resolve_server_timestamps(&mut doc, Utc::now());
            state
                .collections
                .entry(collection.to_string())
                .or_default()
                .insert(id.to_string(), doc);
            self.render_snapshot(&state)
        };
        self.persist(snapshot).await
    }

    async fn update(&self, collection: &str, id: &str, mut fields: Document) -> Result<(), StoreError> {
        let snapshot = {
            let mut state = self.lock()?;
            Self::check_collection(&state, collection)?;
            resolve_server_timestamps(&mut fields, Utc::now());
            let existing = state
                .collections
                .get_mut(collection)
                .and_then(|docs| docs.get_mut(id))
                .ok_or_else(|| StoreError::Missing {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            for (key, value) in fields {
                existing.insert(key, value);
            }
            self.render_snapshot(&state)
        };
        self.persist(snapshot).await
    }

    async fn query_eq(
        &self,
        collection: &str,
        field: &str,
        value: Value,
    ) -> Result<Vec<(String, Document)>, StoreError> {
        let state = self.lock()?;
        Self::check_collection(&state, collection)?;
        if state.broken_queries.contains(collection) {
            return Err(StoreError::QueryUnavailable(collection.to_string()));
        }
        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, doc)| doc.get(field) == Some(&value))
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_all(&self, collection: &str) -> Result<Vec<(String, Document)>, StoreError> {
        let state = self.lock()?;
        Self::check_collection(&state, collection)?;
        Ok(state
            .collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, doc)| (id.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// Write `content` to `path` under an exclusive lock, through a temp file in
/// the same directory plus an atomic rename.
fn write_file_locked(path: &Path, content: &str) -> Result<()> {
    use std::fs::{self, File, OpenOptions};
    use std::io::Write;

    // fs2 locks are synchronous; callers keep this off any lock they hold
    let lock_file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .open(path)?;
    lock_file.lock_exclusive()?;

    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("backend.json");
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                tmp.write_all(content.as_bytes())?;
                tmp.flush()?;
                let _ = tmp.sync_all();
                break candidate;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
                continue;
            }
            Err(e) => return Err(anyhow!("Failed to create temp file for atomic write: {}", e)),
        }
    };

    fs::rename(&tmp_path, path)?;

    // Fsync the directory to persist the rename (best-effort)
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }

    drop(lock_file);
    Ok(())
}
