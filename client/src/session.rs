// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Persisted login credentials.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use crate::error::ApiError;
use crate::models::Token;

/// Store key holding the bearer access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Store key holding the token type, e.g. `bearer`.
pub const TOKEN_TYPE_KEY: &str = "token_type";

/// A persistent key-value store for credentials.
pub trait CredentialStore: fmt::Debug + Send + Sync {
    /// Returns the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), ApiError>;

    /// Removes `key` from the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn remove(&self, key: &str) -> Result<(), ApiError>;
}

/// In-process credential store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let values = self.values.read().ok()?;
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ApiError> {
        let mut values = self
            .values
            .write()
            .map_err(|e| ApiError::Store(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ApiError> {
        let mut values = self
            .values
            .write()
            .map_err(|e| ApiError::Store(e.to_string()))?;
        values.remove(key);
        Ok(())
    }
}

/// Login state shared by the HTTP client and the router guard.
///
/// A session is authenticated when both the access token and the token type
/// are present and non-empty.
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn CredentialStore>,
}

impl Session {
    /// Creates a session backed by `store`.
    pub fn new(store: impl CredentialStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a session backed by a fresh [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    /// Returns the stored access token.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY).filter(|a| !a.is_empty())
    }

    /// Returns the stored token type.
    #[must_use]
    pub fn token_type(&self) -> Option<String> {
        self.store.get(TOKEN_TYPE_KEY).filter(|a| !a.is_empty())
    }

    /// Returns the `Authorization` header value, `<type> <token>`.
    #[must_use]
    pub fn authorization(&self) -> Option<String> {
        let token = self.access_token()?;
        let token_type = self.token_type()?;
        Some(format!("{token_type} {token}"))
    }

    /// Whether both credential fields are present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.authorization().is_some()
    }

    /// Persists a token returned by the login endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn store_token(&self, token: &Token) -> Result<(), ApiError> {
        self.store.set(TOKEN_TYPE_KEY, &token.token_type)?;
        self.store.set(ACCESS_TOKEN_KEY, &token.access_token)
    }

    /// Forgets the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn clear(&self) -> Result<(), ApiError> {
        self.store.remove(TOKEN_TYPE_KEY)?;
        self.store.remove(ACCESS_TOKEN_KEY)
    }
}
