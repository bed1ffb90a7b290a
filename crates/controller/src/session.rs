//! Facilities for keeping credentials and session cookies across runs.
//!
//! The [`Session`] owns the [`Auth`] and knows how to persist it through an [`AuthStore`].
//! Nothing in this crate saves implicitly; callers decide when [`Session::save`] or
//! [`Session::sync`] is worth the I/O.

use std::{
    fmt::{Display, Formatter},
    sync::{Arc, Mutex, PoisonError},
};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{psst::Password, Client};

/// A cookie as held by the jar for the controller address.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
}

impl Cookie {
    /// Parse the cookies of a `Cookie` request header, e.g. `a=1; b=2`.
    pub(crate) fn parse_header(header: &str) -> Vec<Self> {
        header
            .split(';')
            .filter_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                Some(Self {
                    name: name.to_string(),
                    value: value.to_string(),
                })
            })
            .collect()
    }
}

impl Display for Cookie {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let Self { name, value } = self;
        write!(f, "{name}={value}")
    }
}

/// Everything needed to talk to a controller.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Auth {
    pub username: String,
    pub password: Password,
    /// Hostname or IP address, without scheme or port. IPv6 addresses may omit the brackets.
    pub controller_host: String,
    #[serde(default)]
    pub cookies: Vec<Cookie>,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("No saved session")]
    Missing,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Format(#[from] serde_json::Error),
}

/// Durable storage for an [`Auth`].
pub trait AuthStore: Send {
    fn load(&self) -> Result<Auth, StoreError>;
    fn save(&self, auth: &Auth) -> Result<(), StoreError>;
}

/// An [`AuthStore`] that lives only as long as the process.
///
/// Clones share the same storage.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(Arc<Mutex<Option<Auth>>>);

impl MemoryStore {
    pub fn new(auth: Auth) -> Self {
        Self(Arc::new(Mutex::new(Some(auth))))
    }
}

impl AuthStore for MemoryStore {
    fn load(&self) -> Result<Auth, StoreError> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(StoreError::Missing)
    }

    fn save(&self, auth: &Auth) -> Result<(), StoreError> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(auth.clone());
        Ok(())
    }
}

/// Credentials and cookies together with the store they are persisted to.
pub struct Session {
    store: Box<dyn AuthStore>,
    auth: Auth,
}

impl Session {
    /// Start a session from credentials that may not have been saved before.
    pub fn new(store: impl AuthStore + 'static, auth: Auth) -> Self {
        Self {
            store: Box::new(store),
            auth,
        }
    }

    /// Resume whatever session was last saved to `store`.
    pub fn load(store: impl AuthStore + 'static) -> Result<Self, StoreError> {
        let auth = store.load()?;
        debug!(
            "Loaded session for {} at {} with {} cookie(s)",
            auth.username,
            auth.controller_host,
            auth.cookies.len()
        );
        Ok(Self::new(store, auth))
    }

    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Replace the remembered cookies with the current state of a jar.
    pub fn snapshot_cookies(&mut self, cookies: Vec<Cookie>) {
        self.auth.cookies = cookies;
    }

    pub fn save(&self) -> Result<(), StoreError> {
        self.store.save(&self.auth)
    }

    /// Snapshot the cookies held by `client` and save.
    pub fn sync(&mut self, client: &Client) -> Result<(), StoreError> {
        self.snapshot_cookies(client.cookies());
        self.save()
    }
}
