//! Utilities for storing the session locally across invocations.
use std::{fs, io, path::PathBuf};

use anyhow::Context;
use log::debug;
use unictl_controller::{Auth, AuthStore, StoreError};

const SESSION_FILE_NAME: &str = "session.json";

/// A directory holding the credentials and cookies of the last login.
#[derive(Clone, Debug)]
pub struct Database(PathBuf);

impl Database {
    pub fn open_or_create(data_dir: Option<PathBuf>) -> anyhow::Result<Self> {
        let db_dir = match data_dir {
            None => dirs::data_dir()
                .context("Could not infer a data directory")?
                .join("unictl"),
            Some(custom) => custom,
        };
        fs::create_dir_all(&db_dir).context("Failed to create the data directory")?;
        Ok(Self(db_dir))
    }

    fn session_file(&self) -> PathBuf {
        self.0.join(SESSION_FILE_NAME)
    }
}

impl AuthStore for Database {
    fn load(&self) -> Result<Auth, StoreError> {
        match fs::read_to_string(self.session_file()) {
            Ok(t) => Ok(serde_json::from_str(&t)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{SESSION_FILE_NAME} not found");
                Err(StoreError::Missing)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, auth: &Auth) -> Result<(), StoreError> {
        let text = serde_json::to_string_pretty(auth)?;
        fs::write(self.session_file(), text)?;
        debug!("Saved session with {} cookie(s)", auth.cookies.len());
        Ok(())
    }
}
