//! A client for the session-cookie authenticated API of a UniFi controller.
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use unictl_controller::{requests, session::MemoryStore, Client, Session};
//!
//! let session = Session::load(MemoryStore::default())?;
//! let client = Client::builder(&session).build()?;
//! let stations = requests::list_clients("default").send(&client).await?;
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod error;
mod psst;
pub mod requests;
pub mod responses;
pub mod session;

pub use client::{Client, ClientBuilder, Scheme, DEFAULT_PORT};
pub use error::Error;
pub use psst::Password;
pub use session::{Auth, AuthStore, Cookie, Session, StoreError};
