//! Downloader for Advent of Code puzzle inputs.
//! Authenticates with a session cookie taken from the environment and saves
//! each input as `<year>__<day>.txt`.

pub mod client;
pub mod credentials;
pub mod date;
pub mod download;
pub mod error;
pub mod session;
pub mod storage;

pub use client::{Client, FetchResult};
pub use credentials::{Credentials, Identity, resolve_credential};
pub use date::{EffectiveDate, resolve_date, resolve_date_at};
pub use download::Downloader;
pub use error::AocError;
pub use session::Session;
pub use storage::{DownloadRequest, default_path, persist};
