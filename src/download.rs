use crate::client::{BASE_URL, Client};
use crate::credentials::{Credentials, Identity, process_env};
use crate::date::resolve_date_at;
use crate::error::AocError;
use crate::session::Session;
use crate::storage::{DOWNLOAD_FOLDER, DownloadRequest, persist};
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client as HttpClient;
use reqwest::header::HeaderMap;
use std::path::PathBuf;

/// Runs the whole pipeline: credentials, date, session, fetch, persist.
///
/// Each step only runs when every earlier step succeeded.
#[derive(Debug, Clone)]
pub struct Downloader {
    base_url: String,
    download_folder: PathBuf,
    http: Option<(HttpClient, HeaderMap)>,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            download_folder: PathBuf::from(DOWNLOAD_FOLDER),
            http: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_download_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.download_folder = folder.into();
        self
    }

    /// Use a preconfigured client with `headers` on every request.
    ///
    /// Cookies the caller needs belong in `headers`: a `Cookie` set as a
    /// client default would be shadowed by the merged session cookie.
    pub fn with_http_client(mut self, http: HttpClient, headers: HeaderMap) -> Self {
        self.http = Some((http, headers));
        self
    }

    /// Download using the process environment and the current time.
    pub async fn download_input(
        &self,
        year: Option<i32>,
        day: Option<u32>,
        destination: Option<PathBuf>,
    ) -> Result<PathBuf, AocError> {
        self.download_input_with(year, day, destination, process_env, Utc::now())
            .await
    }

    /// Download with an explicit variable lookup and clock. Returns the written path.
    pub async fn download_input_with(
        &self,
        year: Option<i32>,
        day: Option<u32>,
        destination: Option<PathBuf>,
        lookup: impl Fn(&str) -> Option<String>,
        now: DateTime<Utc>,
    ) -> Result<PathBuf, AocError> {
        let credentials = Credentials::from_lookup(&lookup)?;
        let date = resolve_date_at(year, day, now)?;
        let request = DownloadRequest::new(date, destination);

        let session = match &self.http {
            Some((http, headers)) => {
                Session::with_client(http.clone(), headers.clone(), &credentials)?
            }
            None => Session::new(&credentials, &Identity::from_lookup(&lookup))?,
        };
        let client = Client::new(session).with_base_url(self.base_url.as_str());

        let body = client.fetch_input(&request.date).await?.validate()?;
        let path = request.destination_path(&self.download_folder);
        debug!("Writing {} bytes for {}", body.len(), request.date);
        persist(&body, &path)?;
        Ok(path)
    }
}
