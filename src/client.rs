use crate::date::EffectiveDate;
use crate::error::AocError;
use crate::session::Session;
use log::{debug, info};
use reqwest::StatusCode;

pub const BASE_URL: &str = "https://adventofcode.com";
const INPUT_RESOURCE: &str = "input";
const LOGIN_WALL_PHRASE: &[u8] = b"identify yourself";
const PREVIEW_CHARS: usize = 50;

/// Raw response of a puzzle resource request, not yet validated.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub url: String,
}

impl FetchResult {
    /// Accept only a 200 response that is not a login page.
    pub fn validate(self) -> Result<Vec<u8>, AocError> {
        if self.status != StatusCode::OK {
            return Err(AocError::AuthenticationOrServerError {
                url: self.url,
                status: self.status,
            });
        }
        if is_login_wall(&self.body) {
            return Err(AocError::AuthenticationRequired { url: self.url });
        }
        info!("Valid response obtained");
        debug!("{}...", preview(&self.body));
        Ok(self.body)
    }
}

fn is_login_wall(body: &[u8]) -> bool {
    body.windows(LOGIN_WALL_PHRASE.len())
        .any(|w| w.eq_ignore_ascii_case(LOGIN_WALL_PHRASE))
}

fn preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}

#[derive(Clone)]
pub struct Client {
    session: Session,
    base_url: String,
}

impl Client {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the base URL (useful for tests or proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        debug!("Using puzzle base URL {}", self.base_url);
        self
    }

    pub fn input_url(&self, date: &EffectiveDate) -> String {
        self.resource_url(date, INPUT_RESOURCE)
    }

    fn resource_url(&self, date: &EffectiveDate, resource: &str) -> String {
        format!(
            "{}/{}/day/{}/{}",
            self.base_url,
            date.year(),
            date.day(),
            resource
        )
    }

    /// Request the puzzle input for `date` without judging the response.
    pub async fn fetch_input(&self, date: &EffectiveDate) -> Result<FetchResult, AocError> {
        self.get(self.input_url(date)).await
    }

    async fn get(&self, url: String) -> Result<FetchResult, AocError> {
        debug!("GET request to {}", url);
        let response = self
            .session
            .http()
            .get(&url)
            .headers(self.session.headers().clone())
            .send()
            .await?;
        let status = response.status();
        debug!("Received status {}", status);
        let body = response.bytes().await?.to_vec();
        Ok(FetchResult { status, body, url })
    }
}
