use crate::credentials::{Credentials, Identity};
use crate::error::AocError;
use log::info;
use reqwest::Client as HttpClient;
use reqwest::header::{COOKIE, FROM, HeaderMap, HeaderValue, USER_AGENT};

const COOKIE_NAME: &str = "session";

/// HTTP client bound to a puzzle session cookie.
///
/// Building a session does no network I/O.
#[derive(Debug, Clone)]
pub struct Session {
    http: HttpClient,
    headers: HeaderMap,
}

impl Session {
    /// Build a client that identifies the caller through default headers.
    pub fn new(credentials: &Credentials, identity: &Identity) -> Result<Self, AocError> {
        let headers = identification_headers(credentials, identity)?;
        let http = HttpClient::builder().build()?;
        info!("Initialized session for user {}", credentials.user_id());
        Self::with_client(http, headers, credentials)
    }

    /// Wrap a caller-configured client.
    ///
    /// `headers` go out with every request unchanged, except that the
    /// `session` cookie is merged into their `Cookie` value.
    pub fn with_client(
        http: HttpClient,
        mut headers: HeaderMap,
        credentials: &Credentials,
    ) -> Result<Self, AocError> {
        let cookie = merge_session_cookie(&headers, credentials.session_token())?;
        headers.insert(COOKIE, cookie);
        Ok(Self { http, headers })
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http
    }

    pub(crate) fn headers(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Join the caller's cookies with `session=<token>`, replacing any earlier session pair.
fn merge_session_cookie(headers: &HeaderMap, token: &str) -> Result<HeaderValue, AocError> {
    let mut pairs = Vec::new();
    for value in headers.get_all(COOKIE) {
        let value = value
            .to_str()
            .map_err(|_| AocError::InvalidParameter("caller cookie is not valid ASCII"))?;
        pairs.extend(
            value
                .split(';')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .filter(|p| p.split('=').next().map(str::trim) != Some(COOKIE_NAME))
                .map(str::to_string),
        );
    }
    pairs.push(format!("{}={}", COOKIE_NAME, token));

    let mut cookie = HeaderValue::from_str(&pairs.join("; "))
        .map_err(|_| AocError::InvalidParameter("session cookie contains invalid characters"))?;
    cookie.set_sensitive(true);
    Ok(cookie)
}

fn default_user_agent(user_id: &str) -> String {
    format!(
        "{}/{} (user {})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        user_id
    )
}

/// Headers sent with every request made through [`Session::new`].
pub fn identification_headers(
    credentials: &Credentials,
    identity: &Identity,
) -> Result<HeaderMap, AocError> {
    let user_agent = identity
        .user_agent
        .clone()
        .unwrap_or_else(|| default_user_agent(credentials.user_id()));

    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&user_agent)
            .map_err(|_| AocError::InvalidParameter("user agent is not a valid header value"))?,
    );
    if let Some(email) = &identity.email {
        headers.insert(
            FROM,
            HeaderValue::from_str(email).map_err(|_| {
                AocError::InvalidParameter("contact email is not a valid header value")
            })?,
        );
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("abc123", "1234")
    }

    fn with_cookie(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn user_agent_defaults_to_crate_and_user() {
        let headers = identification_headers(&creds(), &Identity::default()).unwrap();
        let ua = headers[USER_AGENT].to_str().unwrap();
        assert!(ua.starts_with("aocfetch/"));
        assert!(ua.ends_with("(user 1234)"));
        assert!(headers.get(FROM).is_none());
    }

    #[test]
    fn identity_overrides_are_used_verbatim() {
        let identity = Identity {
            user_agent: Some("github.com/me/aoc".into()),
            email: Some("me@example.com".into()),
        };
        let headers = identification_headers(&creds(), &identity).unwrap();
        assert_eq!(headers[USER_AGENT], "github.com/me/aoc");
        assert_eq!(headers[FROM], "me@example.com");
    }

    #[test]
    fn rejects_header_injection_in_email() {
        let identity = Identity {
            user_agent: None,
            email: Some("me@example.com\r\nX-Evil: 1".into()),
        };
        let err = identification_headers(&creds(), &identity).unwrap_err();
        assert!(matches!(err, AocError::InvalidParameter(_)));
    }

    #[test]
    fn cookie_alone_when_caller_sets_none() {
        let session = Session::with_client(HttpClient::new(), HeaderMap::new(), &creds()).unwrap();
        assert_eq!(session.headers()[COOKIE], "session=abc123");
        assert!(session.headers()[COOKIE].is_sensitive());
    }

    #[test]
    fn caller_cookies_are_kept_next_to_the_session() {
        let mut headers = with_cookie("consent=yes; theme=dark");
        headers.insert(USER_AGENT, HeaderValue::from_static("custom-agent/1.0"));
        let session = Session::with_client(HttpClient::new(), headers, &creds()).unwrap();

        assert_eq!(
            session.headers()[COOKIE],
            "consent=yes; theme=dark; session=abc123"
        );
        assert_eq!(session.headers()[USER_AGENT], "custom-agent/1.0");
    }

    #[test]
    fn stale_session_pair_is_replaced() {
        let headers = with_cookie("session=old; sessionid=keep");
        let cookie = merge_session_cookie(&headers, "abc123").unwrap();
        assert_eq!(cookie, "sessionid=keep; session=abc123");
    }
}
