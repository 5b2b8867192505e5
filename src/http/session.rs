use crate::error::CourseraError;
use reqwest::header::{self, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Method, StatusCode};
use cookie_store::CookieStore;
use reqwest_cookie_store::CookieStoreMutex;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/135.0.0.0 Safari/537.36";

/// Referer sent alongside CSRF headers; the login endpoint rejects posts
/// that don't look like they came from the signin page.
const CSRF_REFERER: &str = "https://www.coursera.org";

/// Which credential headers to attach to a request.
///
/// `Csrf` mirrors the captured token the way the signin form does
/// (`csrftoken` cookie + `X-CSRFToken`); `Both` replays the
/// `csrf_token`/`session` pair the class site expects. The two spellings
/// differ on purpose, that is what the platform sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthHeaders {
    None,
    Csrf,
    Both,
}

/// What a request landed on: status, headers, the URL after redirects, and
/// the body. Small on purpose so callers never touch the HTTP client
/// directly.
#[derive(Debug)]
pub struct SessionResponse {
    pub status: StatusCode,
    pub final_url: Url,
    pub headers: HeaderMap,
    pub body: String,
}

impl SessionResponse {
    pub fn content_length(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
    }
}

/// One browsing sequence against the platform: a cookie jar shared across
/// requests, plus the CSRF and session tokens harvested from it.
///
/// A session lives for one login attempt or one anonymous walk and is never
/// persisted. Tokens are scoped to a single course instance, so every
/// course operation gets a fresh session.
pub struct Session {
    client: Client,
    cookies: Arc<CookieStoreMutex>,
    csrf_token: Option<String>,
    session_token: Option<String>,
}

impl Session {
    pub fn new(timeout: Duration) -> Result<Self, CourseraError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));

        let cookies = Arc::new(CookieStoreMutex::new(CookieStore::default()));
        let client = Client::builder()
            .default_headers(headers)
            .cookie_provider(Arc::clone(&cookies))
            .timeout(timeout)
            .build()?;

        Ok(Session {
            client,
            cookies,
            csrf_token: None,
            session_token: None,
        })
    }

    /// Perform one request. `data` is form-encoded into the body for POST
    /// and appended to the query string otherwise. Requested auth headers
    /// are silently omitted while the matching tokens are still missing;
    /// callers only ask for them once the handshake has produced the
    /// tokens.
    pub async fn read(
        &mut self,
        url: &str,
        data: Option<&[(&str, &str)]>,
        method: Method,
        auth: AuthHeaders,
    ) -> Result<SessionResponse, CourseraError> {
        log::debug!("{} {}", method, url);

        let mut request = self.client.request(method.clone(), url);
        if let Some(fields) = data {
            request = if method == Method::POST {
                request.form(fields)
            } else {
                request.query(fields)
            };
        }

        match auth {
            AuthHeaders::None => {}
            AuthHeaders::Csrf => {
                if let Some(csrf) = self.csrf_token.as_deref() {
                    request = request
                        .header(header::COOKIE, format!("csrftoken={}", csrf))
                        .header(header::REFERER, CSRF_REFERER)
                        .header("X-CSRFToken", csrf);
                }
            }
            AuthHeaders::Both => {
                if let (Some(csrf), Some(session)) =
                    (self.csrf_token.as_deref(), self.session_token.as_deref())
                {
                    request = request.header(
                        header::COOKIE,
                        format!("csrf_token={};session={}", csrf, session),
                    );
                }
            }
        }

        let response = request.send().await?;
        let status = response.status();
        let final_url = response.url().clone();
        let headers = response.headers().clone();
        let body = response.text().await?;

        self.harvest_tokens();

        Ok(SessionResponse {
            status,
            final_url,
            headers,
            body,
        })
    }

    pub async fn get(
        &mut self,
        url: &str,
        auth: AuthHeaders,
    ) -> Result<SessionResponse, CourseraError> {
        self.read(url, None, Method::GET, auth).await
    }

    pub async fn head(&mut self, url: &str) -> Result<SessionResponse, CourseraError> {
        self.read(url, None, Method::HEAD, AuthHeaders::None).await
    }

    /// Pull the csrf and session tokens out of whatever cookies the jar
    /// accumulated. First value seen per name wins for the lifetime of the
    /// session: the platform re-issues the csrf cookie on every request
    /// but expects the original pairing back.
    fn harvest_tokens(&mut self) {
        let cookies = Arc::clone(&self.cookies);
        let store = cookies.lock().unwrap();
        for cookie in store.iter_unexpired() {
            match cookie.name() {
                "csrf_token" | "csrftoken" => {
                    keep_first(&mut self.csrf_token, "csrf", cookie.value());
                }
                "session" => {
                    keep_first(&mut self.session_token, "session", cookie.value());
                }
                _ => {}
            }
        }
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn session_token(&self) -> Option<&str> {
        self.session_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.csrf_token.is_some() && self.session_token.is_some()
    }
}

fn keep_first(slot: &mut Option<String>, name: &str, value: &str) {
    if let Some(existing) = slot.as_deref() {
        if existing != value {
            log::debug!("ignoring re-issued {} cookie", name);
        }
        return;
    }
    log::debug!("captured {} token from cookie jar", name);
    *slot = Some(value.to_string());
}
