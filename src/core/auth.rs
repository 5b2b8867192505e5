use crate::error::CourseraError;
use crate::http::{AuthHeaders, Session};
use crate::utils::text::join_url;
use reqwest::Method;

/// Account-level login endpoint. Step 2 of the handshake posts here; the
/// course-scoped session is only minted afterwards by the redirector.
const LOGIN_URL: &str = "https://www.coursera.org/maestro/api/user/login";

/// Login redirector on the class site. Hitting it with an authenticated
/// account pairs a fresh session cookie with the csrf token captured in
/// step 1, scoping the login to this course instance.
const AUTH_REDIRECTOR_PATH: &str =
    "/auth/auth_redirector?type=login&subtype=normal&email=&visiting=&minimal=true";

/// Lecture index on the class site. Protected, which is exactly why the
/// seed step touches it: the platform answers with the initial csrf cookie.
pub const LECTURES_PATH: &str = "/lecture/index";

/// Replays the browser login flow against one course instance.
///
/// The handshake is linear and terminal on first failure. Tokens from a
/// partially completed handshake are not safe to reuse, so a retry needs a
/// fresh [`Session`]; this type never retries on its own.
pub struct Authenticator {
    login_url: String,
}

impl Authenticator {
    pub fn new() -> Self {
        Self::with_login_url(LOGIN_URL)
    }

    pub fn with_login_url(login_url: impl Into<String>) -> Self {
        Authenticator {
            login_url: login_url.into(),
        }
    }

    /// Seed -> submit -> bind. On success the session carries both the
    /// csrf and the session token and is good for one authenticated read
    /// of the lecture listing.
    pub async fn authenticate(
        &self,
        session: &mut Session,
        home_link: &str,
        username: &str,
        password: &str,
    ) -> Result<(), CourseraError> {
        // Seed: an anonymous touch of the protected listing makes the
        // platform set the initial csrf cookie. The body is discarded.
        let listing = join_url(home_link, LECTURES_PATH);
        let seed = session
            .get(&listing, AuthHeaders::None)
            .await
            .map_err(|err| step_failed("seed", err.to_string()))?;
        if !seed.status.is_success() {
            return Err(step_failed("seed", format!("HTTP {}", seed.status)));
        }
        if session.csrf_token().is_none() {
            return Err(step_failed("seed", "no csrf cookie issued".to_string()));
        }

        // Submit: authenticate the account, mirroring the captured csrf
        // token the way the signin form would.
        let form = [("email_address", username), ("password", password)];
        let submit = session
            .read(&self.login_url, Some(&form), Method::POST, AuthHeaders::Csrf)
            .await
            .map_err(|err| step_failed("submit", err.to_string()))?;
        if !submit.status.is_success() {
            return Err(step_failed("submit", format!("HTTP {}", submit.status)));
        }

        // Bind: the redirector mints the session cookie paired with the
        // seed's csrf token, scoping the login to this instance.
        let redirector = join_url(home_link, AUTH_REDIRECTOR_PATH);
        let bind = session
            .get(&redirector, AuthHeaders::None)
            .await
            .map_err(|err| step_failed("bind", err.to_string()))?;
        if !bind.status.is_success() {
            return Err(step_failed("bind", format!("HTTP {}", bind.status)));
        }
        if session.session_token().is_none() {
            return Err(step_failed("bind", "no session cookie issued".to_string()));
        }

        log::debug!("login bound to {} (landed on {})", home_link, bind.final_url);
        Ok(())
    }
}

impl Default for Authenticator {
    fn default() -> Self {
        Self::new()
    }
}

fn step_failed(step: &'static str, reason: String) -> CourseraError {
    CourseraError::AuthHandshakeFailed { step, reason }
}
