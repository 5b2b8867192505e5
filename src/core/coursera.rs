use crate::core::auth::{Authenticator, LECTURES_PATH};
use crate::core::catalog::{CATALOG_URL, Catalog};
use crate::core::lectures::{ListingKind, fetch_lectures};
use crate::error::CourseraError;
use crate::http::{AuthHeaders, Session};
use crate::model::{Course, Instance, LectureRecord};
use crate::utils::text::join_url;
use std::time::Duration;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// High-level entry point: catalog in, lecture records out.
///
/// Every operation builds its own [`Session`]. Tokens are scoped to one
/// course instance, so nothing here is allowed to share a session across
/// courses.
pub struct Coursera {
    catalog_source: String,
    timeout: Duration,
    authenticator: Authenticator,
}

impl Coursera {
    /// `catalog_source` is the catalog endpoint URL or a local JSON file
    /// path; `timeout` bounds every individual request.
    pub fn new(catalog_source: impl Into<String>, timeout: Duration) -> Self {
        Coursera {
            catalog_source: catalog_source.into(),
            timeout,
            authenticator: Authenticator::new(),
        }
    }

    pub fn with_authenticator(mut self, authenticator: Authenticator) -> Self {
        self.authenticator = authenticator;
        self
    }

    pub async fn load_catalog(&self) -> Result<Catalog, CourseraError> {
        let mut session = Session::new(self.timeout)?;
        Catalog::load(&mut session, &self.catalog_source).await
    }

    /// Fetch the lectures of one resolved course offering.
    ///
    /// The public preview is tried first on an anonymous session. When the
    /// course has no preview, or its preview page won't load, the fetch
    /// falls back to the credentialed path: fresh session, full handshake
    /// against this instance, authenticated listing read. No credentials
    /// at that point means giving up before any login traffic happens.
    pub async fn lectures_for(
        &self,
        course: &Course,
        instance: &Instance,
        credentials: Option<&Credentials>,
    ) -> Result<Vec<LectureRecord>, CourseraError> {
        if let Some(preview) = course.preview_url() {
            let mut session = Session::new(self.timeout)?;
            match fetch_lectures(&mut session, preview, AuthHeaders::None, ListingKind::Preview)
                .await
            {
                Ok(lectures) => return Ok(lectures),
                Err(CourseraError::PreviewUnavailable(reason)) => {
                    log::debug!("no usable preview for {}: {}", course.short_name, reason);
                }
                Err(err) => return Err(err),
            }
        }

        let Some(credentials) = credentials else {
            return Err(CourseraError::CredentialsRequired);
        };

        let mut session = Session::new(self.timeout)?;
        self.authenticator
            .authenticate(
                &mut session,
                &instance.home_link,
                &credentials.username,
                &credentials.password,
            )
            .await?;

        let listing = join_url(&instance.home_link, LECTURES_PATH);
        fetch_lectures(
            &mut session,
            &listing,
            AuthHeaders::Both,
            ListingKind::Authenticated,
        )
        .await
    }
}

impl Default for Coursera {
    fn default() -> Self {
        Self::new(CATALOG_URL, DEFAULT_TIMEOUT)
    }
}
