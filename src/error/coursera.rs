use thiserror::Error;

/// Everything that can go wrong while turning a course identifier into a
/// list of lectures. Callers match on the variant to pick a user-facing
/// message.
#[derive(Debug, Error)]
pub enum CourseraError {
    #[error("can't find course {0:?}")]
    CourseNotFound(String),

    #[error("too many matches for {0:?}")]
    AmbiguousCourse(String),

    #[error("course {0:?} has no instances")]
    NoInstance(String),

    /// The course has no usable public preview. Not fatal on its own; the
    /// caller falls back to a credentialed fetch.
    #[error("no preview: {0}")]
    PreviewUnavailable(String),

    #[error("course has no public preview; username and password required")]
    CredentialsRequired,

    #[error("login handshake failed at {step}: {reason}")]
    AuthHandshakeFailed { step: &'static str, reason: String },

    #[error("lecture listing failed: {0}")]
    ListingFailed(String),

    /// A lecture page came back without a video source. Fatal for that one
    /// lecture only.
    #[error("lecture {0:?} has no video source")]
    LectureParseIncomplete(String),

    #[error("course catalog unusable: {0}")]
    Catalog(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
