pub mod session;

pub use session::{AuthHeaders, Session, SessionResponse};
