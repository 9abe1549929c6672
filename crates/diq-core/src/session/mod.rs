//! Session domain module.
//!
//! # Module Structure
//!
//! - `credential`: The bearer token and its persistence seam
//! - `model`: User profile, session state and the session context

mod credential;
mod model;

pub use credential::{Credential, CredentialStore, InMemoryCredentialStore, TOKEN_STORAGE_KEY};
pub use model::{SessionContext, SessionState, UserProfile};
