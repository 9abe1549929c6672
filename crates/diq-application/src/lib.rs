//! Application layer of the DecisionIQ client.
//!
//! - [`SessionManager`]: login, registration, logout and the user profile
//! - [`RemoteSyncGateway`]: decision operations against the server and the
//!   local [`DecisionStore`](diq_core::decision::DecisionStore)
//! - [`SessionStoreCoordinator`]: reloads or clears the store when the
//!   credential changes

pub mod coordinator;
pub mod session;
pub mod sync;

pub use coordinator::{LoadReport, SessionStoreCoordinator};
pub use session::SessionManager;
pub use sync::{InFlightPermit, InFlightRegistry, RemoteSyncGateway};
