//! Decision synchronization with the remote API.

mod gateway;
mod in_flight;

pub use gateway::RemoteSyncGateway;
pub use in_flight::{InFlightPermit, InFlightRegistry};
