//! HTTP access to the DecisionIQ backend.
//!
//! [`HttpApiClient`] implements both [`diq_core::api::AuthApi`] and
//! [`diq_core::api::DecisionApi`] over the REST routes:
//!
//! | Method | Path |
//! |---|---|
//! | POST | `/auth/token/` |
//! | POST | `/auth/register/` |
//! | GET | `/me/` |
//! | PATCH | `/me/update/` |
//! | GET, POST | `/decisions/` |
//! | PATCH, DELETE | `/decisions/{id}/` |

pub mod http_api;
mod response;

pub use http_api::HttpApiClient;
