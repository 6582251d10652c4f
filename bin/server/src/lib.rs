//! HTTP service managing Jenkins credentials on behalf of DevOps projects.
//!
//! Credentials are stored in each project's Jenkins folder. The service
//! checks that the operator (taken from the `X-Token-Username` header) is an
//! owner or maintainer of the project, forwards the operation to Jenkins and
//! keeps a record of who created each credential in PostgreSQL.

pub mod config;
pub mod credentials;
pub mod db;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

#[cfg(test)]
mod testing;

pub use config::ServerConfig;
pub use error::{ApiError, StartupError};
pub use routes::router;
pub use state::AppState;
