//! Jenkins credentials-plugin client for devops-credentials.
//!
//! This crate provides:
//!
//! - **Payloads**: the stapler-class JSON documents Jenkins expects when
//!   creating or updating each supported credential kind
//! - **CredentialApi trait**: folder-scoped credential operations
//! - **JenkinsClient**: the `reqwest` implementation of `CredentialApi`
//! - **Content scraping**: recovery of editable fields from a credential's
//!   configuration page, which the JSON API does not expose

pub mod api;
pub mod client;
pub mod config;
pub mod content;
pub mod error;
pub mod path;
pub mod types;

pub use api::CredentialApi;
pub use client::JenkinsClient;
pub use config::JenkinsConfig;
pub use content::{CredentialContent, scrape_content};
pub use error::JenkinsError;
pub use types::{
    CredentialPayload, CredentialResponse, Fingerprint, FingerprintUsage, UsageRange, UsageRanges,
};
