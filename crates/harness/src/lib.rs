//! Survey Backoffice API Test Harness
//!
//! This crate provides the stateful client façade that test suites use to
//! drive the survey backoffice HTTP API:
//! - Session and bearer-token lifecycle (login, two-step construction)
//! - One method per backoffice operation (companies, employees, surveys,
//!   questions, assignments, survey taking, export jobs, reporting)
//! - A per-instance registry of created identifiers for deterministic cleanup
//! - Synthetic fixture generation for bulk operations
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ApiHarness                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Session (immutable)     base_url, token?, timeout          │
//! │  reqwest::Client         bearer injection, status mapping   │
//! │  TestDataRegistry        company / survey / employee / job  │
//! │  Fixtures                seeded per instance                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  resources::company      CRUD, bulk, suspend/activate       │
//! │  resources::employee     CRUD nested under company, bulk    │
//! │  resources::survey       CRUD, lifecycle, questions,        │
//! │                          assignments, submissions           │
//! │  resources::export       export jobs, statistics, reports   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The harness never retries, never polls and never reinterprets a failure:
//! every non-2xx response comes back as [`HarnessError::Status`] with the
//! original status and body.

pub mod client;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod registry;
pub mod resources;
pub mod session;
pub mod types;

pub use client::{ApiConfig, ApiHarness, HarnessOptions};
pub use config::EnvConfig;
pub use error::{ErrorBody, ErrorKind, HarnessError, HarnessResult};
pub use registry::{ResourceKind, TestData, TestDataRegistry};
pub use resources::{CleanupFailure, CleanupReport};
pub use session::{Session, SessionState};
pub use types::*;

pub use reqwest::{Method, StatusCode};
