//! adam-client — Talks to the Project Adam scoring API.
//!
//! [`ScoringService`] is the seam between the application and the service;
//! [`HttpScoringClient`] implements it over reqwest. The `*_or_mock` helpers
//! apply the fallback policy: any failure is logged and replaced by canned
//! data tagged [`ResultSource::Fallback`](adam_core::ResultSource).

pub mod client;
pub mod error;
pub mod fallback;
pub mod wire;

pub use client::{HttpScoringClient, ScoringService, DEFAULT_API_URL};
pub use error::ClientError;
pub use fallback::{analyze_or_mock, compare_or_mock, models_or_builtin, quick_or_mock};
pub use wire::{AnalysisResponse, CompareResponse, HealthStatus};
