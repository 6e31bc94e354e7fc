//! adam-core — Data model and client-side logic for facial-aesthetics results.
//!
//! Holds the wire types returned by the scoring service, tier bucketing,
//! comparison ranking, the canned demo payloads, display formatting and the
//! application state machine that guards against stale responses.

pub mod app;
pub mod catalog;
pub mod compare;
pub mod display;
pub mod mock;
pub mod tier;
pub mod types;

pub use app::{App, AppError, AppState, CaptureMode, Outcome, ResultSource, Theme, Ticket};
pub use compare::RankedModel;
pub use tier::Tier;
pub use types::{AnalysisResult, CompareResult, Measurements, ModelResult, RadarData};
