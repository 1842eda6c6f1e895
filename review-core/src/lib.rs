//! Core of the AI code review pipeline.
//!
//! The dispatcher in [`dispatch`] walks ingested files in priority order,
//! fans each one out to the enabled analysis kinds through an
//! [`capability::AnalysisCapability`], reuses prior results via the
//! content-addressed [`cache`], and folds the semi-trusted model responses
//! into the severity buckets of [`types::AggregatedResult`]. The
//! [`report`] module wraps the aggregate into the final report structure.
//!
//! Failure philosophy: partial results beat aborted runs. Unavailable
//! capability, malformed model output, and corrupt cache entries all degrade
//! to empty results; every degraded call is recorded in
//! `AggregatedResult::analysis_errors`. Only local cache write failures
//! propagate as errors.

pub mod cache;
pub mod capability;
pub mod dispatch;
pub mod errors;
pub mod parse;
pub mod prompts;
pub mod report;
pub mod types;

pub use cache::AnalysisCache;
pub use capability::{AnalysisCapability, NullCapability};
pub use dispatch::{CodeAnalyzer, prioritize};
pub use errors::{Error, ReviewResult};
pub use report::{Report, summarize};
pub use types::{AggregatedResult, AnalysisKind};
