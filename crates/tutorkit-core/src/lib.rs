//! tutorkit-core — session engine for the controllable hint-generation system.
//!
//! This crate holds everything with real semantics: question sampling, the
//! quiz session state, the assessment pass, per-question tutoring threads,
//! and the orchestrating state machine. The language model sits behind the
//! `Judge` and `Tutor` capability traits and is treated as an untrusted,
//! flaky collaborator.

pub mod assessment;
pub mod bank;
pub mod counters;
pub mod error;
pub mod logging;
pub mod model;
pub mod orchestrator;
pub mod sampler;
pub mod session;
pub mod thread;
pub mod traits;

pub use error::Error;
