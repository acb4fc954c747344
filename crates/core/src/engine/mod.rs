//! Conversion engine abstraction.
//!
//! The actual NLP analysis and TTS synthesis live behind the
//! [`ConversionEngine`] trait so the real pipeline can be substituted
//! without touching the job state machine. The shipped
//! [`SimulatedEngine`] advances through the same phases on a timer.

mod error;
mod simulated;
mod traits;
mod types;

pub use error::EngineError;
pub use simulated::SimulatedEngine;
pub use traits::{CancelCheck, ConversionEngine};
pub use types::{ConversionProgress, ConversionRequest};
