//! Low-stock alerts: derived warnings that remaining stock cannot satisfy a
//! configured minimum number of future portions for a dish.
//!
//! Pure read-side computation: evaluation never fails and never mutates
//! anything; delivering alerts (logging, notifying) is the caller's concern.

pub mod evaluator;

pub use evaluator::{Alert, AlertEvaluator};
