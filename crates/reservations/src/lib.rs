//! Stock reservations: the atomic check-and-reserve operation and the
//! Reserved → Confirmed / Released lifecycle.
//!
//! The `ReservationEngine` is the sole writer of inventory's reserved
//! quantities. A reservation stores a snapshot of the per-ingredient
//! quantities committed at creation time, so later recipe edits can never
//! change what an outstanding reservation holds or returns.

pub mod engine;
pub mod reservation;

pub use engine::ReservationEngine;
pub use reservation::{Reservation, ReservationState};
