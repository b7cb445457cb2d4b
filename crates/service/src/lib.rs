//! Service facade over the stock reservation and alert engine.
//!
//! This is the boundary external collaborators (HTTP handlers, admin UIs,
//! order takers) call into. It exposes the engine's operations as typed
//! request/response structures, wires recipe edits through the
//! `EditCoordinator`, and emits structured logs. Transport bindings stay
//! out of the workspace.

pub mod edit;
pub mod requests;
pub mod service;

pub use edit::EditCoordinator;
pub use requests::{EditRecipeRequest, RecipeEdited, ReservationAccepted, ReserveRequest};
pub use service::MenuStockService;
