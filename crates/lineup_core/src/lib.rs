//! # lineup_core - Orientation-independent Lineup Board
//!
//! Roster state, coordinate transforms and drag reconciliation for a
//! tactical lineup board rendered in portrait or landscape.
//!
//! ## Features
//! - One canonical vertical-pitch frame for every stored position
//! - Exact, tested transforms between the stored frame and the display frame
//! - Gesture-to-mutation reconciliation with substitution swaps
//! - Pluggable persistence with push subscriptions
//! - JSON command API for presentation hosts

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Gesture entry points take pointer, geometry and clock together
#![allow(clippy::too_many_arguments)]
// Drag phases carry the whole gesture inline
#![allow(clippy::large_enum_variant)]

pub mod api;
pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;
pub mod state;

#[cfg(test)]
mod tests;

pub use api::{handle_command_json, ApiError, ApiResponse, BoardCommand};
pub use board::{starting_lineup, Board, Marker};
pub use config::BoardConfig;
pub use engine::{
    CancelReason, DragOutcome, DragSource, DropRequest, DropTarget, FieldRect, LogicalPos, Orientation, PixelDelta,
    PixelPoint, PointerKind, VisualPos,
};
pub use error::{BoardError, Result};
pub use models::{AccessContext, EntryId, EntryPatch, NewEntry, OwnerKey, RawSnapshot, RosterEntry, RosterSnapshot};
pub use save::{FileGateway, MemoryGateway, PersistenceError, PersistenceGateway, Subscription};
pub use state::{ListFilter, RosterStore};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;
