//! Board engine: coordinate frames, field geometry, swap search and the
//! drag reconciler.

pub mod coordinates;
pub mod drag;
pub mod field_surface;
pub mod substitution;

pub use coordinates::{
    apply_visual_delta, clamp_percent, round2, to_logical, to_visual, LogicalPos, Orientation, VisualDelta,
    VisualPos, PERCENT_MAX,
};
pub use drag::{
    resolve_drop, CancelReason, DragOutcome, DragPhase, DragReconciler, DragSource, DropRequest, DropTarget,
    PointerKind,
};
pub use field_surface::{FieldRect, PixelDelta, PixelPoint};
pub use substitution::{find_swap_target, SwapTarget, SWAP_RADIUS};
