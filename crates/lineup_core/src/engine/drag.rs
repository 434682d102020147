//! Drag reconciliation
//!
//! Turns one pointer gesture into at most one roster mutation.
//!
//! ## Gesture lifecycle
//! `Idle → Pending → Dragging → (commit | cancel) → Idle`
//!
//! - `Pending`: pointer is down but the gesture is not recognized yet
//!   (mouse must travel, touch must hold still)
//! - `Dragging`: recognized; exclusive until committed or cancelled
//!
//! ## Commit
//! [`resolve_drop`] is the pure part: it reads the roster, never writes it,
//! and returns a [`DragOutcome`]. [`DragReconciler::commit`] hands that to the
//! store. Every failure ends as `DragOutcome::Cancelled` with the roster
//! unchanged.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::BoardConfig;
use crate::engine::coordinates::{apply_visual_delta, to_logical, LogicalPos, Orientation};
use crate::engine::field_surface::{FieldRect, PixelDelta, PixelPoint};
use crate::engine::substitution::{find_swap_target, SWAP_RADIUS};
use crate::error::{BoardError, Result};
use crate::models::roster::{EntryId, RosterEntry};
use crate::state::RosterStore;

/// Where the dragged marker came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum DragSource {
    /// A marker already on the field; moves by the pointer delta.
    FieldEntry(EntryId),
    /// A row from one of the roster lists; lands where the pointer is.
    Bench(EntryId),
}

impl DragSource {
    /// Decode a draggable id as rendered by the lists (`side-conf-<id>`,
    /// `side-all-<id>`, `side-<id>`) or the field (`<id>`).
    pub fn from_draggable_id(raw: &str) -> Self {
        for prefix in ["side-conf-", "side-all-", "side-"] {
            if let Some(id) = raw.strip_prefix(prefix) {
                return DragSource::Bench(EntryId::new(id));
            }
        }
        DragSource::FieldEntry(EntryId::new(raw))
    }

    pub fn id(&self) -> &EntryId {
        match self {
            DragSource::FieldEntry(id) | DragSource::Bench(id) => id,
        }
    }

    pub fn is_bench(&self) -> bool {
        matches!(self, DragSource::Bench(_))
    }
}

/// What the pointer was released over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTarget {
    Field,
    Elsewhere,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Touch,
}

/// Everything needed to resolve a released gesture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropRequest {
    pub source: DragSource,
    pub target: DropTarget,
    /// Field rectangle at release time; `None` when the host could not measure it.
    pub field: Option<FieldRect>,
    /// Pointer position when the gesture started.
    pub origin: PixelPoint,
    /// Cumulative pointer travel since `origin`.
    pub delta: PixelDelta,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    ReadOnly,
    DroppedOutsideField,
    MissingFieldSurface,
    Locked,
    UnknownEntry,
    InvalidComputation { x: f64, y: f64 },
    /// Released before the gesture was recognized (a tap).
    NotActivated,
    /// Touch drifted too far during the hold (a scroll).
    Aborted,
    /// An external roster replacement arrived mid-gesture.
    Superseded,
}

impl CancelReason {
    /// Error-taxonomy view for hosts that report cancellations.
    pub fn to_error(&self, source: &DragSource) -> Option<BoardError> {
        match self {
            CancelReason::ReadOnly => Some(BoardError::PermissionDenied("drag on a read-only roster".to_string())),
            CancelReason::Locked => Some(BoardError::PermissionDenied(format!("{} is locked", source.id()))),
            CancelReason::MissingFieldSurface => Some(BoardError::MissingFieldSurface),
            CancelReason::UnknownEntry => Some(BoardError::NotFound(source.id().to_string())),
            CancelReason::InvalidComputation { x, y } => Some(BoardError::InvalidComputation { x: *x, y: *y }),
            _ => None,
        }
    }
}

/// Result of resolving a drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum DragOutcome {
    /// Field entry moved; flags unchanged.
    Relocated { id: EntryId, to: LogicalPos },
    /// Bench entry placed on an empty spot, now on field and confirmed.
    Placed { id: EntryId, to: LogicalPos },
    /// Bench entry took `outgoing`'s slot; `outgoing` is back on the bench.
    Swapped { incoming: EntryId, outgoing: EntryId, to: LogicalPos },
    Cancelled(CancelReason),
}

impl DragOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DragOutcome::Cancelled(_))
    }

    pub fn is_committed(&self) -> bool {
        !self.is_cancelled()
    }
}

/// Resolve a released gesture against the current roster.
pub fn resolve_drop(
    entries: &[RosterEntry],
    request: &DropRequest,
    orientation: Orientation,
    swap_radius: f64,
) -> DragOutcome {
    let source = &request.source;

    if source.is_bench() && request.target != DropTarget::Field {
        return DragOutcome::Cancelled(CancelReason::DroppedOutsideField);
    }
    let Some(rect) = request.field else {
        return DragOutcome::Cancelled(CancelReason::MissingFieldSurface);
    };

    let Some(entry) = entries.iter().find(|e| &e.id == source.id()) else {
        return DragOutcome::Cancelled(CancelReason::UnknownEntry);
    };
    // A field marker must still be on the field; a stale id never moves bench coordinates.
    if !source.is_bench() && !entry.is_on_field {
        return DragOutcome::Cancelled(CancelReason::UnknownEntry);
    }
    if entry.is_locked {
        return DragOutcome::Cancelled(CancelReason::Locked);
    }

    let candidate = match source {
        DragSource::Bench(_) => {
            let pointer = request.origin.offset(request.delta);
            to_logical(rect.to_visual_percent(pointer), orientation)
        }
        DragSource::FieldEntry(_) => {
            let delta = rect.delta_to_visual_percent(request.delta);
            apply_visual_delta(entry.logical_pos(), delta, orientation)
        }
    };

    if !candidate.is_finite() {
        return DragOutcome::Cancelled(CancelReason::InvalidComputation { x: candidate.x, y: candidate.y });
    }
    let target = candidate.settled();

    match source {
        DragSource::Bench(id) => match find_swap_target(entries, id, target, swap_radius) {
            Some(occupant) => {
                DragOutcome::Swapped { incoming: id.clone(), outgoing: occupant.id, to: occupant.slot }
            }
            None => DragOutcome::Placed { id: id.clone(), to: target },
        },
        DragSource::FieldEntry(id) => DragOutcome::Relocated { id: id.clone(), to: target },
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gesture {
    pub source: DragSource,
    pub pointer: PointerKind,
    pub origin: PixelPoint,
    pub started_ms: u64,
    pub delta: PixelDelta,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Pending(Gesture),
    Dragging(Gesture),
}

/// Single-gesture state machine plus commit logic.
#[derive(Debug, Clone)]
pub struct DragReconciler {
    phase: DragPhase,
    swap_radius: f64,
    mouse_activation_px: f64,
    touch_hold_ms: u64,
    touch_tolerance_px: f64,
}

impl Default for DragReconciler {
    fn default() -> Self {
        Self::new(&BoardConfig::default())
    }
}

impl DragReconciler {
    pub fn new(config: &BoardConfig) -> Self {
        Self {
            phase: DragPhase::Idle,
            swap_radius: if config.swap_radius.is_finite() { config.swap_radius } else { SWAP_RADIUS },
            mouse_activation_px: config.mouse_activation_px,
            touch_hold_ms: config.touch_hold_ms,
            touch_tolerance_px: config.touch_tolerance_px,
        }
    }

    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.phase, DragPhase::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, DragPhase::Dragging(_))
    }

    pub fn active_source(&self) -> Option<&DragSource> {
        match &self.phase {
            DragPhase::Idle => None,
            DragPhase::Pending(g) | DragPhase::Dragging(g) => Some(&g.source),
        }
    }

    /// Pointer down on a draggable marker.
    pub fn begin(&mut self, source: DragSource, pointer: PointerKind, origin: PixelPoint, now_ms: u64) -> Result<()> {
        if !self.is_idle() {
            return Err(BoardError::GestureInProgress);
        }

        let gesture = Gesture { source, pointer, origin, started_ms: now_ms, delta: PixelDelta::default() };
        debug!(source = ?gesture.source, ?pointer, "gesture pending");
        self.phase = DragPhase::Pending(gesture);
        // Zero thresholds recognize immediately.
        self.advance(PixelDelta::default(), now_ms);
        Ok(())
    }

    /// Pointer moved; `delta` is cumulative since `begin`.
    pub fn update(&mut self, delta: PixelDelta, now_ms: u64) -> &DragPhase {
        self.advance(delta, now_ms);
        &self.phase
    }

    /// Time passed without movement (touch hold).
    pub fn hold(&mut self, now_ms: u64) -> &DragPhase {
        let delta = match &self.phase {
            DragPhase::Pending(g) | DragPhase::Dragging(g) => g.delta,
            DragPhase::Idle => return &self.phase,
        };
        self.advance(delta, now_ms);
        &self.phase
    }

    fn advance(&mut self, delta: PixelDelta, now_ms: u64) {
        let phase = std::mem::take(&mut self.phase);
        self.phase = match phase {
            DragPhase::Idle => DragPhase::Idle,
            DragPhase::Dragging(mut g) => {
                g.delta = delta;
                DragPhase::Dragging(g)
            }
            DragPhase::Pending(mut g) => {
                g.delta = delta;
                match g.pointer {
                    PointerKind::Mouse if delta.length() >= self.mouse_activation_px => {
                        debug!(source = ?g.source, "mouse drag recognized");
                        DragPhase::Dragging(g)
                    }
                    PointerKind::Mouse => DragPhase::Pending(g),
                    // Once the hold has elapsed, movement no longer counts as drift.
                    PointerKind::Touch if now_ms.saturating_sub(g.started_ms) >= self.touch_hold_ms => {
                        debug!(source = ?g.source, "touch drag recognized");
                        DragPhase::Dragging(g)
                    }
                    PointerKind::Touch if delta.length() > self.touch_tolerance_px => {
                        debug!(source = ?g.source, "touch drifted before hold, gesture aborted");
                        DragPhase::Idle
                    }
                    PointerKind::Touch => DragPhase::Pending(g),
                }
            }
        };
    }

    /// Abandon the in-flight gesture, if any.
    pub fn cancel(&mut self, reason: CancelReason) -> Option<DragOutcome> {
        match std::mem::take(&mut self.phase) {
            DragPhase::Idle => None,
            DragPhase::Pending(g) | DragPhase::Dragging(g) => {
                debug!(source = ?g.source, ?reason, "gesture cancelled");
                Some(DragOutcome::Cancelled(reason))
            }
        }
    }

    /// Pointer released. Resolves and commits when the gesture was recognized.
    pub fn finish(
        &mut self,
        store: &mut RosterStore,
        target: DropTarget,
        field: Option<FieldRect>,
        delta: PixelDelta,
        now_ms: u64,
        orientation: Orientation,
    ) -> Result<DragOutcome> {
        if self.is_idle() {
            return Err(BoardError::NoActiveGesture);
        }
        self.advance(delta, now_ms);

        let gesture = match std::mem::take(&mut self.phase) {
            DragPhase::Idle => return Ok(DragOutcome::Cancelled(CancelReason::Aborted)),
            DragPhase::Pending(_) => return Ok(DragOutcome::Cancelled(CancelReason::NotActivated)),
            DragPhase::Dragging(g) => g,
        };

        let request =
            DropRequest { source: gesture.source, target, field, origin: gesture.origin, delta: gesture.delta };
        Ok(self.commit(store, &request, orientation))
    }

    /// Resolve `request` and apply it to `store`. Usable without the gesture
    /// state machine by hosts that recognize gestures themselves.
    pub fn commit(&self, store: &mut RosterStore, request: &DropRequest, orientation: Orientation) -> DragOutcome {
        if store.is_read_only() {
            debug!("drag rejected: roster is read-only");
            return DragOutcome::Cancelled(CancelReason::ReadOnly);
        }

        let outcome = resolve_drop(store.entries(), request, orientation, self.swap_radius);
        if let DragOutcome::Cancelled(reason) = &outcome {
            debug!(source = ?request.source, ?reason, "drop cancelled");
            return outcome;
        }

        match store.apply_drag(&outcome) {
            Ok(()) => {
                info!(?outcome, "drop committed");
                outcome
            }
            Err(err) => {
                warn!(%err, "drop resolved but could not be applied");
                let reason = if err.is_permission() { CancelReason::Locked } else { CancelReason::UnknownEntry };
                DragOutcome::Cancelled(reason)
            }
        }
    }
}
