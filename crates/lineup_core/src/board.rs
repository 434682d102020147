//! Lineup board facade
//!
//! Composes the roster store, the drag reconciler and the display state
//! (orientation, team colors) behind one handle for a presentation host.
//!
//! ```rust
//! use lineup_core::board::Board;
//! use lineup_core::config::BoardConfig;
//! use lineup_core::models::NewEntry;
//!
//! let mut board = Board::new(BoardConfig::default(), false);
//! let id = board.add(NewEntry::default()).unwrap();
//! assert!(!board.store().get(&id).unwrap().is_on_field);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::BoardConfig;
use crate::engine::coordinates::{to_visual, Orientation, VisualPos};
use crate::engine::drag::{
    CancelReason, DragOutcome, DragPhase, DragReconciler, DragSource, DropRequest, DropTarget, PointerKind,
};
use crate::engine::field_surface::{FieldRect, PixelDelta, PixelPoint};
use crate::error::{BoardError, Result};
use crate::models::access::{AccessContext, OwnerKey};
use crate::models::roster::{
    AmbientConfig, EntryId, EntryPatch, NewEntry, RawEntry, RawSnapshot, RosterEntry, RosterSnapshot,
};
use crate::save::gateway::{PersistenceGateway, Subscription};
use crate::save::sanitize::{looks_like_keeper, sanitize_ambient};
use crate::state::RosterStore;

/// Shirt colors offered by the team-color pickers (label, color reference).
pub const TEAM_PALETTE: [(&str, &str); 10] = [
    ("Azul", "bg-blue-600"),
    ("Rojo", "bg-red-600"),
    ("Verde", "bg-emerald-600"),
    ("Amarillo", "bg-yellow-500"),
    ("Naranja", "bg-orange-500"),
    ("Morado", "bg-purple-600"),
    ("Rosa", "bg-pink-500"),
    ("Celeste", "bg-sky-400"),
    ("Blanco", "bg-slate-100"),
    ("Negro", "bg-slate-800"),
];

/// Seven-a-side lineup a fresh board starts from when the owner has no
/// stored roster yet.
pub fn starting_lineup() -> RawSnapshot {
    let seed: [(&str, u8, &str, f64, f64, &str, &str); 7] = [
        ("p1", 1, "GK", 50.0, 90.0, "bg-yellow-500", "ARQ"),
        ("p2", 2, "DEF", 20.0, 70.0, "bg-blue-600", "DEF"),
        ("p3", 3, "DEF", 50.0, 70.0, "bg-blue-600", "DEF"),
        ("p4", 4, "DEF", 80.0, 70.0, "bg-blue-600", "DEF"),
        ("p5", 5, "MID", 35.0, 50.0, "bg-emerald-600", "MED"),
        ("p6", 6, "MID", 65.0, 50.0, "bg-emerald-600", "MED"),
        ("p7", 7, "FWD", 50.0, 20.0, "bg-red-600", "DEL"),
    ];
    let players = seed
        .iter()
        .map(|(id, number, name, x, y, color, role)| RawEntry {
            id: Some(id.to_string()),
            name: Some(name.to_string()),
            number: Some(*number),
            position_type: Some(role.to_string()),
            x: Some(*x),
            y: Some(*y),
            on_field: Some(true),
            locked: Some(false),
            color: Some(color.to_string()),
            ..Default::default()
        })
        .collect();
    RawSnapshot { players, team_color: None, keeper_color: None }
}

/// An on-field marker in the active display frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: EntryId,
    pub name: String,
    pub number: u8,
    pub badge: String,
    pub visual: VisualPos,
    pub color: String,
    pub locked: bool,
}

#[derive(Debug, Clone)]
pub struct Board {
    store: RosterStore,
    drag: DragReconciler,
    orientation: Orientation,
    ambient: AmbientConfig,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BoardConfig::default(), false)
    }
}

impl Board {
    pub fn new(config: BoardConfig, read_only: bool) -> Self {
        let ambient = AmbientConfig { team_color: config.team_color.clone(), keeper_color: config.keeper_color.clone() };
        Self {
            drag: DragReconciler::new(&config),
            store: RosterStore::new(config, read_only),
            orientation: Orientation::default(),
            ambient,
        }
    }

    /// Board for whoever `access` describes; read-only when viewing a shared roster.
    pub fn for_access(config: BoardConfig, access: &AccessContext) -> Self {
        Self::new(config, access.is_read_only())
    }

    pub fn from_snapshot(raw: RawSnapshot, config: BoardConfig, read_only: bool) -> Self {
        let mut board = Self::new(config, read_only);
        board.apply_remote(raw);
        board
    }

    pub fn store(&self) -> &RosterStore {
        &self.store
    }

    pub fn config(&self) -> &BoardConfig {
        self.store.config()
    }

    pub fn is_read_only(&self) -> bool {
        self.store.is_read_only()
    }

    /// Switching ownership abandons any gesture in flight.
    pub fn set_read_only(&mut self, read_only: bool) {
        if read_only != self.store.is_read_only() {
            self.drag.cancel(CancelReason::ReadOnly);
            self.store.set_read_only(read_only);
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if orientation != self.orientation {
            debug!(?orientation, "orientation changed");
            self.orientation = orientation;
        }
    }

    pub fn ambient(&self) -> &AmbientConfig {
        &self.ambient
    }

    pub fn set_team_color(&mut self, color: &str) -> Result<()> {
        self.ambient.team_color = self.checked_color(color)?;
        Ok(())
    }

    pub fn set_keeper_color(&mut self, color: &str) -> Result<()> {
        self.ambient.keeper_color = self.checked_color(color)?;
        Ok(())
    }

    fn checked_color(&self, color: &str) -> Result<String> {
        if self.is_read_only() {
            return Err(BoardError::PermissionDenied("color change on a read-only roster".to_string()));
        }
        let color = color.trim();
        if color.is_empty() {
            return Err(BoardError::InvalidConfig("color reference is empty".to_string()));
        }
        Ok(color.to_string())
    }

    /// Shirt color for `entry`: keepers (by role or by name) wear the keeper color.
    pub fn color_for(&self, entry: &RosterEntry) -> &str {
        if entry.role.is_goalkeeper() || looks_like_keeper(&entry.display_name) {
            &self.ambient.keeper_color
        } else {
            &self.ambient.team_color
        }
    }

    // ========================
    // Roster mutations
    // ========================

    pub fn add(&mut self, new: NewEntry) -> Result<EntryId> {
        self.store.add(new)
    }

    pub fn update(&mut self, id: &EntryId, patch: &EntryPatch) -> Result<()> {
        self.store.update(id, patch)
    }

    pub fn remove(&mut self, id: &EntryId) -> Result<RosterEntry> {
        self.store.remove(id)
    }

    pub fn toggle_confirm(&mut self, id: &EntryId) -> Result<bool> {
        self.store.toggle_confirm(id)
    }

    pub fn toggle_lock(&mut self, id: &EntryId) -> Result<bool> {
        self.store.toggle_lock(id)
    }

    pub fn remove_from_field(&mut self, id: &EntryId) -> Result<()> {
        self.store.remove_from_field(id)
    }

    // ========================
    // Gestures
    // ========================

    pub fn drag_phase(&self) -> &DragPhase {
        self.drag.phase()
    }

    pub fn begin_drag(&mut self, source: DragSource, pointer: PointerKind, origin: PixelPoint, now_ms: u64) -> Result<()> {
        if self.is_read_only() {
            return Err(BoardError::PermissionDenied("drag on a read-only roster".to_string()));
        }
        self.drag.begin(source, pointer, origin, now_ms)
    }

    pub fn move_drag(&mut self, delta: PixelDelta, now_ms: u64) -> &DragPhase {
        self.drag.update(delta, now_ms)
    }

    pub fn hold(&mut self, now_ms: u64) -> &DragPhase {
        self.drag.hold(now_ms)
    }

    pub fn end_drag(
        &mut self,
        target: DropTarget,
        field: Option<FieldRect>,
        delta: PixelDelta,
        now_ms: u64,
    ) -> Result<DragOutcome> {
        self.drag.finish(&mut self.store, target, field, delta, now_ms, self.orientation)
    }

    /// Resolve a complete drop in one step, for hosts that recognize
    /// gestures themselves.
    pub fn commit_drop(&mut self, request: &DropRequest) -> Result<DragOutcome> {
        if !self.drag.is_idle() {
            return Err(BoardError::GestureInProgress);
        }
        Ok(self.drag.commit(&mut self.store, request, self.orientation))
    }

    pub fn cancel_drag(&mut self) -> Option<DragOutcome> {
        self.drag.cancel(CancelReason::Aborted)
    }

    // ========================
    // Persistence
    // ========================

    /// Replace roster and colors with an externally pushed snapshot. Any
    /// gesture in flight is cancelled and reported.
    pub fn apply_remote(&mut self, raw: RawSnapshot) -> Option<DragOutcome> {
        let cancelled = self.drag.cancel(CancelReason::Superseded);
        if cancelled.is_some() {
            info!("remote snapshot superseded the active gesture");
        }
        self.ambient = sanitize_ambient(&raw, self.store.config());
        self.store.replace_all(raw.players);
        cancelled
    }

    /// Apply the newest pending emission, if any. Returns whether the roster changed.
    pub fn poll(&mut self, subscription: &mut Subscription) -> bool {
        match subscription.latest() {
            Some((raw, skipped)) => {
                debug!(owner = %subscription.owner(), emissions = skipped, "applying pushed snapshot");
                self.apply_remote(raw);
                true
            }
            None => false,
        }
    }

    pub fn snapshot(&self) -> RosterSnapshot {
        RosterSnapshot { entries: self.store.entries().to_vec(), ambient: self.ambient.clone() }
    }

    /// Push the whole roster to `gateway`. Refused when read-only; on failure
    /// local state is kept as is.
    pub fn save<G: PersistenceGateway + ?Sized>(&self, gateway: &mut G, owner: &OwnerKey) -> Result<()> {
        if self.is_read_only() {
            return Err(BoardError::PermissionDenied("save on a read-only roster".to_string()));
        }
        gateway.save(owner, &self.snapshot())?;
        info!(owner = %owner, entries = self.store.len(), "roster saved");
        Ok(())
    }

    // ========================
    // Views
    // ========================

    /// On-field entries mapped into the active orientation.
    pub fn visual_positions(&self) -> Vec<Marker> {
        self.store
            .on_field()
            .into_iter()
            .map(|e| Marker {
                id: e.id.clone(),
                name: e.display_name.clone(),
                number: e.number,
                badge: e.role.badge(),
                visual: to_visual(e.logical_pos(), self.orientation),
                color: self.color_for(e).to_string(),
                locked: e.is_locked,
            })
            .collect()
    }
}
