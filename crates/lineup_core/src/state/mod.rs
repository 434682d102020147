//! Roster State Store
//!
//! Owns the authoritative in-memory roster. Every mutation goes through here
//! and is refused while the board is read-only. External replacements come
//! in whole, through `sanitize`, never merged field by field.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::BoardConfig;
use crate::engine::drag::DragOutcome;
use crate::error::{BoardError, Result};
use crate::models::roster::{EntryId, EntryPatch, NewEntry, RawEntry, RoleGroup, RosterEntry};
use crate::save::format::MAX_ENTRIES;
use crate::save::sanitize::sanitize_all;

pub const DEFAULT_NEW_NAME: &str = "NUEVO";

/// Which slice of the roster a list view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListFilter {
    #[default]
    All,
    /// Entries currently on the field.
    OnField,
    /// Confirmed for the match but resting on the bench.
    MatchSquad,
    /// Not confirmed.
    GeneralPool,
}

impl ListFilter {
    pub fn matches(&self, entry: &RosterEntry) -> bool {
        match self {
            ListFilter::All => true,
            ListFilter::OnField => entry.is_on_field,
            ListFilter::MatchSquad => entry.is_confirmed && !entry.is_on_field,
            ListFilter::GeneralPool => !entry.is_confirmed,
        }
    }
}

/// One display bucket of the grouping query.
#[derive(Debug, Clone, PartialEq)]
pub struct RoleBucket<'a> {
    pub group: RoleGroup,
    pub entries: Vec<&'a RosterEntry>,
}

#[derive(Debug, Clone)]
pub struct RosterStore {
    entries: Vec<RosterEntry>,
    read_only: bool,
    config: BoardConfig,
}

impl Default for RosterStore {
    fn default() -> Self {
        Self::new(BoardConfig::default(), false)
    }
}

impl RosterStore {
    pub fn new(config: BoardConfig, read_only: bool) -> Self {
        Self { entries: Vec::new(), read_only, config }
    }

    /// Build a store from raw records (sanitized on the way in).
    pub fn from_raw(raw: Vec<RawEntry>, config: BoardConfig, read_only: bool) -> Self {
        let entries = sanitize_all(raw, &config);
        Self { entries, read_only, config }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Set by the boundary whenever the viewed roster changes hands.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn entries(&self) -> &[RosterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &EntryId) -> Option<&RosterEntry> {
        self.entries.iter().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.get(id).is_some()
    }

    fn ensure_writable(&self, op: &str) -> Result<()> {
        if self.read_only {
            debug!(op, "mutation rejected: roster is read-only");
            return Err(BoardError::PermissionDenied(format!("{} on a read-only roster", op)));
        }
        Ok(())
    }

    fn entry_mut(&mut self, id: &EntryId) -> Result<&mut RosterEntry> {
        self.entries.iter_mut().find(|e| &e.id == id).ok_or_else(|| BoardError::NotFound(id.to_string()))
    }

    // ========================
    // Entry Management
    // ========================

    /// Create a bench entry and return its id.
    ///
    /// Refused with `RosterFull` once the roster holds [`MAX_ENTRIES`], the
    /// most a stored document accepts.
    pub fn add(&mut self, new: NewEntry) -> Result<EntryId> {
        self.ensure_writable("add")?;
        if self.entries.len() >= MAX_ENTRIES {
            warn!(limit = MAX_ENTRIES, "add rejected: roster is full");
            return Err(BoardError::RosterFull { limit: MAX_ENTRIES });
        }

        let mut id = EntryId::generate();
        while self.contains(&id) {
            id = EntryId::generate();
        }

        let mut entry = RosterEntry {
            id: id.clone(),
            display_name: new.display_name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| DEFAULT_NEW_NAME.to_string()),
            number: new.number.unwrap_or(0),
            role: new.role.unwrap_or_default(),
            logical_x: 0.0,
            logical_y: 0.0,
            is_on_field: false,
            is_confirmed: false,
            is_locked: false,
            color_ref: new.color_ref.unwrap_or_else(|| self.config.default_color.clone()),
            image_ref: new.image_ref,
        };
        entry.set_logical_pos(self.config.bench_pos());

        info!(id = %id, name = %entry.display_name, "roster entry added");
        self.entries.push(entry);
        Ok(id)
    }

    /// Merge the present fields of `patch` into the entry.
    pub fn update(&mut self, id: &EntryId, patch: &EntryPatch) -> Result<()> {
        self.ensure_writable("update")?;
        let entry = self.entry_mut(id)?;
        patch.apply_to(entry);
        debug!(id = %id, "roster entry updated");
        Ok(())
    }

    /// Delete an entry for good.
    pub fn remove(&mut self, id: &EntryId) -> Result<RosterEntry> {
        self.ensure_writable("remove")?;
        let idx = self.entries.iter().position(|e| &e.id == id).ok_or_else(|| BoardError::NotFound(id.to_string()))?;
        let removed = self.entries.remove(idx);
        info!(id = %id, "roster entry removed");
        Ok(removed)
    }

    /// Flip match-squad confirmation. Unconfirming also takes the entry off
    /// the field; confirming never places it. Returns the new value.
    pub fn toggle_confirm(&mut self, id: &EntryId) -> Result<bool> {
        self.ensure_writable("toggle_confirm")?;
        let entry = self.entry_mut(id)?;
        entry.is_confirmed = !entry.is_confirmed;
        if !entry.is_confirmed && entry.is_on_field {
            entry.is_on_field = false;
        }
        Ok(entry.is_confirmed)
    }

    /// Flip the drag lock. Returns the new value.
    pub fn toggle_lock(&mut self, id: &EntryId) -> Result<bool> {
        self.ensure_writable("toggle_lock")?;
        let entry = self.entry_mut(id)?;
        entry.is_locked = !entry.is_locked;
        Ok(entry.is_locked)
    }

    /// Back to the bench, unlocked, still confirmed.
    pub fn remove_from_field(&mut self, id: &EntryId) -> Result<()> {
        self.ensure_writable("remove_from_field")?;
        self.entry_mut(id)?.bench();
        Ok(())
    }

    /// Commit the result of a drag. Cancelled outcomes are a no-op.
    pub fn apply_drag(&mut self, outcome: &DragOutcome) -> Result<()> {
        if outcome.is_cancelled() {
            return Ok(());
        }
        self.ensure_writable("drag")?;

        match outcome {
            DragOutcome::Relocated { id, to } => {
                let entry = self.entry_mut(id)?;
                if entry.is_locked {
                    return Err(BoardError::PermissionDenied(format!("{} is locked", id)));
                }
                entry.set_logical_pos(*to);
            }
            DragOutcome::Placed { id, to } => {
                let entry = self.entry_mut(id)?;
                if entry.is_locked {
                    return Err(BoardError::PermissionDenied(format!("{} is locked", id)));
                }
                entry.place(*to);
            }
            DragOutcome::Swapped { incoming, outgoing, to } => {
                // Validate both sides before touching either.
                let incoming_entry = self.get(incoming).ok_or_else(|| BoardError::NotFound(incoming.to_string()))?;
                let outgoing_entry = self.get(outgoing).ok_or_else(|| BoardError::NotFound(outgoing.to_string()))?;
                if incoming_entry.is_locked || outgoing_entry.is_locked {
                    return Err(BoardError::PermissionDenied("swap involves a locked entry".to_string()));
                }

                self.entry_mut(outgoing)?.bench();
                self.entry_mut(incoming)?.place(*to);
                info!(incoming = %incoming, outgoing = %outgoing, "substitution swap");
            }
            DragOutcome::Cancelled(_) => {}
        }
        Ok(())
    }

    /// Wholesale replacement from an external push. Allowed on read-only
    /// rosters: viewers still follow the owner's updates.
    pub fn replace_all(&mut self, raw: Vec<RawEntry>) {
        let incoming = raw.len();
        self.entries = sanitize_all(raw, &self.config);
        if incoming != self.entries.len() {
            warn!(incoming, kept = self.entries.len(), "roster replacement size mismatch");
        }
        info!(entries = self.entries.len(), "roster replaced from external snapshot");
    }

    // ========================
    // Queries
    // ========================

    pub fn filtered(&self, filter: ListFilter) -> Vec<&RosterEntry> {
        self.entries.iter().filter(|e| filter.matches(e)).collect()
    }

    pub fn on_field(&self) -> Vec<&RosterEntry> {
        self.filtered(ListFilter::OnField)
    }

    pub fn match_squad(&self) -> Vec<&RosterEntry> {
        self.filtered(ListFilter::MatchSquad)
    }

    pub fn general_pool(&self) -> Vec<&RosterEntry> {
        self.filtered(ListFilter::GeneralPool)
    }

    /// Partition into role buckets in display order. Stored order is kept
    /// inside each bucket; empty buckets are included.
    pub fn grouped(&self, filter: ListFilter) -> Vec<RoleBucket<'_>> {
        RoleGroup::ORDERED
            .iter()
            .map(|group| RoleBucket {
                group: *group,
                entries: self.entries.iter().filter(|e| filter.matches(e) && e.role.group() == *group).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::coordinates::LogicalPos;
    use crate::models::roster::RoleCategory;

    fn store() -> RosterStore {
        RosterStore::default()
    }

    #[test]
    fn add_fills_defaults() {
        let mut s = store();
        let id = s.add(NewEntry::default()).unwrap();
        let e = s.get(&id).unwrap();
        assert_eq!(e.display_name, DEFAULT_NEW_NAME);
        assert_eq!(e.role, RoleCategory::Midfielder);
        assert_eq!(e.logical_pos(), LogicalPos::new(50.0, 95.0));
        assert!(!e.is_on_field && !e.is_confirmed && !e.is_locked);
    }

    #[test]
    fn ids_are_unique() {
        let mut s = store();
        let a = s.add(NewEntry::default()).unwrap();
        let b = s.add(NewEntry::default()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn add_stops_at_document_limit() {
        let mut s = store();
        for _ in 0..MAX_ENTRIES {
            s.add(NewEntry::default()).unwrap();
        }
        assert!(matches!(s.add(NewEntry::default()), Err(BoardError::RosterFull { limit: MAX_ENTRIES })));
        assert_eq!(s.entries().len(), MAX_ENTRIES);
        assert!(crate::save::format::serialize_and_compress(&crate::save::format::RosterDocument::from_snapshot(
            &"coach".into(),
            &crate::models::roster::RosterSnapshot { entries: s.entries().to_vec(), ..Default::default() },
        ))
        .is_ok());
    }

    #[test]
    fn update_and_remove_missing_are_no_ops() {
        let mut s = store();
        s.add(NewEntry::default()).unwrap();
        let before = s.entries().to_vec();
        let ghost = EntryId::new("ghost");
        assert!(matches!(s.update(&ghost, &EntryPatch::default()), Err(BoardError::NotFound(_))));
        assert!(matches!(s.remove(&ghost), Err(BoardError::NotFound(_))));
        assert_eq!(s.entries(), &before[..]);
    }

    #[test]
    fn update_merges_fields() {
        let mut s = store();
        let id = s.add(NewEntry::named("Ana", RoleCategory::Forward)).unwrap();
        s.update(&id, &EntryPatch { number: Some(11), position: Some(LogicalPos::new(120.0, 10.0)), ..Default::default() })
            .unwrap();
        let e = s.get(&id).unwrap();
        assert_eq!(e.number, 11);
        assert_eq!(e.display_name, "Ana");
        assert_eq!(e.logical_pos(), LogicalPos::new(100.0, 10.0));
    }

    #[test]
    fn toggle_confirm_never_places() {
        let mut s = store();
        let id = s.add(NewEntry::default()).unwrap();
        assert!(s.toggle_confirm(&id).unwrap());
        let e = s.get(&id).unwrap();
        assert!(e.is_confirmed && !e.is_on_field);
    }

    #[test]
    fn unconfirm_removes_from_field() {
        let mut s = store();
        let id = s.add(NewEntry::default()).unwrap();
        s.update(&id, &EntryPatch { is_on_field: Some(true), ..Default::default() }).unwrap();
        assert!(s.get(&id).unwrap().is_confirmed);

        assert!(!s.toggle_confirm(&id).unwrap());
        let e = s.get(&id).unwrap();
        assert!(!e.is_confirmed && !e.is_on_field);
    }

    #[test]
    fn toggle_lock_is_unrestricted() {
        let mut s = store();
        let id = s.add(NewEntry::default()).unwrap();
        assert!(s.toggle_lock(&id).unwrap());
        assert!(!s.toggle_lock(&id).unwrap());
    }

    #[test]
    fn remove_from_field_keeps_confirmation() {
        let mut s = store();
        let id = s.add(NewEntry::default()).unwrap();
        s.update(&id, &EntryPatch { is_on_field: Some(true), is_locked: Some(true), ..Default::default() }).unwrap();
        s.remove_from_field(&id).unwrap();
        let e = s.get(&id).unwrap();
        assert!(!e.is_on_field && !e.is_locked && e.is_confirmed);
    }

    #[test]
    fn read_only_rejects_everything() {
        let mut s = store();
        let id = s.add(NewEntry::default()).unwrap();
        s.set_read_only(true);
        let before = s.entries().to_vec();

        assert!(s.add(NewEntry::default()).unwrap_err().is_permission());
        assert!(s.update(&id, &EntryPatch { number: Some(3), ..Default::default() }).unwrap_err().is_permission());
        assert!(s.toggle_confirm(&id).unwrap_err().is_permission());
        assert!(s.toggle_lock(&id).unwrap_err().is_permission());
        assert!(s.remove_from_field(&id).unwrap_err().is_permission());
        assert!(s.remove(&id).unwrap_err().is_permission());
        let drag = DragOutcome::Placed { id: id.clone(), to: LogicalPos::new(10.0, 10.0) };
        assert!(s.apply_drag(&drag).unwrap_err().is_permission());

        assert_eq!(s.entries(), &before[..]);
    }

    #[test]
    fn replace_all_allowed_when_read_only() {
        let mut s = RosterStore::new(BoardConfig::default(), true);
        s.replace_all(vec![RawEntry { name: Some("GK".into()), on_field: Some(true), ..Default::default() }]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.entries()[0].role, RoleCategory::Goalkeeper);
    }

    #[test]
    fn grouping_keeps_order_and_buckets() {
        let mut s = store();
        let d1 = s.add(NewEntry::named("D1", RoleCategory::DefenderLeft)).unwrap();
        let m1 = s.add(NewEntry::named("M1", RoleCategory::Midfielder)).unwrap();
        let d2 = s.add(NewEntry::named("D2", RoleCategory::Defender)).unwrap();
        let g = s.add(NewEntry::named("G", RoleCategory::Goalkeeper)).unwrap();

        let buckets = s.grouped(ListFilter::All);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[0].group, RoleGroup::Goalkeepers);
        assert_eq!(buckets[0].entries.iter().map(|e| &e.id).collect::<Vec<_>>(), vec![&g]);
        assert_eq!(buckets[1].entries.iter().map(|e| &e.id).collect::<Vec<_>>(), vec![&d1, &d2]);
        assert_eq!(buckets[2].entries.iter().map(|e| &e.id).collect::<Vec<_>>(), vec![&m1]);
        assert!(buckets[3].entries.is_empty());

        // Stored order untouched.
        assert_eq!(s.entries()[0].id, d1);
    }

    #[test]
    fn list_views_partition_by_flags() {
        let mut s = store();
        let on = s.add(NewEntry::default()).unwrap();
        let squad = s.add(NewEntry::default()).unwrap();
        let pool = s.add(NewEntry::default()).unwrap();
        s.update(&on, &EntryPatch { is_on_field: Some(true), ..Default::default() }).unwrap();
        s.toggle_confirm(&squad).unwrap();

        assert_eq!(s.on_field()[0].id, on);
        assert_eq!(s.match_squad().len(), 1);
        assert_eq!(s.match_squad()[0].id, squad);
        assert_eq!(s.general_pool().len(), 1);
        assert_eq!(s.general_pool()[0].id, pool);
    }

    #[test]
    fn locked_relocation_is_denied() {
        let mut s = store();
        let id = s.add(NewEntry::default()).unwrap();
        s.toggle_lock(&id).unwrap();
        let before = s.entries().to_vec();
        let outcome = DragOutcome::Relocated { id, to: LogicalPos::new(1.0, 1.0) };
        assert!(s.apply_drag(&outcome).unwrap_err().is_permission());
        assert_eq!(s.entries(), &before[..]);
    }
}
