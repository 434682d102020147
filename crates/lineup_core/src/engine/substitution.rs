//! Substitution swap search
//!
//! A bench entry dropped close to an occupied field slot takes that slot and
//! sends the occupant back to the bench.
//!
//! ## Rules
//! - candidates: on the field, unlocked, not the dragged entry
//! - distance: Euclidean, logical units
//! - strictly closer than the radius
//! - equal distances resolve to the lowest id, whatever the stored order

use std::cmp::Ordering;

use crate::engine::coordinates::LogicalPos;
use crate::models::roster::{EntryId, RosterEntry};

/// Default swap radius in logical units.
pub const SWAP_RADIUS: f64 = 8.0;

/// Chosen occupant and its slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SwapTarget {
    pub id: EntryId,
    pub slot: LogicalPos,
    pub distance: f64,
}

/// Nearest swappable field entry to `candidate`, if within `radius`.
pub fn find_swap_target(
    entries: &[RosterEntry],
    dragged: &EntryId,
    candidate: LogicalPos,
    radius: f64,
) -> Option<SwapTarget> {
    let mut best: Option<SwapTarget> = None;

    for entry in entries {
        if !entry.is_movable_on_field() || &entry.id == dragged {
            continue;
        }

        let distance = entry.logical_pos().distance(candidate);
        if distance.is_nan() || distance >= radius {
            continue;
        }

        let better = match &best {
            None => true,
            Some(current) => match distance.partial_cmp(&current.distance) {
                Some(Ordering::Less) => true,
                Some(Ordering::Equal) => entry.id < current.id,
                _ => false,
            },
        };

        if better {
            best = Some(SwapTarget { id: entry.id.clone(), slot: entry.logical_pos(), distance });
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roster::RawEntry;
    use crate::save::sanitize::sanitize;

    fn field(id: &str, x: f64, y: f64) -> RosterEntry {
        sanitize(RawEntry {
            id: Some(id.into()),
            x: Some(x),
            y: Some(y),
            on_field: Some(true),
            ..Default::default()
        })
    }

    #[test]
    fn picks_nearest_within_radius() {
        let entries = vec![field("a", 35.0, 50.0), field("b", 40.0, 50.0)];
        let t = find_swap_target(&entries, &EntryId::new("sub"), LogicalPos::new(36.0, 49.0), SWAP_RADIUS).unwrap();
        assert_eq!(t.id, EntryId::new("a"));
        assert_eq!(t.slot, LogicalPos::new(35.0, 50.0));
        assert!((t.distance - 2.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn radius_is_exclusive() {
        let entries = vec![field("a", 30.0, 50.0)];
        assert!(find_swap_target(&entries, &EntryId::new("sub"), LogicalPos::new(38.0, 50.0), SWAP_RADIUS).is_none());
        assert!(find_swap_target(&entries, &EntryId::new("sub"), LogicalPos::new(37.99, 50.0), SWAP_RADIUS).is_some());
    }

    #[test]
    fn skips_locked_bench_and_self() {
        let mut locked = field("locked", 50.0, 50.0);
        locked.is_locked = true;
        let mut benched = field("benched", 50.0, 50.0);
        benched.is_on_field = false;
        let me = field("me", 50.0, 50.0);
        let entries = vec![locked, benched, me];
        assert!(find_swap_target(&entries, &EntryId::new("me"), LogicalPos::new(50.0, 50.0), SWAP_RADIUS).is_none());
    }

    #[test]
    fn ties_go_to_lowest_id_regardless_of_order() {
        let entries = vec![field("p7", 40.0, 50.0), field("p3", 60.0, 50.0)];
        let t = find_swap_target(&entries, &EntryId::new("sub"), LogicalPos::new(50.0, 50.0), 20.0).unwrap();
        assert_eq!(t.id, EntryId::new("p3"));

        let reversed: Vec<_> = entries.into_iter().rev().collect();
        let t = find_swap_target(&reversed, &EntryId::new("sub"), LogicalPos::new(50.0, 50.0), 20.0).unwrap();
        assert_eq!(t.id, EntryId::new("p3"));
    }
}
