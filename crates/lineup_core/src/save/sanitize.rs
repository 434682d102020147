//! Ingress defaulting for externally supplied roster records.
//!
//! Every record that enters the store from outside (initial load, live push,
//! JSON import) passes through [`sanitize`]. No other code path fills in
//! missing fields.

use std::collections::HashSet;

use crate::config::BoardConfig;
use crate::engine::coordinates::LogicalPos;
use crate::models::roster::{
    AmbientConfig, EntryId, RawEntry, RawSnapshot, RoleCategory, RosterEntry, RosterSnapshot,
};

pub const FALLBACK_NAME: &str = "JUGADOR";

/// Keeper heuristic for records that carry no usable role.
pub fn looks_like_keeper(name: &str) -> bool {
    let upper = name.trim().to_uppercase();
    upper == "GK"
        || upper.contains("ARQUERO")
        || upper.contains("PORTERO")
        || upper.contains("GOALKEEPER")
}

/// Fill in every missing field of one record using the default config.
pub fn sanitize(raw: RawEntry) -> RosterEntry {
    sanitize_with(raw, &BoardConfig::default())
}

/// Fill in every missing field of one record.
///
/// - `locked` → false
/// - `color` → `config.default_color`
/// - `positionType` missing or unknown → Goalkeeper if the name reads as one, else Midfielder
/// - `onField` → false; `isConfirmed` → `onField`; on-field records are always confirmed
/// - coordinates clamped, non-finite or missing ones replaced by the bench position
/// - missing id → fresh id
pub fn sanitize_with(raw: RawEntry, config: &BoardConfig) -> RosterEntry {
    let name = raw.name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| FALLBACK_NAME.to_string());

    let role = raw.position_type.as_deref().and_then(RoleCategory::from_code).unwrap_or_else(|| {
        if looks_like_keeper(&name) {
            RoleCategory::Goalkeeper
        } else {
            RoleCategory::Midfielder
        }
    });

    let bench = config.bench_pos();
    let x = raw.x.filter(|v| v.is_finite()).unwrap_or(bench.x);
    let y = raw.y.filter(|v| v.is_finite()).unwrap_or(bench.y);

    let is_on_field = raw.on_field.unwrap_or(false);
    let is_confirmed = raw.is_confirmed.unwrap_or(is_on_field) || is_on_field;

    let id = raw.id.filter(|id| !id.trim().is_empty()).map(EntryId::new).unwrap_or_else(EntryId::generate);

    let mut entry = RosterEntry {
        id,
        display_name: name,
        number: raw.number.unwrap_or(0),
        role,
        logical_x: 0.0,
        logical_y: 0.0,
        is_on_field,
        is_confirmed,
        is_locked: raw.locked.unwrap_or(false),
        color_ref: raw.color.filter(|c| !c.trim().is_empty()).unwrap_or_else(|| config.default_color.clone()),
        image_ref: raw.image_url.filter(|u| !u.trim().is_empty()),
    };
    entry.set_logical_pos(LogicalPos::new(x, y));
    entry
}

/// Sanitize a whole collection, keeping ids unique.
///
/// The first record with a given id keeps it; later duplicates get fresh ids.
pub fn sanitize_all(raw: Vec<RawEntry>, config: &BoardConfig) -> Vec<RosterEntry> {
    let mut seen: HashSet<EntryId> = HashSet::with_capacity(raw.len());
    raw.into_iter()
        .map(|r| {
            let mut entry = sanitize_with(r, config);
            if !seen.insert(entry.id.clone()) {
                let fresh = EntryId::generate();
                tracing::warn!(duplicate = %entry.id, replacement = %fresh, "duplicate roster id on ingress");
                entry.id = fresh.clone();
                seen.insert(fresh);
            }
            entry
        })
        .collect()
}

/// Ambient colors with fallbacks from the config.
pub fn sanitize_ambient(raw: &RawSnapshot, config: &BoardConfig) -> AmbientConfig {
    AmbientConfig {
        team_color: raw.team_color.clone().filter(|c| !c.is_empty()).unwrap_or_else(|| config.team_color.clone()),
        keeper_color: raw
            .keeper_color
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| config.keeper_color.clone()),
    }
}

/// Full snapshot ingress.
pub fn sanitize_snapshot(raw: RawSnapshot, config: &BoardConfig) -> RosterSnapshot {
    let ambient = sanitize_ambient(&raw, config);
    RosterSnapshot { entries: sanitize_all(raw.players, config), ambient }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_gets_every_default() {
        let e = sanitize(RawEntry::default());
        assert_eq!(e.display_name, FALLBACK_NAME);
        assert_eq!(e.role, RoleCategory::Midfielder);
        assert_eq!(e.logical_pos(), LogicalPos::new(50.0, 95.0));
        assert!(!e.is_on_field && !e.is_confirmed && !e.is_locked);
        assert_eq!(e.color_ref, "bg-blue-600");
        assert_eq!(e.number, 0);
        assert!(!e.id.as_str().is_empty());
    }

    #[test]
    fn keeper_name_heuristic() {
        let e = sanitize(RawEntry { name: Some("gk".into()), ..Default::default() });
        assert_eq!(e.role, RoleCategory::Goalkeeper);
        let e = sanitize(RawEntry { name: Some("El Arquero".into()), ..Default::default() });
        assert_eq!(e.role, RoleCategory::Goalkeeper);
        let e = sanitize(RawEntry { name: Some("Gerardo".into()), ..Default::default() });
        assert_eq!(e.role, RoleCategory::Midfielder);
    }

    #[test]
    fn explicit_role_wins_over_name() {
        let e = sanitize(RawEntry {
            name: Some("GK".into()),
            position_type: Some("DEL".into()),
            ..Default::default()
        });
        assert_eq!(e.role, RoleCategory::Forward);
    }

    #[test]
    fn confirmed_derived_from_on_field() {
        let e = sanitize(RawEntry { on_field: Some(true), ..Default::default() });
        assert!(e.is_confirmed);
        let e = sanitize(RawEntry { on_field: Some(false), ..Default::default() });
        assert!(!e.is_confirmed);
        let e = sanitize(RawEntry { on_field: Some(false), is_confirmed: Some(true), ..Default::default() });
        assert!(e.is_confirmed && !e.is_on_field);
        // Placement implies confirmation even when the record says otherwise.
        let e = sanitize(RawEntry { on_field: Some(true), is_confirmed: Some(false), ..Default::default() });
        assert!(e.is_confirmed);
    }

    #[test]
    fn coordinates_clamped_and_non_finite_replaced() {
        let e = sanitize(RawEntry { x: Some(-4.0), y: Some(250.0), ..Default::default() });
        assert_eq!(e.logical_pos(), LogicalPos::new(0.0, 100.0));
        let e = sanitize(RawEntry { x: Some(f64::NAN), y: Some(20.0), ..Default::default() });
        assert_eq!(e.logical_pos(), LogicalPos::new(50.0, 20.0));
    }

    #[test]
    fn preserves_supplied_fields() {
        let raw = RawEntry {
            id: Some("p9".into()),
            name: Some("Ana".into()),
            number: Some(9),
            position_type: Some("LAT_DER".into()),
            x: Some(80.0),
            y: Some(70.0),
            on_field: Some(true),
            is_confirmed: Some(true),
            locked: Some(true),
            color: Some("bg-red-600".into()),
            image_url: Some("https://img/ana.png".into()),
        };
        let e = sanitize(raw);
        assert_eq!(e.id, EntryId::new("p9"));
        assert_eq!(e.role, RoleCategory::DefenderRight);
        assert!(e.is_locked);
        assert_eq!(e.color_ref, "bg-red-600");
        assert_eq!(e.image_ref.as_deref(), Some("https://img/ana.png"));
    }

    #[test]
    fn duplicate_ids_are_reassigned() {
        let raw = vec![
            RawEntry { id: Some("p1".into()), name: Some("A".into()), ..Default::default() },
            RawEntry { id: Some("p1".into()), name: Some("B".into()), ..Default::default() },
        ];
        let entries = sanitize_all(raw, &BoardConfig::default());
        assert_eq!(entries[0].id, EntryId::new("p1"));
        assert_ne!(entries[1].id, EntryId::new("p1"));
        assert_eq!(entries[1].display_name, "B");
    }

    #[test]
    fn ambient_fallbacks() {
        let config = BoardConfig::default();
        let ambient = sanitize_ambient(&RawSnapshot::default(), &config);
        assert_eq!(ambient, AmbientConfig::default());
        let raw = RawSnapshot { team_color: Some("bg-red-600".into()), ..Default::default() };
        assert_eq!(sanitize_ambient(&raw, &config).team_color, "bg-red-600");
    }

    #[test]
    fn sanitize_is_idempotent_on_complete_entries() {
        let e = sanitize(RawEntry { name: Some("Ana".into()), on_field: Some(true), x: Some(12.5), ..Default::default() });
        assert_eq!(sanitize(RawEntry::from(&e)), e);
    }
}
