//! Roster entries and the snapshot that flows between store, presentation
//! and persistence.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::engine::coordinates::LogicalPos;

/// Stable identifier of a roster entry. Never reused once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Fresh random id for a newly created entry.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Tactical role of a roster entry.
///
/// Wire codes follow the stored documents (`ARQ`, `DEF`, `LAT_IZQ`, ...);
/// English shorthands are accepted on ingress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RoleCategory {
    #[serde(rename = "ARQ", alias = "GK")]
    Goalkeeper,
    #[serde(rename = "DEF", alias = "DF", alias = "CB")]
    Defender,
    #[serde(rename = "LAT_IZQ", alias = "LB")]
    DefenderLeft,
    #[serde(rename = "LAT_DER", alias = "RB")]
    DefenderRight,
    #[default]
    #[serde(rename = "MED", alias = "MF", alias = "CM")]
    Midfielder,
    #[serde(rename = "VOL_IZQ", alias = "LM")]
    MidfielderLeft,
    #[serde(rename = "VOL_DER", alias = "RM")]
    MidfielderRight,
    #[serde(rename = "DEL", alias = "FW", alias = "ST")]
    Forward,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 8] = [
        RoleCategory::Goalkeeper,
        RoleCategory::Defender,
        RoleCategory::DefenderLeft,
        RoleCategory::DefenderRight,
        RoleCategory::Midfielder,
        RoleCategory::MidfielderLeft,
        RoleCategory::MidfielderRight,
        RoleCategory::Forward,
    ];

    /// Parse a wire code, an English shorthand or a variant name.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "ARQ" | "GK" | "GOALKEEPER" => Some(RoleCategory::Goalkeeper),
            "DEF" | "DF" | "CB" | "DEFENDER" => Some(RoleCategory::Defender),
            "LAT_IZQ" | "LB" | "DEFENDERLEFT" => Some(RoleCategory::DefenderLeft),
            "LAT_DER" | "RB" | "DEFENDERRIGHT" => Some(RoleCategory::DefenderRight),
            "MED" | "MF" | "CM" | "MIDFIELDER" => Some(RoleCategory::Midfielder),
            "VOL_IZQ" | "LM" | "MIDFIELDERLEFT" => Some(RoleCategory::MidfielderLeft),
            "VOL_DER" | "RM" | "MIDFIELDERRIGHT" => Some(RoleCategory::MidfielderRight),
            "DEL" | "FW" | "ST" | "FORWARD" => Some(RoleCategory::Forward),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            RoleCategory::Goalkeeper => "ARQ",
            RoleCategory::Defender => "DEF",
            RoleCategory::DefenderLeft => "LAT_IZQ",
            RoleCategory::DefenderRight => "LAT_DER",
            RoleCategory::Midfielder => "MED",
            RoleCategory::MidfielderLeft => "VOL_IZQ",
            RoleCategory::MidfielderRight => "VOL_DER",
            RoleCategory::Forward => "DEL",
        }
    }

    /// Compact badge text (`LAT_IZQ` → `LIZQ`, `VOL_DER` → `VDER`).
    pub fn badge(&self) -> String {
        self.code().replace("LAT_", "L").replace("VOL_", "V")
    }

    pub fn is_goalkeeper(&self) -> bool {
        matches!(self, RoleCategory::Goalkeeper)
    }

    pub fn is_defender(&self) -> bool {
        matches!(self, RoleCategory::Defender | RoleCategory::DefenderLeft | RoleCategory::DefenderRight)
    }

    pub fn is_midfielder(&self) -> bool {
        matches!(
            self,
            RoleCategory::Midfielder | RoleCategory::MidfielderLeft | RoleCategory::MidfielderRight
        )
    }

    pub fn is_forward(&self) -> bool {
        matches!(self, RoleCategory::Forward)
    }

    pub fn group(&self) -> RoleGroup {
        if self.is_goalkeeper() {
            RoleGroup::Goalkeepers
        } else if self.is_defender() {
            RoleGroup::Defenders
        } else if self.is_midfielder() {
            RoleGroup::Midfielders
        } else {
            RoleGroup::Forwards
        }
    }
}

/// Display buckets for the roster lists, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoleGroup {
    Goalkeepers,
    Defenders,
    Midfielders,
    Forwards,
}

impl RoleGroup {
    pub const ORDERED: [RoleGroup; 4] =
        [RoleGroup::Goalkeepers, RoleGroup::Defenders, RoleGroup::Midfielders, RoleGroup::Forwards];

    pub fn label(&self) -> &'static str {
        match self {
            RoleGroup::Goalkeepers => "Arqueros",
            RoleGroup::Defenders => "Defensores",
            RoleGroup::Midfielders => "Mediocampistas",
            RoleGroup::Forwards => "Delanteros",
        }
    }
}

/// One member of the roster.
///
/// Field names on the wire match the stored documents so that an exported
/// snapshot can be fed straight back through `sanitize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub id: EntryId,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(default)]
    pub number: u8,
    #[serde(rename = "positionType")]
    pub role: RoleCategory,
    #[serde(rename = "x")]
    pub logical_x: f64,
    #[serde(rename = "y")]
    pub logical_y: f64,
    #[serde(rename = "onField")]
    pub is_on_field: bool,
    #[serde(rename = "isConfirmed")]
    pub is_confirmed: bool,
    #[serde(rename = "locked")]
    pub is_locked: bool,
    #[serde(rename = "color")]
    pub color_ref: String,
    #[serde(rename = "imageUrl", default)]
    pub image_ref: Option<String>,
}

impl RosterEntry {
    #[inline]
    pub fn logical_pos(&self) -> LogicalPos {
        LogicalPos::new(self.logical_x, self.logical_y)
    }

    /// Store a position, clamped and rounded onto the storage grid.
    pub fn set_logical_pos(&mut self, pos: LogicalPos) {
        let settled = pos.settled();
        self.logical_x = settled.x;
        self.logical_y = settled.y;
    }

    /// Put the entry on the field. Placement always confirms.
    pub fn place(&mut self, pos: LogicalPos) {
        self.set_logical_pos(pos);
        self.is_on_field = true;
        self.is_confirmed = true;
    }

    /// Send the entry back to the bench, releasing any lock.
    pub fn bench(&mut self) {
        self.is_on_field = false;
        self.is_locked = false;
    }

    /// On the field and free to be swapped out or dragged.
    pub fn is_movable_on_field(&self) -> bool {
        self.is_on_field && !self.is_locked
    }
}

/// Fields the caller may supply when creating an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewEntry {
    #[serde(default, rename = "name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub number: Option<u8>,
    #[serde(default, rename = "positionType")]
    pub role: Option<RoleCategory>,
    #[serde(default, rename = "color")]
    pub color_ref: Option<String>,
    #[serde(default, rename = "imageUrl")]
    pub image_ref: Option<String>,
}

impl NewEntry {
    pub fn named(name: impl Into<String>, role: RoleCategory) -> Self {
        Self { display_name: Some(name.into()), role: Some(role), ..Default::default() }
    }
}

/// Partial update merged into an existing entry. Absent fields are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    #[serde(default, rename = "name")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub number: Option<u8>,
    #[serde(default, rename = "positionType")]
    pub role: Option<RoleCategory>,
    #[serde(default, rename = "color")]
    pub color_ref: Option<String>,
    /// `Some(None)` clears the avatar.
    #[serde(default, rename = "imageUrl")]
    pub image_ref: Option<Option<String>>,
    #[serde(default)]
    pub position: Option<LogicalPos>,
    #[serde(default, rename = "onField")]
    pub is_on_field: Option<bool>,
    #[serde(default, rename = "isConfirmed")]
    pub is_confirmed: Option<bool>,
    #[serde(default, rename = "locked")]
    pub is_locked: Option<bool>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        *self == EntryPatch::default()
    }

    pub(crate) fn apply_to(&self, entry: &mut RosterEntry) {
        if let Some(name) = &self.display_name {
            entry.display_name = name.clone();
        }
        if let Some(number) = self.number {
            entry.number = number;
        }
        if let Some(role) = self.role {
            entry.role = role;
        }
        if let Some(color) = &self.color_ref {
            entry.color_ref = color.clone();
        }
        if let Some(image) = &self.image_ref {
            entry.image_ref = image.clone();
        }
        if let Some(pos) = self.position {
            if pos.is_finite() {
                entry.set_logical_pos(pos);
            }
        }
        if let Some(confirmed) = self.is_confirmed {
            entry.is_confirmed = confirmed;
        }
        if let Some(locked) = self.is_locked {
            entry.is_locked = locked;
        }
        if let Some(on_field) = self.is_on_field {
            entry.is_on_field = on_field;
        }
        if entry.is_on_field {
            entry.is_confirmed = true;
        }
    }
}

/// Team-wide styling stored alongside the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmbientConfig {
    #[serde(rename = "teamColor")]
    pub team_color: String,
    #[serde(rename = "gkColor", alias = "keeperColor")]
    pub keeper_color: String,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self { team_color: DEFAULT_TEAM_COLOR.to_string(), keeper_color: DEFAULT_KEEPER_COLOR.to_string() }
    }
}

pub const DEFAULT_TEAM_COLOR: &str = "bg-blue-600";
pub const DEFAULT_KEEPER_COLOR: &str = "bg-yellow-500";

/// Full replacement unit exchanged with persistence and presentation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RosterSnapshot {
    #[serde(rename = "players")]
    pub entries: Vec<RosterEntry>,
    #[serde(flatten)]
    pub ambient: AmbientConfig,
}

/// A roster record as it arrives from outside, possibly incomplete.
///
/// Only `sanitize` turns one of these into a [`RosterEntry`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number", skip_serializing_if = "Option::is_none")]
    pub number: Option<u8>,
    #[serde(default, rename = "positionType", skip_serializing_if = "Option::is_none")]
    pub position_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, rename = "onField", skip_serializing_if = "Option::is_none")]
    pub on_field: Option<bool>,
    #[serde(default, rename = "isConfirmed", skip_serializing_if = "Option::is_none")]
    pub is_confirmed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, rename = "imageUrl", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl From<&RosterEntry> for RawEntry {
    fn from(e: &RosterEntry) -> Self {
        Self {
            id: Some(e.id.as_str().to_string()),
            name: Some(e.display_name.clone()),
            number: Some(e.number),
            position_type: Some(e.role.code().to_string()),
            x: Some(e.logical_x),
            y: Some(e.logical_y),
            on_field: Some(e.is_on_field),
            is_confirmed: Some(e.is_confirmed),
            locked: Some(e.is_locked),
            color: Some(e.color_ref.clone()),
            image_url: e.image_ref.clone(),
        }
    }
}

/// Externally pushed replacement, before sanitization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSnapshot {
    #[serde(default)]
    pub players: Vec<RawEntry>,
    #[serde(default, rename = "teamColor", skip_serializing_if = "Option::is_none")]
    pub team_color: Option<String>,
    #[serde(default, rename = "gkColor", alias = "keeperColor", skip_serializing_if = "Option::is_none")]
    pub keeper_color: Option<String>,
}

impl From<&RosterSnapshot> for RawSnapshot {
    fn from(s: &RosterSnapshot) -> Self {
        Self {
            players: s.entries.iter().map(RawEntry::from).collect(),
            team_color: Some(s.ambient.team_color.clone()),
            keeper_color: Some(s.ambient.keeper_color.clone()),
        }
    }
}

/// Shirt numbers arrive as numbers or as form strings (`"7"`, `""`).
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|v| u8::try_from(v).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse::<u8>().ok(),
        _ => None,
    })
}
