use super::error::PersistenceError;
use super::DOCUMENT_VERSION;
use crate::models::access::OwnerKey;
use crate::models::roster::{RawEntry, RawSnapshot, RosterSnapshot};
use serde::{Deserialize, Serialize};

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Upper bound on stored entries; larger documents are rejected as corrupt input.
pub const MAX_ENTRIES: usize = 1000;

/// Stored roster document, one per owner.
///
/// Players are kept in their raw shape so that loading always goes through
/// `sanitize`, whatever wrote the document.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RosterDocument {
    /// Document format version for migration
    pub version: u32,

    /// Last write (unix milliseconds)
    pub timestamp: u64,

    pub owner: String,

    #[serde(default)]
    pub players: Vec<RawEntry>,

    #[serde(default, rename = "teamColor")]
    pub team_color: Option<String>,

    #[serde(default, rename = "gkColor")]
    pub keeper_color: Option<String>,
}

impl RosterDocument {
    pub fn new(owner: &OwnerKey) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            timestamp: current_timestamp(),
            owner: owner.as_str().to_string(),
            players: Vec::new(),
            team_color: None,
            keeper_color: None,
        }
    }

    pub fn from_snapshot(owner: &OwnerKey, snapshot: &RosterSnapshot) -> Self {
        let raw = RawSnapshot::from(snapshot);
        Self {
            version: DOCUMENT_VERSION,
            timestamp: current_timestamp(),
            owner: owner.as_str().to_string(),
            players: raw.players,
            team_color: raw.team_color,
            keeper_color: raw.keeper_color,
        }
    }

    pub fn to_raw_snapshot(&self) -> RawSnapshot {
        RawSnapshot {
            players: self.players.clone(),
            team_color: self.team_color.clone(),
            keeper_color: self.keeper_color.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.players.len() > MAX_ENTRIES {
            return Err(PersistenceError::DataTooLarge { size: self.players.len() });
        }

        // Duplicate ids mean the writer broke the uniqueness invariant.
        let mut ids = std::collections::HashSet::new();
        for player in &self.players {
            if let Some(id) = &player.id {
                if !ids.insert(id) {
                    return Err(PersistenceError::Corrupted);
                }
            }
        }

        Ok(())
    }
}

/// Serialize and compress a roster document
pub fn serialize_and_compress(doc: &RosterDocument) -> Result<Vec<u8>, PersistenceError> {
    doc.validate()?;

    // 1. MessagePack with field names
    let msgpack = to_vec_named(doc).map_err(PersistenceError::Serialization)?;

    // 2. LZ4 (size prepended)
    let compressed = compress_prepend_size(&msgpack);

    // 3. SHA256 trailer
    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

/// Decompress and deserialize a roster document
pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<RosterDocument, PersistenceError> {
    // size header + checksum
    if bytes.len() < 4 + 32 {
        return Err(PersistenceError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(PersistenceError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| PersistenceError::Decompression)?;

    let doc: RosterDocument = from_slice(&msgpack).map_err(PersistenceError::Deserialization)?;

    Ok(doc)
}

/// JSON form used by import/export tooling.
pub fn to_json(doc: &RosterDocument) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string_pretty(doc)?)
}

/// Accepts either a full document or a bare `{ "players": [...] }` snapshot.
pub fn from_json(json: &str, owner: &OwnerKey) -> Result<RosterDocument, PersistenceError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("version").is_some() {
        return Ok(serde_json::from_value(value)?);
    }

    let raw: RawSnapshot = serde_json::from_value(value)?;
    let mut doc = RosterDocument::new(owner);
    doc.players = raw.players;
    doc.team_color = raw.team_color;
    doc.keeper_color = raw.keeper_color;
    Ok(doc)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}

/// RFC3339 rendering of a document timestamp.
pub fn format_timestamp(timestamp_ms: u64) -> String {
    use time::format_description::well_known::Rfc3339;

    OffsetDateTime::from_unix_timestamp_nanos(timestamp_ms as i128 * 1_000_000)
        .ok()
        .and_then(|t| t.format(&Rfc3339).ok())
        .unwrap_or_else(|| "Unknown".to_string())
}
