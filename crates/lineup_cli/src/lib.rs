//! Lineup roster tooling
//!
//! JSON ↔ stored roster document (MessagePack → LZ4 → SHA256 trailer),
//! integrity checks and a text rendering of the board.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use lineup_core::board::{starting_lineup, Board};
use lineup_core::config::BoardConfig;
use lineup_core::engine::Orientation;
use lineup_core::models::{OwnerKey, RosterSnapshot};
use lineup_core::save::format::{decompress_and_deserialize, from_json, to_json, RosterDocument};
use lineup_core::save::migration::{migrate_document, needs_migration};
use lineup_core::save::sanitize::sanitize_snapshot;
use lineup_core::save::FileGateway;
use lineup_core::state::ListFilter;

/// Summary of a written roster file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterMetadata {
    pub owner: String,
    pub entries: usize,
    pub on_field: usize,
    /// SHA256 of the whole file (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
    pub original_size: u64,
    pub compressed_size: u64,
    /// compressed / original
    pub compression_ratio: f64,
}

/// Result of checking a stored roster file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyReport {
    pub version: u32,
    pub needs_migration: bool,
    pub owner: String,
    pub entries: usize,
    pub written_at: String,
}

fn file_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Normalize a document: migrate, then sanitize every record.
fn normalize(doc: RosterDocument) -> Result<RosterSnapshot> {
    let doc = migrate_document(doc).context("Failed to migrate roster document")?;
    Ok(sanitize_snapshot(doc.to_raw_snapshot(), &BoardConfig::default()))
}

fn write_snapshot(output: &Path, owner: &OwnerKey, snapshot: &RosterSnapshot, original_size: u64) -> Result<RosterMetadata> {
    let doc = RosterDocument::from_snapshot(owner, snapshot);
    FileGateway::write_document(output, &doc)
        .with_context(|| format!("Failed to write roster file: {}", output.display()))?;

    let bytes = fs::read(output).with_context(|| format!("Failed to read back: {}", output.display()))?;
    let compressed_size = bytes.len() as u64;

    Ok(RosterMetadata {
        owner: owner.to_string(),
        entries: snapshot.entries.len(),
        on_field: snapshot.entries.iter().filter(|e| e.is_on_field).count(),
        checksum: file_checksum(&bytes),
        created_at: chrono::Utc::now().to_rfc3339(),
        original_size,
        compressed_size,
        compression_ratio: if original_size == 0 { 0.0 } else { compressed_size as f64 / original_size as f64 },
    })
}

/// Build a roster file from JSON (full document or bare `{ "players": [...] }`).
pub fn import_roster(input_json: &Path, output: &Path, owner: &str) -> Result<RosterMetadata> {
    let json_str = fs::read_to_string(input_json)
        .with_context(|| format!("Failed to read JSON file: {}", input_json.display()))?;

    let owner = OwnerKey::new(owner);
    let doc = from_json(&json_str, &owner).context("Failed to parse roster JSON")?;
    let snapshot = normalize(doc)?;

    write_snapshot(output, &owner, &snapshot, json_str.len() as u64)
}

/// Write the default seven-a-side lineup for a new owner.
pub fn init_roster(output: &Path, owner: &str) -> Result<RosterMetadata> {
    let snapshot = sanitize_snapshot(starting_lineup(), &BoardConfig::default());
    let original_size = serde_json::to_string(&snapshot)?.len() as u64;
    write_snapshot(output, &OwnerKey::new(owner), &snapshot, original_size)
}

/// Dump a roster file as pretty JSON. Returns the number of entries written.
pub fn export_roster(input: &Path, output_json: &Path) -> Result<usize> {
    let doc = FileGateway::read_document(input)
        .with_context(|| format!("Failed to read roster file: {}", input.display()))?;
    let owner = OwnerKey::new(doc.owner.clone());
    let snapshot = normalize(doc)?;

    let json = to_json(&RosterDocument::from_snapshot(&owner, &snapshot))?;
    if let Some(parent) = output_json.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }
    fs::write(output_json, json).with_context(|| format!("Failed to write JSON file: {}", output_json.display()))?;

    Ok(snapshot.entries.len())
}

/// Checksum, decode and version check without migrating.
pub fn verify_roster(input: &Path) -> Result<VerifyReport> {
    let bytes = fs::read(input).with_context(|| format!("Failed to read roster file: {}", input.display()))?;
    let doc = decompress_and_deserialize(&bytes).context("Roster file failed verification")?;
    doc.validate().context("Roster document is invalid")?;

    Ok(VerifyReport {
        version: doc.version,
        needs_migration: needs_migration(&doc),
        owner: doc.owner.clone(),
        entries: doc.players.len(),
        written_at: lineup_core::save::format::format_timestamp(doc.timestamp),
    })
}

/// Load a roster file into a board displayed in `orientation`.
pub fn load_board(input: &Path, orientation: Orientation) -> Result<Board> {
    let doc = FileGateway::read_document(input)
        .with_context(|| format!("Failed to read roster file: {}", input.display()))?;
    let mut board = Board::from_snapshot(doc.to_raw_snapshot(), BoardConfig::default(), true);
    board.set_orientation(orientation);
    Ok(board)
}

/// Text rendering: grouped roster lists followed by field markers.
pub fn render_board(board: &Board) -> String {
    let mut out = String::new();

    for (title, filter) in
        [("On field", ListFilter::OnField), ("Match squad", ListFilter::MatchSquad), ("General pool", ListFilter::GeneralPool)]
    {
        let _ = writeln!(out, "{}", title);
        for bucket in board.store().grouped(filter) {
            if bucket.entries.is_empty() {
                continue;
            }
            let _ = writeln!(out, "  {}", bucket.group.label());
            for e in bucket.entries {
                let lock = if e.is_locked { " [locked]" } else { "" };
                let _ = writeln!(out, "    #{:<3} {:<20} {}{}", e.number, e.display_name, e.role.code(), lock);
            }
        }
    }

    let _ = writeln!(out, "Markers ({:?})", board.orientation());
    for m in board.visual_positions() {
        let _ = writeln!(out, "  {:<20} ({:>6.2}, {:>6.2})  {}", m.name, m.visual.x, m.visual.y, m.color);
    }

    out
}
