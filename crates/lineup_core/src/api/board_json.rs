//! JSON command boundary for a presentation host
//!
//! One request string in, one `ApiResponse` string out. The host never
//! touches the store directly; every command below maps to a single board
//! operation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::board::{Board, TEAM_PALETTE};
use crate::engine::coordinates::Orientation;
use crate::engine::drag::{DragOutcome, DropRequest};
use crate::error::BoardError;
use crate::models::roster::{EntryId, EntryPatch, NewEntry, RawSnapshot};
use crate::state::ListFilter;

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

/// Structured API error with codes and details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: None }
    }

    pub fn with_details(code: &str, message: &str, details: HashMap<String, Value>) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: Some(details) }
    }
}

impl From<&BoardError> for ApiError {
    fn from(err: &BoardError) -> Self {
        let code = match err {
            BoardError::InvalidComputation { .. } => "INVALID_COMPUTATION",
            BoardError::PermissionDenied(_) => "PERMISSION_DENIED",
            BoardError::MissingFieldSurface => "MISSING_FIELD_SURFACE",
            BoardError::NotFound(_) => "NOT_FOUND",
            BoardError::GestureInProgress => "GESTURE_IN_PROGRESS",
            BoardError::NoActiveGesture => "NO_ACTIVE_GESTURE",
            BoardError::Persistence(_) => "PERSISTENCE_ERROR",
            BoardError::InvalidConfig(_) => "INVALID_CONFIG",
            BoardError::RosterFull { .. } => "ROSTER_FULL",
        };
        ApiError::new(code, &err.to_string())
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, schema_version: API_VERSION.to_string(), timestamp: Utc::now() }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Commands accepted by [`handle_command_json`], tagged by `"command"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum BoardCommand {
    Add(NewEntry),
    Update { id: EntryId, patch: EntryPatch },
    Remove { id: EntryId },
    ToggleConfirm { id: EntryId },
    ToggleLock { id: EntryId },
    RemoveFromField { id: EntryId },
    SetOrientation { orientation: Orientation },
    SetTeamColor { color: String },
    SetKeeperColor { color: String },
    /// A complete drop recognized by the host.
    Drop(DropRequest),
    /// Externally pushed replacement.
    Replace(RawSnapshot),
    Snapshot,
    Grouped {
        #[serde(default)]
        filter: ListFilter,
    },
    Markers,
    Palette,
}

fn respond(result: Result<Value, ApiError>) -> String {
    let response: ApiResponse<Value> = match result {
        Ok(data) => ApiResponse::success(data),
        Err(err) => ApiResponse::error(err),
    };
    serde_json::to_string(&response).unwrap_or_else(|_| "{}".to_string())
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::new("SERIALIZATION_ERROR", &e.to_string()))
}

/// Execute one JSON command against `board`.
///
/// # Returns
/// JSON string containing `ApiResponse<Value>`
pub fn handle_command_json(board: &mut Board, request_json: &str) -> String {
    let command: BoardCommand = match serde_json::from_str(request_json) {
        Ok(cmd) => cmd,
        Err(e) => {
            error!("Failed to parse BoardCommand: {}", e);
            return respond(Err(ApiError::new("INVALID_JSON", &format!("Invalid JSON format: {}", e))));
        }
    };
    debug!(?command, "board command");
    respond(execute(board, command))
}

/// Typed entry point behind [`handle_command_json`].
pub fn execute(board: &mut Board, command: BoardCommand) -> Result<Value, ApiError> {
    let fail = |e: BoardError| {
        warn!("Board command rejected: {}", e);
        ApiError::from(&e)
    };

    match command {
        BoardCommand::Add(new) => {
            let id = board.add(new).map_err(fail)?;
            info!("Added roster entry {}", id);
            Ok(json!({ "id": id }))
        }
        BoardCommand::Update { id, patch } => {
            board.update(&id, &patch).map_err(fail)?;
            Ok(json!({ "id": id }))
        }
        BoardCommand::Remove { id } => {
            let removed = board.remove(&id).map_err(fail)?;
            to_value(&removed)
        }
        BoardCommand::ToggleConfirm { id } => {
            let confirmed = board.toggle_confirm(&id).map_err(fail)?;
            Ok(json!({ "id": id, "isConfirmed": confirmed }))
        }
        BoardCommand::ToggleLock { id } => {
            let locked = board.toggle_lock(&id).map_err(fail)?;
            Ok(json!({ "id": id, "locked": locked }))
        }
        BoardCommand::RemoveFromField { id } => {
            board.remove_from_field(&id).map_err(fail)?;
            Ok(json!({ "id": id }))
        }
        BoardCommand::SetOrientation { orientation } => {
            board.set_orientation(orientation);
            Ok(json!({ "orientation": orientation }))
        }
        BoardCommand::SetTeamColor { color } => {
            board.set_team_color(&color).map_err(fail)?;
            to_value(board.ambient())
        }
        BoardCommand::SetKeeperColor { color } => {
            board.set_keeper_color(&color).map_err(fail)?;
            to_value(board.ambient())
        }
        BoardCommand::Drop(request) => {
            let outcome = board.commit_drop(&request).map_err(fail)?;
            if let DragOutcome::Cancelled(reason) = &outcome {
                if let Some(err) = reason.to_error(&request.source) {
                    let mut details = HashMap::new();
                    details.insert("outcome".to_string(), to_value(&outcome)?);
                    let base = ApiError::from(&err);
                    return Err(ApiError::with_details(&base.code, &base.message, details));
                }
            }
            to_value(&outcome)
        }
        BoardCommand::Replace(raw) => {
            let cancelled = board.apply_remote(raw);
            Ok(json!({ "entries": board.store().len(), "cancelledGesture": cancelled.is_some() }))
        }
        BoardCommand::Snapshot => to_value(&board.snapshot()),
        BoardCommand::Grouped { filter } => {
            let buckets: Vec<Value> = board
                .store()
                .grouped(filter)
                .into_iter()
                .map(|b| json!({ "group": b.group, "label": b.group.label(), "entries": b.entries }))
                .collect();
            Ok(Value::Array(buckets))
        }
        BoardCommand::Markers => to_value(&board.visual_positions()),
        BoardCommand::Palette => {
            let palette: Vec<Value> =
                TEAM_PALETTE.iter().map(|(name, class)| json!({ "name": name, "class": class })).collect();
            Ok(Value::Array(palette))
        }
    }
}
