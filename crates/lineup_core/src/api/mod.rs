pub mod board_json;

pub use board_json::{execute, handle_command_json, ApiError, ApiResponse, BoardCommand, API_VERSION};
