// Roster persistence
// MessagePack + LZ4 documents with checksums, ingress sanitization and gateways

pub mod error;
pub mod format;
pub mod gateway;
pub mod migration;
pub mod sanitize;

pub use error::PersistenceError;
pub use format::{decompress_and_deserialize, serialize_and_compress, RosterDocument};
pub use gateway::{FileGateway, MemoryGateway, PersistenceGateway, Subscription};
pub use migration::migrate_document;
pub use sanitize::{sanitize, sanitize_all, sanitize_snapshot, sanitize_with};

pub const DOCUMENT_VERSION: u32 = 1;
