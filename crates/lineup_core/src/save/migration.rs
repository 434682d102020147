use super::error::PersistenceError;
use super::format::RosterDocument;
use super::DOCUMENT_VERSION;

/// Migrate a stored document to the current version
pub fn migrate_document(mut doc: RosterDocument) -> Result<RosterDocument, PersistenceError> {
    let original_version = doc.version;

    doc = match doc.version {
        0 => migrate_v0_to_v1(doc),
        1 => doc,
        v if v > DOCUMENT_VERSION => {
            // Newer writer; unknown fields are ignored by serde, keep going.
            log::warn!("Loading roster from future version {} (current: {})", v, DOCUMENT_VERSION);
            doc
        }
        _ => {
            return Err(PersistenceError::VersionMismatch { found: doc.version, expected: DOCUMENT_VERSION });
        }
    };

    if original_version < DOCUMENT_VERSION {
        doc.version = DOCUMENT_VERSION;
        log::info!("Migrated roster document from version {} to {}", original_version, DOCUMENT_VERSION);
    }

    Ok(doc)
}

/// Version 0 predates the bench: every stored player was on the field.
fn migrate_v0_to_v1(mut doc: RosterDocument) -> RosterDocument {
    log::info!("Migrating roster document from version 0 to 1");

    for player in &mut doc.players {
        if player.on_field.is_none() {
            player.on_field = Some(true);
        }
    }

    doc
}

/// Check if a document needs migration
pub fn needs_migration(doc: &RosterDocument) -> bool {
    doc.version < DOCUMENT_VERSION
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roster::RawEntry;

    fn v0_doc() -> RosterDocument {
        let mut doc = RosterDocument::new(&"o".into());
        doc.version = 0;
        doc.players.push(RawEntry { name: Some("GK".into()), ..Default::default() });
        doc.players.push(RawEntry { name: Some("SUB".into()), on_field: Some(false), ..Default::default() });
        doc
    }

    #[test]
    fn test_migrate_v0_to_v1() {
        let doc = v0_doc();
        assert!(needs_migration(&doc));

        let migrated = migrate_document(doc).unwrap();

        assert_eq!(migrated.version, 1);
        assert_eq!(migrated.players[0].on_field, Some(true));
        assert_eq!(migrated.players[1].on_field, Some(false));
    }

    #[test]
    fn test_no_migration_needed() {
        let doc = RosterDocument::new(&"o".into());
        let result = migrate_document(doc.clone()).unwrap();
        assert_eq!(result, doc);
    }

    #[test]
    fn test_future_version_warning() {
        let mut doc = RosterDocument::new(&"o".into());
        doc.version = 999;

        let result = migrate_document(doc).unwrap();
        assert_eq!(result.version, 999);
    }
}
