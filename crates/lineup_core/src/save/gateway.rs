//! Persistence gateways.
//!
//! A gateway stores one roster document per owner and pushes full
//! replacements to subscribers. Two adapters ship with the crate:
//! - [`FileGateway`]: one compressed document per owner on disk
//! - [`MemoryGateway`]: in-process store with live push to every subscriber

use std::collections::HashMap;
use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};

use super::error::PersistenceError;
use super::format::{decompress_and_deserialize, serialize_and_compress, RosterDocument};
use super::migration::migrate_document;
use crate::models::access::OwnerKey;
use crate::models::roster::{RawSnapshot, RosterSnapshot};

/// Boundary to whatever stores roster documents.
pub trait PersistenceGateway {
    /// Subscribe to `owner`'s roster. Each emission is a full replacement.
    fn load(&mut self, owner: &OwnerKey) -> Result<Subscription, PersistenceError>;

    /// Overwrite `owner`'s roster.
    fn save(&mut self, owner: &OwnerKey, snapshot: &RosterSnapshot) -> Result<(), PersistenceError>;
}

/// Push-based stream of raw snapshots for one owner.
#[derive(Debug)]
pub struct Subscription {
    owner: OwnerKey,
    rx: Receiver<RawSnapshot>,
    closed: bool,
}

impl Subscription {
    pub(crate) fn new(owner: OwnerKey, rx: Receiver<RawSnapshot>) -> Self {
        Self { owner, rx, closed: false }
    }

    pub fn owner(&self) -> &OwnerKey {
        &self.owner
    }

    /// Next pending emission, if any.
    pub fn try_next(&mut self) -> Option<RawSnapshot> {
        match self.rx.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.closed = true;
                None
            }
        }
    }

    /// Drain everything pending and keep only the newest emission.
    pub fn latest(&mut self) -> Option<(RawSnapshot, usize)> {
        let mut latest = None;
        let mut count = 0;
        while let Some(snapshot) = self.try_next() {
            latest = Some(snapshot);
            count += 1;
        }
        latest.map(|s| (s, count))
    }

    /// The gateway will never emit again.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

fn validate_owner(owner: &OwnerKey) -> Result<(), PersistenceError> {
    let key = owner.as_str();
    let ok = !key.is_empty()
        && key.len() <= 128
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(PersistenceError::InvalidOwner { key: key.to_string() })
    }
}

/// One `<owner>.roster` file per owner under a root directory.
#[derive(Debug, Clone)]
pub struct FileGateway {
    root: PathBuf,
}

impl FileGateway {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, owner: &OwnerKey) -> Result<PathBuf, PersistenceError> {
        validate_owner(owner)?;
        Ok(self.root.join(format!("{}.roster", owner)))
    }

    pub fn exists(&self, owner: &OwnerKey) -> bool {
        self.path_for(owner).map(|p| p.exists()).unwrap_or(false)
    }

    /// Read, verify and migrate a stored document.
    pub fn read_document(path: &Path) -> Result<RosterDocument, PersistenceError> {
        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let doc = migrate_document(decompress_and_deserialize(&data)?)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(doc)
    }

    /// Atomic write: temp file, fsync, rename.
    pub fn write_document(path: &Path, doc: &RosterDocument) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let data = serialize_and_compress(doc)?;
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }

        rename(&temp_path, path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }
}

impl PersistenceGateway for FileGateway {
    /// Emits the stored document once, then closes. A missing file emits nothing.
    fn load(&mut self, owner: &OwnerKey) -> Result<Subscription, PersistenceError> {
        let path = self.path_for(owner)?;
        let (tx, rx) = channel();

        if path.exists() {
            let doc = Self::read_document(&path)?;
            // Receiver is alive in this scope.
            let _ = tx.send(doc.to_raw_snapshot());
            log::info!("Roster for {} loaded ({} entries)", owner, doc.players.len());
        } else {
            log::info!("No stored roster for {}", owner);
        }

        Ok(Subscription::new(owner.clone(), rx))
    }

    fn save(&mut self, owner: &OwnerKey, snapshot: &RosterSnapshot) -> Result<(), PersistenceError> {
        let path = self.path_for(owner)?;
        let doc = RosterDocument::from_snapshot(owner, snapshot);
        Self::write_document(&path, &doc)?;
        log::info!("Roster for {} saved ({} entries)", owner, doc.players.len());
        Ok(())
    }
}

/// In-process gateway with live subscriptions.
///
/// Every successful `save` is pushed to all open subscriptions of that owner,
/// including the saver's own (last write wins).
#[derive(Debug, Default)]
pub struct MemoryGateway {
    documents: HashMap<OwnerKey, RosterDocument>,
    subscribers: HashMap<OwnerKey, Vec<Sender<RawSnapshot>>>,
    offline: bool,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate losing the backend: saves fail until switched back.
    pub fn set_offline(&mut self, offline: bool) {
        self.offline = offline;
    }

    pub fn document(&self, owner: &OwnerKey) -> Option<&RosterDocument> {
        self.documents.get(owner)
    }

    /// Write a raw document as another device would, then fan it out.
    pub fn push_external(&mut self, owner: &OwnerKey, raw: RawSnapshot) {
        let mut doc = RosterDocument::new(owner);
        doc.players = raw.players;
        doc.team_color = raw.team_color;
        doc.keeper_color = raw.keeper_color;
        self.store(owner, doc);
    }

    fn store(&mut self, owner: &OwnerKey, doc: RosterDocument) {
        let raw = doc.to_raw_snapshot();
        self.documents.insert(owner.clone(), doc);

        if let Some(senders) = self.subscribers.get_mut(owner) {
            senders.retain(|tx| tx.send(raw.clone()).is_ok());
            log::debug!("Pushed roster for {} to {} subscriber(s)", owner, senders.len());
        }
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load(&mut self, owner: &OwnerKey) -> Result<Subscription, PersistenceError> {
        validate_owner(owner)?;
        let (tx, rx) = channel();

        if let Some(doc) = self.documents.get(owner) {
            let _ = tx.send(doc.to_raw_snapshot());
        }
        self.subscribers.entry(owner.clone()).or_default().push(tx);

        Ok(Subscription::new(owner.clone(), rx))
    }

    fn save(&mut self, owner: &OwnerKey, snapshot: &RosterSnapshot) -> Result<(), PersistenceError> {
        validate_owner(owner)?;
        if self.offline {
            log::warn!("Save for {} rejected: backend offline", owner);
            return Err(PersistenceError::Unavailable { reason: "backend offline".to_string() });
        }

        let doc = RosterDocument::from_snapshot(owner, snapshot);
        doc.validate()?;
        self.store(owner, doc);
        Ok(())
    }
}
