pub mod access;
pub mod roster;

pub use access::{share_link, AccessContext, OwnerKey};
pub use roster::{
    AmbientConfig, EntryId, EntryPatch, NewEntry, RawEntry, RawSnapshot, RoleCategory, RoleGroup, RosterEntry,
    RosterSnapshot, DEFAULT_KEEPER_COLOR, DEFAULT_TEAM_COLOR,
};
