use chrono::{DateTime, Utc};
use uuid::Uuid;

/// What a given viewer may see and do on a story at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewerFlags {
    pub is_owner: bool,
    pub is_expired: bool,
    pub can_guess: bool,
    pub can_view: bool,
}

/// Pure derivation of the viewer's permissions. Recomputed on every read;
/// never cached, since `now` advances between requests.
pub fn derive_flags(
    now: DateTime<Utc>,
    viewer_id: Uuid,
    owner_id: Uuid,
    expires_at: DateTime<Utc>,
    has_guess: bool,
) -> ViewerFlags {
    let is_owner = viewer_id == owner_id;
    let is_expired = now > expires_at;
    ViewerFlags {
        is_owner,
        is_expired,
        can_guess: !is_owner && !is_expired && !has_guess,
        // row-level read access is granted upstream; reaching the policy
        // means the viewer may see the story
        can_view: true,
    }
}

/// Expiry is computed against the wall clock, never stored as a status flag.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expires_at
}

/// Stats (and the answer country) are only visible to the owner, or to
/// anyone once the round is over.
pub fn stats_visible(flags: &ViewerFlags) -> bool {
    flags.is_owner || flags.is_expired
}
