//! Ownership annotation for ad summaries

use uuid::Uuid;

use crate::middleware::AuthUser;

/// Decide the `is_owner` flag for one ad.
///
/// Anonymous callers get `None` so the field is left out of the response;
/// authenticated callers always get a definite answer.
pub fn resolve_is_owner(viewer: Option<&AuthUser>, owner: Uuid) -> Option<bool> {
    viewer.map(|user| user.id == owner)
}
