//! Browser profile directory housekeeping.

use crate::error::Result;
use std::path::Path;

/// Remove a browser profile (cache) directory so the next session starts clean.
///
/// Returns `true` if something was removed.
pub fn clear_profile_dir(dir: &Path) -> Result<bool> {
    if !dir.exists() {
        return Ok(false);
    }

    std::fs::remove_dir_all(dir)?;
    tracing::debug!(dir = %dir.display(), "browser profile directory cleared");
    Ok(true)
}
