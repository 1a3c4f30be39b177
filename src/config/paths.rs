//! Canonical paths for brainlink state.
//!
//! Single source of truth - import this instead of hardcoding paths.

use std::path::PathBuf;

use anyhow::Result;

/// Route prefix under which the web client serves shared collections
pub const SHARE_PATH_PREFIX: &str = "/share/";

/// Session token file name inside the brainlink home
pub const TOKEN_FILE_NAME: &str = "token";

/// Get the brainlink home directory (~/.brainlink)
pub fn brainlink_home() -> Result<PathBuf> {
    crate::config::brainlink_home()
}

/// Get the session token file (~/.brainlink/token)
pub fn token_file() -> Result<PathBuf> {
    Ok(brainlink_home()?.join(TOKEN_FILE_NAME))
}
