//! Photo proof attachments for mark-taken actions.

use crate::config::PhotoConfig;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Copy an image into `photos_dir` under a fresh name and return the stored path.
///
/// The source must carry one of the configured image extensions and be no
/// larger than `config.max_bytes`.
pub fn attach_photo(photos_dir: &Path, source: &Path, config: &PhotoConfig) -> Result<PathBuf> {
    let ext = source
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| {
            Error::Validation(format!("{} has no image extension", source.display()))
        })?;

    if !config
        .allowed_extensions
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(&ext))
    {
        return Err(Error::Validation(format!(
            "Unsupported photo type '.{}' (allowed: {})",
            ext,
            config.allowed_extensions.join(", ")
        )));
    }

    let size = std::fs::metadata(source)?.len();
    if size > config.max_bytes {
        return Err(Error::Validation(format!(
            "Photo is {} bytes, limit is {}",
            size, config.max_bytes
        )));
    }

    std::fs::create_dir_all(photos_dir)?;
    let dest = photos_dir.join(format!("{}.{}", Uuid::new_v4(), ext));
    std::fs::copy(source, &dest)?;

    tracing::info!("Stored photo proof {:?}", dest);
    Ok(dest)
}
