use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::utils::{Error, MovieReorgResult};

/// Move `source` to `<folder>/<file_name>`, creating `folder` if needed.
///
/// Never overwrites: an occupied destination is `Error::DestinationExists`.
pub fn move_into_place(source: &Path, folder: &Path, file_name: &str) -> MovieReorgResult<PathBuf> {
    std::fs::create_dir_all(folder)?;

    let dest = folder.join(file_name);
    if dest.exists() {
        return Err(Error::DestinationExists(dest));
    }

    debug!("Moving '{}' -> '{}'", source.display(), dest.display());
    if let Err(e) = std::fs::rename(source, &dest) {
        // rename() cannot cross filesystems
        if e.kind() != std::io::ErrorKind::CrossesDevices {
            return Err(e.into());
        }
        warn!("Rename across devices failed ({}), copying instead: '{}'", e, dest.display());
        std::fs::copy(source, &dest)?;
        std::fs::remove_file(source)?;
    }

    Ok(dest)
}
