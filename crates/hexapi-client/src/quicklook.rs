//! Quicklook downloads
//!
//! A quicklook comes either from a search result feature or from a URL the
//! caller already has. [`ImageSource`] makes "both" impossible to express.

use crate::error::{ClientError, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where to take a quicklook URL from.
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a, F> {
    /// A search result feature carrying quicklook links.
    Feature(&'a F),
    /// A direct preview URL.
    Url(&'a str),
}

/// Write image bytes to a new, uniquely named `.jpg` file and keep it.
///
/// Written into `dir` when given, the system temp dir otherwise.
pub(crate) async fn write_image(bytes: &[u8], dir: Option<&Path>) -> Result<PathBuf> {
    let owned = bytes.to_vec();
    let dir = dir.map(Path::to_path_buf);
    let path = tokio::task::spawn_blocking(move || persist(&owned, dir.as_deref()))
        .await
        .map_err(|e| ClientError::Io(io::Error::other(e)))??;

    debug!(path = %path.display(), size = bytes.len(), "quicklook written");
    Ok(path)
}

/// The file is only kept once every byte is on disk; a failed write
/// removes it with the temp file.
fn persist(bytes: &[u8], dir: Option<&Path>) -> Result<PathBuf> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("hexapi-").suffix(".jpg");
    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    file.write_all(bytes)?;
    file.flush()?;

    let (_, path) = file.keep().map_err(|e| ClientError::Io(e.error))?;
    Ok(path)
}
