//! Directory-backed PDF storage
//!
//! [`FileStore`] maps a [`LogicalAddress`] onto a file under a single storage root and reads
//! files back by path. The directory tree is the only index: nothing else is persisted.
//!
//! # Write model
//!
//! A store writes the payload to a uniquely named temporary file next to its target and then
//! renames it into place. Readers therefore see either the previous object or the new one.
//! Concurrent stores to the same address are last-writer-wins; no locking is performed.
//!
//! # Security Model
//!
//! - The root is canonicalised once, at construction
//! - Every caller-supplied component is a validated [`PathSegment`], so joined paths cannot
//!   climb out of the root
//! - Retrieval applies the same segment rules to the request path

use crate::address::{LogicalAddress, StoreRequest};
use crate::constants::TEMP_FILE_PREFIX;
use crate::FilesError;
use pdfstore_types::PathSegment;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of a successful store.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct StoredLocation {
    /// Location string, usable as a retrieve path: `/folder1/folder2/folder3/name.pdf`
    pub location: String,

    /// Number of bytes written
    pub size_bytes: u64,
}

/// Store and retrieve PDFs under a fixed storage root.
///
/// Cloning is cheap; all clones share the same root.
#[derive(Debug, Clone)]
pub struct FileStore {
    root_directory: Arc<PathBuf>,
}

impl FileStore {
    /// Opens a store rooted at `root_directory`, creating it and any missing ancestors.
    ///
    /// # Errors
    ///
    /// Returns `FilesError` if:
    /// - the path exists but is not a directory
    /// - the directory cannot be created
    /// - path canonicalisation fails
    pub fn new(root_directory: &Path) -> Result<Self, FilesError> {
        if root_directory.exists() && !root_directory.is_dir() {
            return Err(FilesError::InvalidRootDirectory(format!(
                "Path is not a directory: {}",
                root_directory.display()
            )));
        }

        fs::create_dir_all(root_directory).map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot create directory {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        let root_directory = root_directory.canonicalize().map_err(|e| {
            FilesError::InvalidRootDirectory(format!(
                "Cannot canonicalize path {}: {}",
                root_directory.display(),
                e
            ))
        })?;

        Ok(Self {
            root_directory: Arc::new(root_directory),
        })
    }

    /// Returns the canonical storage root.
    #[must_use]
    pub fn root_directory(&self) -> &Path {
        &self.root_directory
    }

    /// Validates `request` and writes its payload to the address it names.
    ///
    /// The target directory `<root>/folder1/folder2/folder3` is created if needed and an
    /// existing file at the same address is replaced.
    ///
    /// # Errors
    ///
    /// Validation failures are reported before anything touches the filesystem (see
    /// [`StoreRequest::validate`]). Directory creation, write, or rename failures are returned
    /// as `FilesError::Io`.
    pub fn store(&self, request: StoreRequest) -> Result<StoredLocation, FilesError> {
        let (address, payload) = request.validate()?;
        self.store_at(&address, &payload)
    }

    /// Writes `payload` to an already validated address.
    pub fn store_at(
        &self,
        address: &LogicalAddress,
        payload: &[u8],
    ) -> Result<StoredLocation, FilesError> {
        let target_dir = self.root_directory.join(address.relative_dir());
        fs::create_dir_all(&target_dir).map_err(|e| {
            FilesError::Io(std::io::Error::new(
                e.kind(),
                format!(
                    "Failed to create storage directory {}: {}",
                    target_dir.display(),
                    e
                ),
            ))
        })?;

        let target = target_dir.join(address.stored_file_name());
        write_replace(&target_dir, &target, payload)?;

        let location = address.location();
        tracing::info!(%location, size_bytes = payload.len(), "stored file");

        Ok(StoredLocation {
            location,
            size_bytes: payload.len() as u64,
        })
    }

    /// Reads the whole file at `request_path` into memory.
    ///
    /// `request_path` is an already percent-decoded path relative to the storage root. A
    /// leading `/` and repeated slashes are tolerated.
    ///
    /// # Errors
    ///
    /// - `FilesError::InvalidPath` if a component is `.`/`..` or otherwise unsafe
    /// - `FilesError::NotFound` if nothing is stored there, the path names a directory, or it
    ///   continues below a stored file
    /// - `FilesError::Io` for any other read failure
    pub fn retrieve(&self, request_path: &str) -> Result<Vec<u8>, FilesError> {
        let relative = resolve_request_path(request_path)?;
        if relative.as_os_str().is_empty() {
            return Err(FilesError::NotFound(request_path.to_owned()));
        }

        let path = self.root_directory.join(&relative);
        match fs::read(&path) {
            Ok(bytes) => Ok(bytes),
            Err(e)
                if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory)
                    || path.is_dir() =>
            {
                Err(FilesError::NotFound(request_path.to_owned()))
            }
            Err(e) => Err(FilesError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read file from {}: {}", path.display(), e),
            ))),
        }
    }
}

/// Splits a request path into validated segments and joins them into a relative path.
fn resolve_request_path(request_path: &str) -> Result<PathBuf, FilesError> {
    let mut relative = PathBuf::new();
    for part in request_path.split('/').filter(|part| !part.is_empty()) {
        let segment = PathSegment::new(part).map_err(|e| {
            tracing::debug!(error = %e, "rejected retrieve path");
            FilesError::InvalidPath("Invalid path.".into())
        })?;
        relative.push(segment.as_str());
    }
    Ok(relative)
}

/// Writes `payload` to a fresh temporary file in `dir` and renames it over `target`.
fn write_replace(dir: &Path, target: &Path, payload: &[u8]) -> Result<(), FilesError> {
    let temp_path = dir.join(format!(
        "{}{}",
        TEMP_FILE_PREFIX,
        uuid::Uuid::new_v4().simple()
    ));

    let result = fs::File::create_new(&temp_path)
        .and_then(|mut file| {
            file.write_all(payload)?;
            file.sync_all()
        })
        .and_then(|()| fs::rename(&temp_path, target));

    result.map_err(|e| {
        if let Err(cleanup) = fs::remove_file(&temp_path) {
            if cleanup.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    path = %temp_path.display(),
                    error = %cleanup,
                    "failed to remove temporary upload file"
                );
            }
        }
        FilesError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write file to {}: {}", target.display(), e),
        ))
    })
}
