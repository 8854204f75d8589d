//! PDF File Storage
//!
//! This crate stores PDF uploads in a three-level folder hierarchy under a single storage root
//! and serves them back by path.
//!
//! ## Storage Model
//!
//! - An object's location is a pure function of its four-part address
//! - The directory tree is the index; there is no metadata store
//! - A second store at the same address replaces the first
//! - The declared media type is trusted; payload bytes are not inspected
//!
//! ```text
//! <storage_root>/
//! └── acct123/
//!     └── 2024/
//!         └── invoices/
//!             └── inv-001.pdf
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use pdfstore_files::{FileStore, StoreRequest};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = FileStore::new(Path::new("storage"))?;
//!
//! let stored = store.store(StoreRequest {
//!     folder1: Some("acct123".into()),
//!     folder2: Some("2024".into()),
//!     folder3: Some("invoices".into()),
//!     file_name: Some("inv-001".into()),
//!     payload: Some(std::fs::read("inv-001.pdf")?),
//!     media_type: Some("application/pdf".into()),
//! })?;
//!
//! let bytes = store.retrieve(&stored.location)?;
//! # Ok(())
//! # }
//! ```

mod address;
mod constants;
mod files;

pub use address::{is_pdf_media_type, LogicalAddress, StoreRequest};
pub use constants::{PDF_EXTENSION, PDF_MEDIA_TYPE};
pub use files::{FileStore, StoredLocation};

/// Errors that can occur during file operations
#[derive(Debug, thiserror::Error)]
pub enum FilesError {
    /// A required field or the payload was absent or empty
    #[error("{0}")]
    MissingFields(String),

    /// The declared media type is not `application/pdf`
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// Path validation failed (directory traversal or unsafe segment)
    #[error("{0}")]
    InvalidPath(String),

    /// Nothing is stored at the requested path
    #[error("File not found: {0}")]
    NotFound(String),

    /// Root directory is not a directory or could not be created
    #[error("Invalid root directory: {0}")]
    InvalidRootDirectory(String),

    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Caller-facing classification of a [`FilesError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller input was missing or malformed; safe to report verbatim
    Validation,
    /// The requested object does not exist
    NotFound,
    /// Unexpected I/O or filesystem failure; details stay server-side
    Internal,
}

impl FilesError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FilesError::MissingFields(_)
            | FilesError::UnsupportedMediaType(_)
            | FilesError::InvalidPath(_) => ErrorKind::Validation,
            FilesError::NotFound(_) => ErrorKind::NotFound,
            FilesError::InvalidRootDirectory(_) | FilesError::Io(_) => ErrorKind::Internal,
        }
    }
}
