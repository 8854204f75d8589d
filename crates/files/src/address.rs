//! Logical addresses and the normalised store input.
//!
//! A [`LogicalAddress`] is the four-part key `(folder1, folder2, folder3, file_name)`. Its
//! on-disk location is a pure function of the key; there is no separate index:
//!
//! ```text
//! <storage_root>/
//! └── <folder1>/
//!     └── <folder2>/
//!         └── <folder3>/
//!             └── <file_name>.pdf
//! ```

use crate::constants::{MISSING_FIELDS_MESSAGE, ONLY_PDF_MESSAGE, PDF_EXTENSION, PDF_MEDIA_TYPE};
use crate::FilesError;
use pdfstore_types::{PathSegment, TextError};
use std::path::PathBuf;

/// Upload input after transport decoding.
///
/// Both HTTP upload shapes (multipart form and raw binary body) and the CLI build one of these
/// and hand it to [`crate::FileStore::store`]. Every field is optional so that "missing" is
/// decided in one place, by [`StoreRequest::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreRequest {
    pub folder1: Option<String>,
    pub folder2: Option<String>,
    pub folder3: Option<String>,
    pub file_name: Option<String>,
    pub payload: Option<Vec<u8>>,
    pub media_type: Option<String>,
}

impl StoreRequest {
    /// Validates the request and splits it into an address and the payload bytes.
    ///
    /// Checks run in a fixed order: required fields first, then the declared media type, then
    /// path-segment safety. Payload bytes are never inspected.
    ///
    /// # Errors
    ///
    /// - `FilesError::MissingFields` if any address field is absent or blank, or the payload is
    ///   absent or empty
    /// - `FilesError::UnsupportedMediaType` if the declared type is not `application/pdf`
    /// - `FilesError::InvalidPath` if an address field cannot be used as a path component
    pub fn validate(self) -> Result<(LogicalAddress, Vec<u8>), FilesError> {
        let (Some(folder1), Some(folder2), Some(folder3), Some(file_name), Some(payload)) = (
            present(self.folder1),
            present(self.folder2),
            present(self.folder3),
            present(self.file_name),
            self.payload.filter(|bytes| !bytes.is_empty()),
        ) else {
            return Err(FilesError::MissingFields(MISSING_FIELDS_MESSAGE.into()));
        };

        let declared = self.media_type.unwrap_or_default();
        if !is_pdf_media_type(&declared) {
            return Err(FilesError::UnsupportedMediaType(ONLY_PDF_MESSAGE.into()));
        }

        let address = LogicalAddress::new(&folder1, &folder2, &folder3, &file_name)?;
        Ok((address, payload))
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Returns `true` if `declared` names `application/pdf`.
///
/// The comparison is on the essence only: case-insensitive, parameters ignored.
pub fn is_pdf_media_type(declared: &str) -> bool {
    let essence = declared.split(';').next().unwrap_or_default().trim();
    essence.eq_ignore_ascii_case(PDF_MEDIA_TYPE)
}

/// The four-part key identifying a stored PDF.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogicalAddress {
    folder1: PathSegment,
    folder2: PathSegment,
    folder3: PathSegment,
    file_name: PathSegment,
}

impl LogicalAddress {
    /// Builds an address from raw segment strings.
    ///
    /// # Errors
    ///
    /// Returns `FilesError::MissingFields` for a blank segment and `FilesError::InvalidPath`
    /// for one that is `.`/`..` or contains a path separator.
    pub fn new(
        folder1: &str,
        folder2: &str,
        folder3: &str,
        file_name: &str,
    ) -> Result<Self, FilesError> {
        Ok(Self {
            folder1: segment(folder1)?,
            folder2: segment(folder2)?,
            folder3: segment(folder3)?,
            file_name: segment(file_name)?,
        })
    }

    pub fn folder1(&self) -> &PathSegment {
        &self.folder1
    }

    pub fn folder2(&self) -> &PathSegment {
        &self.folder2
    }

    pub fn folder3(&self) -> &PathSegment {
        &self.folder3
    }

    pub fn file_name(&self) -> &PathSegment {
        &self.file_name
    }

    /// Directory holding the object, relative to the storage root.
    pub fn relative_dir(&self) -> PathBuf {
        [&self.folder1, &self.folder2, &self.folder3]
            .iter()
            .map(|s| s.as_str())
            .collect()
    }

    /// Stored file name, `<file_name>.pdf`.
    ///
    /// The extension is always appended, so `report.pdf` is stored as `report.pdf.pdf`.
    pub fn stored_file_name(&self) -> String {
        format!("{}.{}", self.file_name, PDF_EXTENSION)
    }

    /// Path of the object relative to the storage root.
    pub fn relative_path(&self) -> PathBuf {
        self.relative_dir().join(self.stored_file_name())
    }

    /// Location string returned to callers and accepted by retrieve.
    ///
    /// Format: `/folder1/folder2/folder3/file_name.pdf`
    pub fn location(&self) -> String {
        format!(
            "/{}/{}/{}/{}",
            self.folder1,
            self.folder2,
            self.folder3,
            self.stored_file_name()
        )
    }
}

fn segment(raw: &str) -> Result<PathSegment, FilesError> {
    PathSegment::new(raw).map_err(|e| match e {
        TextError::Empty => FilesError::MissingFields(MISSING_FIELDS_MESSAGE.into()),
        TextError::InvalidSegment(reason) => {
            FilesError::InvalidPath(format!("Invalid path segment: {reason}"))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_request() -> StoreRequest {
        StoreRequest {
            folder1: Some("acct123".into()),
            folder2: Some("2024".into()),
            folder3: Some("invoices".into()),
            file_name: Some("inv-001".into()),
            payload: Some(b"%PDF-1.7".to_vec()),
            media_type: Some("application/pdf".into()),
        }
    }

    #[test]
    fn test_location_format() {
        let address = LogicalAddress::new("acct123", "2024", "invoices", "inv-001").unwrap();
        assert_eq!(address.location(), "/acct123/2024/invoices/inv-001.pdf");
        assert_eq!(
            address.relative_path(),
            PathBuf::from("acct123/2024/invoices/inv-001.pdf")
        );
        assert_eq!(address.relative_dir(), PathBuf::from("acct123/2024/invoices"));
    }

    #[test]
    fn test_extension_always_appended() {
        let address = LogicalAddress::new("a", "b", "c", "report.pdf").unwrap();
        assert_eq!(address.stored_file_name(), "report.pdf.pdf");
    }

    #[test]
    fn test_validate_complete_request() {
        let (address, payload) = complete_request().validate().unwrap();
        assert_eq!(address.folder1().as_str(), "acct123");
        assert_eq!(address.file_name().as_str(), "inv-001");
        assert_eq!(payload, b"%PDF-1.7");
    }

    #[test]
    fn test_validate_each_missing_field() {
        let strip: [fn(&mut StoreRequest); 5] = [
            |r| r.folder1 = None,
            |r| r.folder2 = None,
            |r| r.folder3 = None,
            |r| r.file_name = None,
            |r| r.payload = None,
        ];

        for clear in strip {
            let mut request = complete_request();
            clear(&mut request);
            assert!(matches!(
                request.validate(),
                Err(FilesError::MissingFields(_))
            ));
        }
    }

    #[test]
    fn test_validate_blank_and_empty_count_as_missing() {
        let mut request = complete_request();
        request.folder2 = Some("   ".into());
        assert!(matches!(
            request.validate(),
            Err(FilesError::MissingFields(_))
        ));

        let mut request = complete_request();
        request.payload = Some(Vec::new());
        assert!(matches!(
            request.validate(),
            Err(FilesError::MissingFields(_))
        ));
    }

    #[test]
    fn test_missing_fields_checked_before_media_type() {
        let mut request = complete_request();
        request.file_name = None;
        request.media_type = Some("text/plain".into());
        assert!(matches!(
            request.validate(),
            Err(FilesError::MissingFields(_))
        ));
    }

    #[test]
    fn test_media_type_checked_before_segments() {
        let mut request = complete_request();
        request.folder1 = Some("..".into());
        request.media_type = Some("text/plain".into());
        assert!(matches!(
            request.validate(),
            Err(FilesError::UnsupportedMediaType(_))
        ));
    }

    #[test]
    fn test_validate_rejects_wrong_media_type() {
        for declared in [None, Some("text/plain"), Some("application/pdfx"), Some("")] {
            let mut request = complete_request();
            request.media_type = declared.map(str::to_owned);
            let err = request.validate().unwrap_err();
            assert!(matches!(err, FilesError::UnsupportedMediaType(_)));
            assert_eq!(err.to_string(), "Only PDF files are allowed.");
        }
    }

    #[test]
    fn test_validate_rejects_traversal() {
        let mut request = complete_request();
        request.folder3 = Some("../../etc".into());
        assert!(matches!(request.validate(), Err(FilesError::InvalidPath(_))));

        let mut request = complete_request();
        request.file_name = Some("..".into());
        assert!(matches!(request.validate(), Err(FilesError::InvalidPath(_))));
    }

    #[test]
    fn test_is_pdf_media_type() {
        assert!(is_pdf_media_type("application/pdf"));
        assert!(is_pdf_media_type("Application/PDF"));
        assert!(is_pdf_media_type("application/pdf; charset=binary"));
        assert!(!is_pdf_media_type("application/octet-stream"));
        assert!(!is_pdf_media_type("text/plain"));
    }
}
