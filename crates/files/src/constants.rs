/// Media type every stored object must be declared as.
pub const PDF_MEDIA_TYPE: &str = "application/pdf";

/// Extension appended to the caller-supplied file name.
pub const PDF_EXTENSION: &str = "pdf";

/// Prefix of the temporary files a store writes before renaming into place.
pub(crate) const TEMP_FILE_PREFIX: &str = ".upload-";

pub(crate) const MISSING_FIELDS_MESSAGE: &str =
    "Missing required fields (file, folder1, folder2, folder3, fileName).";

pub(crate) const ONLY_PDF_MESSAGE: &str = "Only PDF files are allowed.";
