//! Validated path components shared across the PDF store crates.

/// Errors that can occur when creating a [`PathSegment`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input cannot be used as a single path component
    #[error("{0}")]
    InvalidSegment(String),
}

/// A single component of a storage path.
///
/// The input is kept verbatim: a segment names a directory or file on disk, and trimming it
/// would store the object somewhere other than where the caller asked. Construction rejects
/// anything that could escape the directory it is joined onto.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment(String);

impl PathSegment {
    /// Creates a new `PathSegment`.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the input is empty or whitespace-only, and
    /// `TextError::InvalidSegment` if it is `.` or `..`, or contains `/`, `\` or NUL.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let input = input.as_ref();
        if input.trim().is_empty() {
            return Err(TextError::Empty);
        }

        if input == "." || input == ".." {
            return Err(TextError::InvalidSegment(format!(
                "'{input}' is a relative directory reference"
            )));
        }

        if let Some(c) = input.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
            return Err(TextError::InvalidSegment(format!(
                "'{}' contains the reserved character {:?}",
                input.escape_default(),
                c
            )));
        }

        Ok(Self(input.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PathSegment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for PathSegment {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl serde::Serialize for PathSegment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for PathSegment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PathSegment::new(&s).map_err(serde::de::Error::custom)
    }
}
