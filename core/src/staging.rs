// catalog_flow/src/staging.rs

//! Holding area for the image picked in the form, until the form is submitted.
//!
//! Staging holds either nothing or exactly one file plus the name it is uploaded under.

use thiserror::Error;

/// Content types the image picker accepts.
pub const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/jpg"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StagingError {
  #[error("unsupported image type '{content_type}' for '{file_name}'")]
  UnsupportedType { file_name: String, content_type: String },

  #[error("image '{file_name}' is empty")]
  EmptyFile { file_name: String },

  #[error("cannot change the image while a submission is in flight")]
  SubmissionInFlight,
}

/// A local file selected for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageFile {
  pub file_name: String,
  pub content_type: String,
  pub bytes: Vec<u8>,
}

impl ImageFile {
  pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
    Self {
      file_name: file_name.into(),
      content_type: content_type.into(),
      bytes,
    }
  }

  pub fn len(&self) -> usize {
    self.bytes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bytes.is_empty()
  }
}

// Keep image payloads out of logs.
impl std::fmt::Debug for ImageFile {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ImageFile")
      .field("file_name", &self.file_name)
      .field("content_type", &self.content_type)
      .field("len", &self.bytes.len())
      .finish()
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedImage {
  pub file: ImageFile,
  pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageStaging {
  pending: Option<StagedImage>,
}

impl ImageStaging {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stages `file`, replacing whatever was staged before.
  ///
  /// A blank `display_name` falls back to the file name. A refused file leaves the
  /// previous staging untouched.
  pub fn stage(&mut self, file: ImageFile, display_name: impl Into<String>) -> Result<(), StagingError> {
    let content_type = file.content_type.trim().to_ascii_lowercase();
    if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
      return Err(StagingError::UnsupportedType {
        file_name: file.file_name,
        content_type: file.content_type,
      });
    }
    if file.is_empty() {
      return Err(StagingError::EmptyFile {
        file_name: file.file_name,
      });
    }

    let display_name = display_name.into();
    let display_name = if display_name.trim().is_empty() {
      file.file_name.clone()
    } else {
      display_name.trim().to_string()
    };
    tracing::debug!(file_name = %file.file_name, %display_name, size = file.len(), "Image staged.");
    self.pending = Some(StagedImage { file, display_name });
    Ok(())
  }

  pub fn clear(&mut self) {
    self.pending = None;
  }

  pub fn is_empty(&self) -> bool {
    self.pending.is_none()
  }

  pub fn staged(&self) -> Option<&StagedImage> {
    self.pending.as_ref()
  }

  /// Name shown next to the file input; `None` reads as "no file selected".
  pub fn display_name(&self) -> Option<&str> {
    self.pending.as_ref().map(|s| s.display_name.as_str())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn png(name: &str) -> ImageFile {
    ImageFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
  }

  #[test]
  fn staging_replaces_the_previous_file() {
    let mut staging = ImageStaging::new();
    assert!(staging.is_empty());
    staging.stage(png("a.png"), "first").unwrap();
    staging.stage(png("b.png"), "second").unwrap();
    let staged = staging.staged().unwrap();
    assert_eq!(staged.file.file_name, "b.png");
    assert_eq!(staging.display_name(), Some("second"));
  }

  #[test]
  fn blank_display_name_falls_back_to_file_name() {
    let mut staging = ImageStaging::new();
    staging.stage(png("shoe.png"), "  ").unwrap();
    assert_eq!(staging.display_name(), Some("shoe.png"));
  }

  #[test]
  fn refused_file_keeps_prior_staging() {
    let mut staging = ImageStaging::new();
    staging.stage(png("keep.png"), "keep").unwrap();
    let err = staging
      .stage(ImageFile::new("doc.pdf", "application/pdf", vec![1]), "doc")
      .unwrap_err();
    assert!(matches!(err, StagingError::UnsupportedType { .. }));
    let err = staging.stage(ImageFile::new("e.jpg", "image/jpeg", vec![]), "e").unwrap_err();
    assert!(matches!(err, StagingError::EmptyFile { .. }));
    assert_eq!(staging.display_name(), Some("keep"));
  }

  #[test]
  fn content_type_check_ignores_case() {
    let mut staging = ImageStaging::new();
    staging.stage(ImageFile::new("a.jpg", "IMAGE/JPG", vec![1]), "a").unwrap();
    assert!(!staging.is_empty());
    staging.clear();
    assert!(staging.is_empty());
    assert_eq!(staging.display_name(), None);
  }
}
