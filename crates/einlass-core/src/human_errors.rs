// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Caller-facing error classification.
//
// The HTTP layer needs two things from every failure: whether it is the
// uploader's fault (4xx) or ours (5xx), and whether retrying can help. Each
// error is also given a plain message with a suggestion for the end user.

use serde::{Deserialize, Serialize};

use crate::error::{EinlassError, ExtractionCause, TransformError};

/// Who is at fault for an error, from the caller's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorClass {
    /// Bad upload: unsupported type, corrupt file, invalid parameters.
    ClientInput,
    /// Filesystem or environment hiccup that a retry may clear.
    Transient,
    /// Unexpected fault inside the pipeline.
    Internal,
}

impl ErrorClass {
    /// True when the caller should answer with a client error status.
    pub fn is_client_fault(self) -> bool {
        matches!(self, Self::ClientInput)
    }
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    pub message: String,
    pub suggestion: String,
    pub retriable: bool,
    pub class: ErrorClass,
}

/// Convert an `EinlassError` into a `HumanError`.
pub fn humanize_error(err: &EinlassError) -> HumanError {
    match err {
        EinlassError::UnsupportedFormat(media_type) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!(
                "Upload a PDF, Word, Excel or plain text document. (File type: {media_type})"
            ),
            retriable: false,
            class: ErrorClass::ClientInput,
        },

        EinlassError::InvalidRequest(detail) => HumanError {
            message: "The request options aren't valid.".into(),
            suggestion: format!("Check the options and try again. ({detail})"),
            retriable: false,
            class: ErrorClass::ClientInput,
        },

        EinlassError::Extraction { format, cause } => humanize_extraction(format.family(), cause),

        EinlassError::Staging { .. } => HumanError {
            message: "The server couldn't prepare working space for this file.".into(),
            suggestion: "Try again in a moment.".into(),
            retriable: true,
            class: ErrorClass::Transient,
        },

        EinlassError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "A required file couldn't be found.".into(),
                    suggestion: "Check the configured paths.".into(),
                    retriable: false,
                    class: ErrorClass::Internal,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    class: ErrorClass::Transient,
                }
            }
        }

        EinlassError::Serialization(_) => HumanError {
            message: "The configuration couldn't be read.".into(),
            suggestion: "Check the configuration file is valid JSON.".into(),
            retriable: false,
            class: ErrorClass::Internal,
        },
    }
}

fn humanize_extraction(family: &str, cause: &ExtractionCause) -> HumanError {
    match cause {
        ExtractionCause::Malformed(_) => HumanError {
            message: format!("This {family} file appears to be damaged."),
            suggestion: "Open it on a computer to check it works, or upload a different copy.".into(),
            retriable: false,
            class: ErrorClass::ClientInput,
        },
        ExtractionCause::Encrypted => HumanError {
            message: format!("This {family} file is password protected."),
            suggestion: "Remove the password and upload it again.".into(),
            retriable: false,
            class: ErrorClass::ClientInput,
        },
        ExtractionCause::Conversion(detail) => HumanError {
            message: format!("This older {family} file couldn't be converted."),
            suggestion: format!("Save it in the newer format and upload it again. ({detail})"),
            retriable: false,
            class: ErrorClass::ClientInput,
        },
        ExtractionCause::Internal(_) => HumanError {
            message: format!("Something went wrong while reading this {family} file."),
            suggestion: "Retrying won't help with the same file. Please report it.".into(),
            retriable: false,
            class: ErrorClass::Internal,
        },
    }
}

/// Classify a single batch item failure.
pub fn humanize_transform_error(err: &TransformError) -> HumanError {
    match err {
        TransformError::Decode(_) => HumanError {
            message: "This image couldn't be read.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try a PNG or JPEG.".into(),
            retriable: false,
            class: ErrorClass::ClientInput,
        },
        TransformError::Encode(_) => HumanError {
            message: "This image couldn't be converted.".into(),
            suggestion: "Try a different output format.".into(),
            retriable: false,
            class: ErrorClass::Internal,
        },
        TransformError::Store(_) => HumanError {
            message: "The converted image couldn't be saved.".into(),
            suggestion: "Try again in a moment.".into(),
            retriable: true,
            class: ErrorClass::Transient,
        },
        TransformError::Aborted(_) => HumanError {
            message: "Processing of this image was interrupted.".into(),
            suggestion: "Try again.".into(),
            retriable: true,
            class: ErrorClass::Internal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DocumentKind;

    #[test]
    fn unsupported_format_is_client_fault() {
        let human = humanize_error(&EinlassError::UnsupportedFormat("video/mp4".into()));
        assert!(human.class.is_client_fault());
        assert!(!human.retriable);
    }

    #[test]
    fn extraction_errors_are_not_retriable() {
        let malformed = humanize_error(&EinlassError::malformed(DocumentKind::Pdf, "eof"));
        assert_eq!(malformed.class, ErrorClass::ClientInput);
        assert!(!malformed.retriable);

        let internal = humanize_error(&EinlassError::Extraction {
            format: DocumentKind::Word,
            cause: ExtractionCause::Internal("panic".into()),
        });
        assert_eq!(internal.class, ErrorClass::Internal);
        assert!(!internal.retriable);
    }

    #[test]
    fn staging_failure_is_transient_server_fault() {
        let err = EinlassError::staging("write", std::io::Error::other("disk full"));
        let human = humanize_error(&err);
        assert_eq!(human.class, ErrorClass::Transient);
        assert!(!human.class.is_client_fault());
        assert!(human.retriable);
    }

    #[test]
    fn corrupt_batch_item_is_client_fault() {
        let human = humanize_transform_error(&TransformError::Decode("bad magic".into()));
        assert!(human.class.is_client_fault());
    }
}
