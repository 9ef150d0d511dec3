// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Structured failure events handed back to the caller's logging sink.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use einlass_core::error::{EinlassError, TransformError};
use einlass_core::human_errors::{ErrorClass, humanize_error, humanize_transform_error};
use einlass_core::types::RequestId;

/// One failed batch item, ready to be logged or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEvent {
    pub request_id: RequestId,
    /// Position of the item in the submitted batch.
    pub index: usize,
    /// Original file name of the item.
    pub input: String,
    /// Extractor family (`pdf`, `word`, ...) or output format (`webp`, ...),
    /// when known.
    pub format: Option<String>,
    pub cause: String,
    pub class: ErrorClass,
    pub retriable: bool,
    pub occurred_at: DateTime<Utc>,
}

impl FailureEvent {
    pub fn from_extraction(request_id: RequestId, index: usize, input: &str, err: &EinlassError) -> Self {
        let human = humanize_error(err);
        let format = match err {
            EinlassError::Extraction { format, .. } => Some(format.family().to_owned()),
            _ => None,
        };
        Self {
            request_id,
            index,
            input: input.to_owned(),
            format,
            cause: err.to_string(),
            class: human.class,
            retriable: human.retriable,
            occurred_at: Utc::now(),
        }
    }

    pub fn from_transform(
        request_id: RequestId,
        index: usize,
        input: &str,
        output_format: &str,
        err: &TransformError,
    ) -> Self {
        let human = humanize_transform_error(err);
        Self {
            request_id,
            index,
            input: input.to_owned(),
            format: Some(output_format.to_owned()),
            cause: err.reason(),
            class: human.class,
            retriable: human.retriable,
            occurred_at: Utc::now(),
        }
    }
}
