// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch orchestrator — fans a batch out over tokio's blocking pool, bounded
// by a semaphore, and reassembles per-item outcomes by input index.
//
// Extraction and image transforms are CPU-bound and synchronous, so every
// item runs inside `spawn_blocking`. Results are written into the slot for
// their input index, never appended in arrival order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use einlass_core::IngestConfig;
use einlass_core::error::{EinlassError, ExtractionCause, Result, TransformError};
use einlass_core::types::{
    DocumentKind, ExtractedDocument, MediaBlob, RequestId, TransformKind, TransformRequest,
};
use einlass_document::{DocumentExtractor, TransformEngine, classify_document};

use crate::report::FailureEvent;
use crate::sink::{ArtifactRef, ArtifactSink, artifact_name};

/// Outcome for one input of a batch.
#[derive(Debug)]
pub struct ItemResult<T, E> {
    /// Position of the input in the submitted batch.
    pub index: usize,
    pub file_name: String,
    pub outcome: std::result::Result<T, E>,
}

impl<T, E> ItemResult<T, E> {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Result of a transform batch: exactly one item per input, in input order.
#[derive(Debug)]
pub struct TransformResult {
    pub request_id: RequestId,
    pub kind: TransformKind,
    pub items: Vec<ItemResult<ArtifactRef, TransformError>>,
}

impl TransformResult {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.is_ok()).count()
    }

    /// One event per failed item, in input order.
    pub fn failures(&self) -> Vec<FailureEvent> {
        let format = self.kind.output_format().extension();
        self.items
            .iter()
            .filter_map(|item| {
                let err = item.outcome.as_ref().err()?;
                Some(FailureEvent::from_transform(
                    self.request_id,
                    item.index,
                    &item.file_name,
                    format,
                    err,
                ))
            })
            .collect()
    }
}

/// Result of a multi-file extraction: exactly one item per input, in input
/// order.
#[derive(Debug)]
pub struct ExtractionBatch {
    pub request_id: RequestId,
    pub items: Vec<ItemResult<ExtractedDocument, EinlassError>>,
}

impl ExtractionBatch {
    pub fn succeeded(&self) -> usize {
        self.items.iter().filter(|item| item.is_ok()).count()
    }

    /// One event per failed item, in input order.
    pub fn failures(&self) -> Vec<FailureEvent> {
        self.items
            .iter()
            .filter_map(|item| {
                let err = item.outcome.as_ref().err()?;
                Some(FailureEvent::from_extraction(
                    self.request_id,
                    item.index,
                    &item.file_name,
                    err,
                ))
            })
            .collect()
    }
}

/// Runs extraction and transform batches with a shared concurrency bound.
pub struct BatchOrchestrator {
    extractor: Arc<DocumentExtractor>,
    engine: TransformEngine,
    sink: Arc<dyn ArtifactSink>,
    /// Caps items in flight across every batch run by this orchestrator.
    permits: Arc<Semaphore>,
}

impl BatchOrchestrator {
    pub fn new(config: IngestConfig, sink: Arc<dyn ArtifactSink>) -> Result<Self> {
        config.validate()?;
        let engine = TransformEngine::new(config.default_quality()?);
        let permits = Arc::new(Semaphore::new(config.max_batch_workers));
        Ok(Self {
            extractor: Arc::new(DocumentExtractor::new(config)),
            engine,
            sink,
            permits,
        })
    }

    /// Apply the request's transform to every item and store each output.
    ///
    /// Parameters were validated when the request was built, so this never
    /// fails as a whole; per-item failures land in their own slot.
    #[instrument(skip(self, request), fields(request_id = %request.id, items = request.items.len(), kind = ?request.kind))]
    pub async fn transform_batch(&self, request: TransformRequest) -> TransformResult {
        let TransformRequest { id, items, kind } = request;
        let file_names: Vec<String> = items.iter().map(|item| item.file_name().to_owned()).collect();

        let mut tasks = JoinSet::new();
        for (index, item) in items.into_iter().enumerate() {
            let permits = Arc::clone(&self.permits);
            let sink = Arc::clone(&self.sink);
            let engine = self.engine;
            tasks.spawn(async move {
                let work = move || transform_item(&engine, sink.as_ref(), kind, &item);
                let outcome = match run_blocking(permits, work).await {
                    Ok(outcome) => outcome,
                    Err(reason) => Err(TransformError::Aborted(reason)),
                };
                (index, outcome)
            });
        }

        let mut slots: Vec<Option<std::result::Result<ArtifactRef, TransformError>>> =
            (0..file_names.len()).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(err) => warn!(error = %err, "Transform task did not report"),
            }
        }

        let items: Vec<_> = slots
            .into_iter()
            .zip(file_names)
            .enumerate()
            .map(|(index, (slot, file_name))| {
                let outcome = slot.unwrap_or_else(|| {
                    Err(TransformError::Aborted("worker stopped before reporting".into()))
                });
                if let Err(err) = &outcome {
                    warn!(index, file = %file_name, error = %err, "Batch item failed");
                }
                ItemResult {
                    index,
                    file_name,
                    outcome,
                }
            })
            .collect();

        let result = TransformResult {
            request_id: id,
            kind,
            items,
        };
        info!(
            succeeded = result.succeeded(),
            failed = result.items.len() - result.succeeded(),
            "Transform batch finished"
        );
        result
    }

    /// Extract every blob, one outcome per blob, in input order.
    ///
    /// Unsupported media types are rejected without being scheduled.
    #[instrument(skip(self, blobs), fields(items = blobs.len()))]
    pub async fn extract_batch(&self, blobs: Vec<MediaBlob>) -> ExtractionBatch {
        let request_id = RequestId::new();
        let file_names: Vec<String> = blobs.iter().map(|blob| blob.file_name().to_owned()).collect();
        let mut slots: Vec<Option<Result<ExtractedDocument>>> = (0..blobs.len()).map(|_| None).collect();
        let mut kinds: Vec<Option<DocumentKind>> = vec![None; blobs.len()];

        let mut tasks = JoinSet::new();
        for (index, blob) in blobs.into_iter().enumerate() {
            let kind = match classify_document(blob.media_type()) {
                Ok(kind) => kind,
                Err(err) => {
                    slots[index] = Some(Err(err));
                    continue;
                }
            };
            kinds[index] = Some(kind);

            let permits = Arc::clone(&self.permits);
            let extractor = Arc::clone(&self.extractor);
            tasks.spawn(async move {
                let work = move || extractor.extract(&blob);
                let outcome = match run_blocking(permits, work).await {
                    Ok(outcome) => outcome,
                    Err(reason) => Err(internal_fault(kind, reason)),
                };
                (index, outcome)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, outcome)) => slots[index] = Some(outcome),
                Err(err) => warn!(error = %err, "Extraction task did not report"),
            }
        }

        let items: Vec<_> = slots
            .into_iter()
            .zip(kinds)
            .zip(file_names)
            .enumerate()
            .map(|(index, ((slot, kind), file_name))| {
                let outcome = slot.unwrap_or_else(|| {
                    Err(internal_fault(
                        kind.unwrap_or(DocumentKind::PlainText),
                        "worker stopped before reporting".into(),
                    ))
                });
                if let Err(err) = &outcome {
                    warn!(index, file = %file_name, error = %err, "Batch item failed");
                }
                ItemResult {
                    index,
                    file_name,
                    outcome,
                }
            })
            .collect();

        let batch = ExtractionBatch { request_id, items };
        info!(
            %request_id,
            succeeded = batch.succeeded(),
            failed = batch.items.len() - batch.succeeded(),
            "Extraction batch finished"
        );
        batch
    }
}

fn transform_item(
    engine: &TransformEngine,
    sink: &dyn ArtifactSink,
    kind: TransformKind,
    item: &MediaBlob,
) -> std::result::Result<ArtifactRef, TransformError> {
    let output = engine.transform_one(item.bytes(), kind)?;
    let format = kind.output_format();
    let name = artifact_name(item.file_name(), format.extension());
    sink.store(&name, format.mime_type(), output)
}

fn internal_fault(kind: DocumentKind, reason: String) -> EinlassError {
    EinlassError::Extraction {
        format: kind,
        cause: ExtractionCause::Internal(reason),
    }
}

/// Wait for a permit, then run `work` on the blocking pool.
///
/// The permit is held until `work` returns. `Err` carries the reason the
/// work never produced a value (closed semaphore or a panicked worker).
async fn run_blocking<T, F>(permits: Arc<Semaphore>, work: F) -> std::result::Result<T, String>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let permit = permits.acquire_owned().await.map_err(|err| err.to_string())?;
    tokio::task::spawn_blocking(move || {
        let _permit = permit;
        work()
    })
    .await
    .map_err(|err| err.to_string())
}
