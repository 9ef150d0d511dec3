// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// einlass-batch — Runs extraction and image transforms over ordered batches.
//
// Items are processed on tokio's blocking pool behind a bounded semaphore.
// Results always come back in input order, one slot per input, and one
// item's failure never prevents the others from being reported.

pub mod orchestrator;
pub mod report;
pub mod sink;

pub use orchestrator::{BatchOrchestrator, ExtractionBatch, ItemResult, TransformResult};
pub use report::FailureEvent;
pub use sink::{ArtifactRef, ArtifactSink, MemorySink, artifact_name, hash_bytes};
