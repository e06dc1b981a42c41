//! Progress-callback trait for per-document verification events.
//!
//! Inject an [`Arc<dyn VerificationProgressCallback>`] via
//! [`crate::config::VerifierConfigBuilder::progress_callback`] to receive
//! events as [`crate::verify_batch`] works through a set of transcripts.
//! The trait is `Send + Sync` because documents are processed concurrently.
//!
//! # Example
//!
//! ```rust
//! use marksheet_verify::{DocumentStatus, VerificationProgressCallback, VerifierConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     verified: AtomicUsize,
//! }
//!
//! impl VerificationProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, _num: usize, _total: usize, name: &str, status: DocumentStatus) {
//!         if status == DocumentStatus::Verified {
//!             self.verified.fetch_add(1, Ordering::SeqCst);
//!         }
//!         eprintln!("{name}: {status}");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { verified: AtomicUsize::new(0) });
//!
//! let config = VerifierConfig::builder()
//!     .progress_callback(counter as Arc<dyn VerificationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::DocumentStatus;
use std::sync::Arc;

/// Called by the batch runner as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
///
/// # Thread safety
///
/// `on_document_start`, `on_document_complete`, and `on_document_error` may
/// be called concurrently from different tasks. Implementations must protect
/// shared mutable state (e.g. `Mutex`, `AtomicUsize`).
pub trait VerificationProgressCallback: Send + Sync {
    /// Called once before any document is opened.
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document's text is extracted.
    ///
    /// # Arguments
    /// * `doc_num`: 1-indexed position in the batch
    /// * `total`: documents in the batch
    /// * `name`: file name used to identify the document
    fn on_document_start(&self, doc_num: usize, total: usize, name: &str) {
        let _ = (doc_num, total, name);
    }

    /// Called when a document produced a report, whatever its status.
    fn on_document_complete(&self, doc_num: usize, total: usize, name: &str, status: DocumentStatus) {
        let _ = (doc_num, total, name, status);
    }

    /// Called when a document could not be read at all.
    fn on_document_error(&self, doc_num: usize, total: usize, name: &str, error: &str) {
        let _ = (doc_num, total, name, error);
    }

    /// Called once after every document has been attempted.
    ///
    /// `success_count` counts documents that produced a report (verified,
    /// mismatched, or empty), i.e. everything except read failures.
    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let _ = (total_documents, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl VerificationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::VerifierConfig`].
pub type ProgressCallback = Arc<dyn VerificationProgressCallback>;
