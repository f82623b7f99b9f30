//! Analysis session: the Idle → Loading → Success | Error state machine.
//!
//! The session is the only owner of the current status, result, preview and
//! error message. Everything else reads `SessionSnapshot`s.
//!
//! Gate: a selection is only accepted from Idle. Anywhere else
//! `select_image` is a no-op, so at most one classify call is ever in flight
//! per session and a finished result stays on screen until `reset()`. The call runs under a hard timeout
//! and can be abandoned with `cancel()` or `reset()`; a generation counter
//! makes sure a superseded call can never write its outcome back.

use crate::error::{AnalysisError, ValidationError};
use crate::llm::{AnalysisResult, Classifier};
use crate::upload::{self, ImageFile};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UploadStatus {
    Idle,
    Loading,
    Success,
    Error,
}

/// Read-only copy of the session state, handed to the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub status: UploadStatus,
    pub result: Option<AnalysisResult>,
    /// Data URL of the image being (or last) analyzed.
    pub preview: Option<String>,
    /// User-facing analysis failure message. Set only in Error.
    pub error: Option<String>,
    /// Last validation message for a rejected file.
    pub notice: Option<String>,
    pub analysis_enabled: bool,
}

/// What happened to a `select_image` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// The session was not Idle; nothing changed.
    Ignored,
    /// The file failed validation; no request was sent.
    Rejected(ValidationError),
    /// The request finished; the status is Success or Error.
    Completed(UploadStatus),
    /// The request was cancelled or reset before it finished.
    Cancelled,
}

type Listener = Box<dyn Fn(&SessionSnapshot) + Send + Sync>;

struct Inner {
    snapshot: SessionSnapshot,
    generation: u64,
    in_flight: Option<Arc<Notify>>,
}

pub struct AnalysisSession<C: Classifier> {
    classifier: C,
    timeout: Duration,
    inner: Mutex<Inner>,
    listeners: Vec<Listener>,
}

impl<C: Classifier> AnalysisSession<C> {
    pub fn new(classifier: C, timeout: Duration) -> Self {
        let analysis_enabled = classifier.is_configured();
        Self {
            classifier,
            timeout,
            inner: Mutex::new(Inner {
                snapshot: SessionSnapshot {
                    status: UploadStatus::Idle,
                    result: None,
                    preview: None,
                    error: None,
                    notice: None,
                    analysis_enabled,
                },
                generation: 0,
                in_flight: None,
            }),
            listeners: Vec::new(),
        }
    }

    /// Register a callback fired with a fresh snapshot after every change.
    pub fn with_listener<F>(mut self, listener: F) -> Self
    where
        F: Fn(&SessionSnapshot) + Send + Sync + 'static,
    {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.lock().snapshot.clone()
    }

    pub fn status(&self) -> UploadStatus {
        self.lock().snapshot.status
    }

    /// Read `path` from disk, then behave like `select_image`.
    pub async fn select_path(&self, path: impl AsRef<Path>) -> SelectOutcome {
        let status = self.status();
        if status != UploadStatus::Idle {
            log::info!("[SESSION] Ignoring {} while {:?}", path.as_ref().display(), status);
            return SelectOutcome::Ignored;
        }
        match ImageFile::open(path).await {
            Ok(file) => self.select_image(file).await,
            Err(e) => self.reject(e),
        }
    }

    /// Encode `file` and, if it passes validation, classify it.
    /// Only accepted from Idle.
    ///
    /// Resolves once the session has left Loading (or never entered it).
    pub async fn select_image(&self, file: ImageFile) -> SelectOutcome {
        let status = self.status();
        if status != UploadStatus::Idle {
            log::info!("[SESSION] Ignoring {} while {:?}", file.name, status);
            return SelectOutcome::Ignored;
        }

        let encoded = match upload::encode(&file) {
            Ok(encoded) => encoded,
            Err(e) => return self.reject(e),
        };

        // Re-check under the lock: another call may have started while we encoded.
        let (generation, cancel, snapshot) = {
            let mut inner = self.lock();
            if inner.snapshot.status != UploadStatus::Idle {
                log::info!("[SESSION] Ignoring {} while {:?}", file.name, inner.snapshot.status);
                return SelectOutcome::Ignored;
            }
            inner.generation += 1;
            let cancel = Arc::new(Notify::new());
            inner.in_flight = Some(cancel.clone());

            let s = &mut inner.snapshot;
            s.status = UploadStatus::Loading;
            s.preview = Some(encoded.preview_data_url.clone());
            s.result = None;
            s.error = None;
            s.notice = None;
            (inner.generation, cancel, inner.snapshot.clone())
        };
        self.notify(&snapshot);
        log::info!("[SESSION] Analysis #{} started for {}", generation, file.name);

        let start = std::time::Instant::now();
        let outcome = tokio::select! {
            res = tokio::time::timeout(self.timeout, self.classifier.classify(&encoded)) => {
                Some(res.unwrap_or(Err(AnalysisError::Timeout)))
            }
            _ = cancel.notified() => None,
        };

        let (status, snapshot) = {
            let mut inner = self.lock();
            let Some(outcome) = outcome.filter(|_| inner.generation == generation) else {
                log::info!(
                    "[SESSION] Analysis #{} abandoned after {}ms",
                    generation,
                    start.elapsed().as_millis()
                );
                return SelectOutcome::Cancelled;
            };
            inner.in_flight = None;

            let s = &mut inner.snapshot;
            match outcome {
                Ok(result) => {
                    s.result = Some(result);
                    s.status = UploadStatus::Success;
                }
                Err(e) => {
                    log::error!("[SESSION] Analysis #{} failed: {}", generation, e);
                    s.result = None;
                    s.error = Some(e.user_message().to_string());
                    s.status = UploadStatus::Error;
                }
            }
            (s.status, inner.snapshot.clone())
        };

        log::info!(
            "[SESSION] Analysis #{} finished: {:?} in {}ms",
            generation,
            status,
            start.elapsed().as_millis()
        );
        self.notify(&snapshot);
        SelectOutcome::Completed(status)
    }

    /// Back to Idle with result, preview, error and notice cleared.
    ///
    /// Abandons an in-flight request if there is one.
    pub fn reset(&self) {
        let snapshot = {
            let mut inner = self.lock();
            Self::clear(&mut inner);
            inner.snapshot.clone()
        };
        log::info!("[SESSION] Reset");
        self.notify(&snapshot);
    }

    /// Abandon the in-flight request. Only meaningful while Loading.
    ///
    /// Returns false (and changes nothing) in any other state.
    pub fn cancel(&self) -> bool {
        let snapshot = {
            let mut inner = self.lock();
            if inner.snapshot.status != UploadStatus::Loading {
                return false;
            }
            Self::clear(&mut inner);
            inner.snapshot.clone()
        };
        log::info!("[SESSION] Analysis cancelled by user");
        self.notify(&snapshot);
        true
    }

    fn reject(&self, err: ValidationError) -> SelectOutcome {
        let snapshot = {
            let mut inner = self.lock();
            inner.snapshot.notice = Some(err.user_message());
            inner.snapshot.clone()
        };
        self.notify(&snapshot);
        SelectOutcome::Rejected(err)
    }

    fn clear(inner: &mut Inner) {
        if let Some(cancel) = inner.in_flight.take() {
            cancel.notify_one();
        }
        // Any outcome still on its way belongs to an older generation now.
        inner.generation += 1;

        let s = &mut inner.snapshot;
        s.status = UploadStatus::Idle;
        s.result = None;
        s.preview = None;
        s.error = None;
        s.notice = None;
    }

    fn notify(&self, snapshot: &SessionSnapshot) {
        for listener in &self.listeners {
            listener(snapshot);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
