//! Request lifecycle of a single analysis session.
//!
//! Status is published through a [`watch`] channel so renderers observe exactly one
//! [`SessionStatus`] at a time. A submission received while another one is pending is
//! ignored: the in-flight request keeps running and the call reports
//! [`SubmitOutcome::Ignored`].

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use shared::{
    domain::SessionStatus,
    error::{SessionError, ABANDONED_MESSAGE},
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{
    transport::{AnalysisRequest, AnalysisTransport},
    upload::SelectedFile,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission was pending; nothing changed.
    Ignored,
    Settled(SessionStatus),
}

pub enum Begin {
    Started(PendingSubmission),
    Ignored,
    /// Pre-flight validation failed; the session is already `Failed`.
    Rejected(SessionError),
}

pub struct AnalysisSession {
    transport: Arc<dyn AnalysisTransport>,
    status: Arc<watch::Sender<SessionStatus>>,
    next_submission: AtomicU64,
}

impl AnalysisSession {
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        let (status, _) = watch::channel(SessionStatus::Idle);
        Self {
            transport,
            status: Arc::new(status),
            next_submission: AtomicU64::new(1),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status.borrow().clone()
    }

    pub fn is_pending(&self) -> bool {
        self.status.borrow().is_pending()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status.subscribe()
    }

    /// Runs the synchronous part of a submission.
    ///
    /// The file is only borrowed here; the returned submission owns a detached copy
    /// of its payload, so later selections cannot affect it.
    pub fn begin(&self, file: Option<&SelectedFile>) -> Begin {
        let mut rejected = None;
        let started = self.status.send_if_modified(|status| {
            if status.is_pending() {
                return false;
            }
            if file.is_none() {
                let err = SessionError::no_file_selected();
                *status = SessionStatus::Failed(err.clone());
                rejected = Some(err);
                return true;
            }
            *status = SessionStatus::Pending;
            true
        });

        if let Some(err) = rejected {
            warn!("submission rejected: {err}");
            return Begin::Rejected(err);
        }
        let Some(file) = file.filter(|_| started) else {
            warn!("submission ignored; another analysis is pending");
            return Begin::Ignored;
        };

        let id = self.next_submission.fetch_add(1, Ordering::Relaxed);
        info!(
            submission = id,
            file = file.name(),
            size_bytes = file.size_bytes(),
            "analysis submitted"
        );
        Begin::Started(PendingSubmission {
            id,
            request: AnalysisRequest::from_selected(file),
            transport: self.transport.clone(),
            guard: PendingGuard {
                id,
                status: self.status.clone(),
                settled: false,
            },
        })
    }

    pub async fn submit(&self, file: Option<&SelectedFile>) -> SubmitOutcome {
        match self.begin(file) {
            Begin::Started(pending) => SubmitOutcome::Settled(pending.run().await),
            Begin::Ignored => SubmitOutcome::Ignored,
            Begin::Rejected(err) => SubmitOutcome::Settled(SessionStatus::Failed(err)),
        }
    }
}

/// An accepted submission whose request has not been awaited yet.
pub struct PendingSubmission {
    id: u64,
    request: AnalysisRequest,
    transport: Arc<dyn AnalysisTransport>,
    guard: PendingGuard,
}

impl PendingSubmission {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    pub async fn run(self) -> SessionStatus {
        let Self {
            id,
            request,
            transport,
            guard,
        } = self;
        let next = match transport.analyze(request).await {
            Ok(result) => {
                info!(
                    submission = id,
                    assessment = result.overall_assessment(),
                    "analysis resolved"
                );
                SessionStatus::Resolved(result)
            }
            Err(err) => {
                warn!(
                    submission = id,
                    source = err.kind.as_str(),
                    "analysis failed: {err}"
                );
                SessionStatus::Failed(err)
            }
        };
        guard.settle(next.clone());
        next
    }
}

/// Leaves `Pending` exactly once, even when the submission future is dropped.
struct PendingGuard {
    id: u64,
    status: Arc<watch::Sender<SessionStatus>>,
    settled: bool,
}

impl PendingGuard {
    fn settle(mut self, next: SessionStatus) {
        self.settled = true;
        self.status.send_replace(next);
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        if !self.settled {
            warn!(submission = self.id, "analysis abandoned while pending");
            self.status.send_replace(SessionStatus::Failed(SessionError::transport(
                ABANDONED_MESSAGE,
            )));
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
