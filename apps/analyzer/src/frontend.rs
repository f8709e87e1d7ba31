//! Drives an [`AnalysisSession`] for the terminal front ends.

use client_core::{AnalysisSession, Begin, SelectedFile};
use renderer::{project, ResultView};
use shared::domain::SessionStatus;
use tokio::{sync::watch, task::JoinHandle};
use tracing::warn;

/// Submits once and waits for the outcome, emitting each view the session passes through.
pub async fn analyze_once(
    session: &AnalysisSession,
    file: Option<&SelectedFile>,
    mut emit: impl FnMut(ResultView),
) -> SessionStatus {
    let status = match session.begin(file) {
        Begin::Started(pending) => {
            emit(project(&session.status()));
            pending.run().await
        }
        Begin::Ignored | Begin::Rejected(_) => session.status(),
    };
    emit(project(&status));
    status
}

/// Emits a view for every status change until the session is dropped.
pub fn spawn_status_printer(
    mut updates: watch::Receiver<SessionStatus>,
    mut emit: impl FnMut(ResultView) + Send + 'static,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let view = {
                let status = updates.borrow_and_update();
                project(&status)
            };
            emit(view);
        }
    })
}

/// Lets a running submission settle, then drains the printer.
///
/// Dropping the session closes the status channel once the submission has released
/// it, so the printer sees the final status before it exits.
pub async fn finish(
    session: AnalysisSession,
    in_flight: Option<JoinHandle<SessionStatus>>,
    printer: JoinHandle<()>,
) {
    if let Some(handle) = in_flight {
        if !handle.is_finished() {
            println!("Waiting for the running analysis to finish...");
        }
        if let Err(err) = handle.await {
            warn!("analysis task failed: {err}");
        }
    }
    drop(session);
    if let Err(err) = printer.await {
        warn!("status printer failed: {err}");
    }
}
