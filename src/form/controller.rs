use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::state::{FormEvent, Phase, SubmissionState, reduce};
use crate::odoo::{ContactService, Gateway};

/// Drives the contact form: owns the state, calls the submission service and
/// schedules the success message expiry.
pub struct FormController<G> {
    service: Arc<ContactService<G>>,
    state: SubmissionState,
    success_display: Duration,
    deferred_tx: mpsc::UnboundedSender<FormEvent>,
    deferred_rx: mpsc::UnboundedReceiver<FormEvent>,
    pending_expiry: Option<JoinHandle<()>>,
}

impl<G: Gateway> FormController<G> {
    pub fn new(service: Arc<ContactService<G>>, success_display: Duration) -> Self {
        let (deferred_tx, deferred_rx) = mpsc::unbounded_channel();
        Self {
            service,
            state: SubmissionState::default(),
            success_display,
            deferred_tx,
            deferred_rx,
            pending_expiry: None,
        }
    }

    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn dispatch(&mut self, event: FormEvent) {
        debug!("Form event: {:?}", event);
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, event);
    }

    pub fn edit_name(&mut self, name: impl Into<String>) {
        self.dispatch(FormEvent::NameEdited(name.into()));
    }

    pub fn edit_phone(&mut self, phone: impl Into<String>) {
        self.dispatch(FormEvent::PhoneEdited(phone.into()));
    }

    /// Runs one submission attempt to completion and returns the phase it
    /// ended in. Rejected attempts never reach the network.
    pub async fn submit(&mut self) -> Phase {
        self.pump();

        let generation = self.state.notice_generation;
        self.dispatch(FormEvent::SubmitRequested);
        if self.state.notice_generation == generation {
            debug!("Submission not started: {:?}", self.phase());
            return self.phase();
        }

        if let Some(handle) = self.pending_expiry.take() {
            handle.abort();
        }

        let draft = self.state.draft.clone();
        match self.service.create_contact(&draft).await {
            Ok(id) => {
                info!("Form submission succeeded with id {}", id);
                self.dispatch(FormEvent::SubmitSucceeded(id));
                self.schedule_expiry();
            }
            Err(e) => {
                warn!("Form submission failed ({}): {}", e.kind(), e);
                self.dispatch(FormEvent::SubmitFailed(e.to_string()));
            }
        }

        self.phase()
    }

    fn schedule_expiry(&mut self) {
        let generation = self.state.notice_generation;
        let tx = self.deferred_tx.clone();
        let delay = self.success_display;

        self.pending_expiry = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Fails once the controller is gone, which is fine.
            let _ = tx.send(FormEvent::SuccessExpired { generation });
        }));
    }

    /// Applies deferred events that have already arrived.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.deferred_rx.try_recv() {
            self.dispatch(event);
            applied += 1;
        }
        applied
    }

    /// Tears the controller down, handing back the expiry task if one is still
    /// scheduled. The task outlives the controller and finishes on its own.
    pub fn into_pending_expiry(self) -> Option<JoinHandle<()>> {
        self.pending_expiry
    }

    /// Waits for the next deferred event and applies it.
    pub async fn next_deferred(&mut self) -> Option<FormEvent> {
        let event = self.deferred_rx.recv().await?;
        self.dispatch(event.clone());
        Some(event)
    }
}
