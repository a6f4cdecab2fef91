use crate::odoo::{ContactDraft, RemoteContactId};

pub const VALIDATION_MESSAGE: &str = "Please fill in both name and phone.";
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to create contact";

pub fn success_message(id: RemoteContactId) -> String {
    format!("Contact created successfully! ID: {}", id)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

/// Everything the contact form shows. At most one of `error`/`success` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    pub draft: ContactDraft,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    /// Bumped on every accepted submission; a success expiry only applies
    /// while it still carries the current value.
    pub notice_generation: u64,
}

impl SubmissionState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Submitting
        } else if self.error.is_some() {
            Phase::Failed
        } else if self.success.is_some() {
            Phase::Succeeded
        } else {
            Phase::Idle
        }
    }

    /// Single line summarizing the state for display.
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().or(self.success.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    NameEdited(String),
    PhoneEdited(String),
    SubmitRequested,
    SubmitSucceeded(RemoteContactId),
    SubmitFailed(String),
    SuccessExpired { generation: u64 },
}

pub fn reduce(state: SubmissionState, event: FormEvent) -> SubmissionState {
    match event {
        FormEvent::NameEdited(_) | FormEvent::PhoneEdited(_) if state.loading => state,
        // Editing after a failure returns the form to Idle.
        FormEvent::NameEdited(name) => SubmissionState {
            draft: ContactDraft { name, ..state.draft },
            error: None,
            ..state
        },
        FormEvent::PhoneEdited(phone) => SubmissionState {
            draft: ContactDraft { phone, ..state.draft },
            error: None,
            ..state
        },
        FormEvent::SubmitRequested if state.loading => state,
        FormEvent::SubmitRequested if !state.draft.is_complete() => SubmissionState {
            error: Some(VALIDATION_MESSAGE.to_string()),
            success: None,
            ..state
        },
        FormEvent::SubmitRequested => SubmissionState {
            loading: true,
            error: None,
            success: None,
            notice_generation: state.notice_generation + 1,
            ..state
        },
        // Completions only land on a submission that is actually in flight.
        FormEvent::SubmitSucceeded(_) | FormEvent::SubmitFailed(_) if !state.loading => state,
        FormEvent::SubmitSucceeded(id) => SubmissionState {
            draft: ContactDraft::default(),
            loading: false,
            error: None,
            success: Some(success_message(id)),
            ..state
        },
        FormEvent::SubmitFailed(message) => {
            let message = if message.trim().is_empty() {
                GENERIC_FAILURE_MESSAGE.to_string()
            } else {
                message
            };
            SubmissionState {
                loading: false,
                error: Some(message),
                success: None,
                ..state
            }
        }
        FormEvent::SuccessExpired { generation } if generation == state.notice_generation => {
            SubmissionState {
                success: None,
                ..state
            }
        }
        FormEvent::SuccessExpired { .. } => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SubmissionState {
        let state = reduce(SubmissionState::default(), FormEvent::NameEdited("Ada".into()));
        reduce(state, FormEvent::PhoneEdited("555-0100".into()))
    }

    #[test]
    fn starts_idle_with_empty_fields() {
        let state = SubmissionState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.draft.name, "");
        assert_eq!(state.draft.phone, "");
        assert_eq!(state.message(), None);
    }

    #[test]
    fn blank_fields_fail_validation_without_loading() {
        let state = reduce(SubmissionState::default(), FormEvent::NameEdited("  ".into()));
        let state = reduce(state, FormEvent::PhoneEdited("555".into()));
        let state = reduce(state, FormEvent::SubmitRequested);

        assert_eq!(state.phase(), Phase::Failed);
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(VALIDATION_MESSAGE));
        assert_eq!(state.draft.phone, "555");
    }

    #[test]
    fn accepted_submit_clears_messages_and_sets_loading() {
        let state = SubmissionState {
            error: Some("old".into()),
            ..filled()
        };
        let state = reduce(state, FormEvent::SubmitRequested);

        assert_eq!(state.phase(), Phase::Submitting);
        assert_eq!(state.error, None);
        assert_eq!(state.success, None);
        assert_eq!(state.notice_generation, 1);
    }

    #[test]
    fn submit_while_loading_is_a_no_op() {
        let state = reduce(filled(), FormEvent::SubmitRequested);
        let again = reduce(state.clone(), FormEvent::SubmitRequested);
        assert_eq!(again, state);
    }

    #[test]
    fn edits_are_ignored_while_submitting() {
        let state = reduce(filled(), FormEvent::SubmitRequested);
        let state = reduce(state, FormEvent::NameEdited("Grace".into()));
        assert_eq!(state.draft.name, "Ada");
    }

    #[test]
    fn edit_after_failure_returns_to_idle() {
        let state = reduce(filled(), FormEvent::SubmitRequested);
        let state = reduce(state, FormEvent::SubmitFailed("dup".into()));
        assert_eq!(state.phase(), Phase::Failed);

        let state = reduce(state, FormEvent::PhoneEdited("555-0199".into()));
        assert_eq!(state.draft.phone, "555-0199");
        assert_eq!(state.draft.name, "Ada");
        assert_eq!(state.error, None);
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn edit_after_validation_error_returns_to_idle() {
        let state = reduce(SubmissionState::default(), FormEvent::SubmitRequested);
        assert_eq!(state.phase(), Phase::Failed);

        let state = reduce(state, FormEvent::NameEdited("A".into()));
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn success_clears_draft_and_reports_id() {
        let state = reduce(filled(), FormEvent::SubmitRequested);
        let state = reduce(state, FormEvent::SubmitSucceeded(42));

        assert_eq!(state.phase(), Phase::Succeeded);
        assert_eq!(state.draft, ContactDraft::default());
        assert!(state.success.as_deref().unwrap().contains("42"));
    }

    #[test]
    fn failure_keeps_draft() {
        let state = reduce(filled(), FormEvent::SubmitRequested);
        let state = reduce(state, FormEvent::SubmitFailed("dup".into()));

        assert_eq!(state.phase(), Phase::Failed);
        assert_eq!(state.error.as_deref(), Some("dup"));
        assert_eq!(state.draft, ContactDraft::new("Ada", "555-0100"));
    }

    #[test]
    fn blank_failure_message_falls_back_to_generic() {
        let state = reduce(filled(), FormEvent::SubmitRequested);
        let state = reduce(state, FormEvent::SubmitFailed(String::new()));
        assert_eq!(state.error.as_deref(), Some(GENERIC_FAILURE_MESSAGE));
    }

    #[test]
    fn stale_expiry_does_not_clear_newer_success() {
        let state = reduce(filled(), FormEvent::SubmitRequested);
        let state = reduce(state, FormEvent::SubmitSucceeded(1));
        let first_generation = state.notice_generation;

        let state = reduce(state, FormEvent::NameEdited("Grace".into()));
        let state = reduce(state, FormEvent::PhoneEdited("555-0101".into()));
        let state = reduce(state, FormEvent::SubmitRequested);
        let state = reduce(state, FormEvent::SubmitSucceeded(2));

        let state = reduce(state, FormEvent::SuccessExpired { generation: first_generation });
        assert_eq!(state.success, Some(success_message(2)));

        let current = state.notice_generation;
        let state = reduce(state, FormEvent::SuccessExpired { generation: current });
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[test]
    fn late_completion_without_submission_is_ignored() {
        let state = reduce(SubmissionState::default(), FormEvent::SubmitSucceeded(9));
        assert_eq!(state, SubmissionState::default());
    }
}
