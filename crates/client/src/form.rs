//! Stateful "create user" form.
//!
//! Validation only runs on submit. Editing a field clears that field's
//! error. A successful submit resets the form; a failed one keeps the input
//! so the user can retry.

use std::fmt::Display;
use std::future::Future;

use fullstack_core::{FormErrors, FormField, UserDraft, UserForm};

/// Result of a submit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; the handler was not called.
    Invalid,
    /// The handler succeeded and the form was reset.
    Submitted,
    /// The handler failed; input is preserved.
    Failed,
}

/// Form values, per-field errors and the in-flight flag.
#[derive(Debug, Clone, Default)]
pub struct FormView {
    form: UserForm,
    errors: FormErrors,
    is_submitting: bool,
}

impl FormView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn form(&self) -> &UserForm {
        &self.form
    }

    #[must_use]
    pub const fn errors(&self) -> &FormErrors {
        &self.errors
    }

    /// `true` between a valid submit and the handler's completion.
    #[must_use]
    pub const fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    /// Update a field and drop its error message.
    pub fn change(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
        self.errors.clear(field);
    }

    /// Validate and, if clean, mark the form as submitting.
    ///
    /// Returns the request body to send, or `None` when validation failed
    /// (the errors are then available from [`errors`](Self::errors)).
    pub fn prepare_submit(&mut self) -> Option<UserDraft> {
        let errors = self.form.validate();
        if !errors.is_empty() {
            self.errors = errors;
            return None;
        }

        self.errors = FormErrors::default();
        self.is_submitting = true;
        Some(self.form.to_draft())
    }

    /// Record the handler's result.
    pub fn finish_submit<E: Display>(&mut self, result: Result<(), E>) -> SubmitOutcome {
        self.is_submitting = false;
        match result {
            Ok(()) => {
                self.form.clear();
                self.errors = FormErrors::default();
                SubmitOutcome::Submitted
            }
            Err(err) => {
                tracing::error!(error = %err, "Error submitting form");
                SubmitOutcome::Failed
            }
        }
    }

    /// Validate, then hand the draft to `on_submit` exactly once.
    pub async fn submit<F, Fut, E>(&mut self, on_submit: F) -> SubmitOutcome
    where
        F: FnOnce(UserDraft) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let Some(draft) = self.prepare_submit() else {
            return SubmitOutcome::Invalid;
        };
        let result = on_submit(draft).await;
        self.finish_submit(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn filled(username: &str, email: &str) -> FormView {
        let mut view = FormView::new();
        view.change(FormField::Username, username);
        view.change(FormField::Email, email);
        view
    }

    #[tokio::test]
    async fn test_invalid_form_never_calls_handler() {
        let calls = AtomicUsize::new(0);
        let mut view = filled("ab", "bad");

        let outcome = view
            .submit(|_| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, String>(())
            })
            .await;

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(view.errors().len(), 2);
        assert!(!view.is_submitting());
    }

    #[tokio::test]
    async fn test_successful_submit_resets_form() {
        let mut view = filled("jdoe", "jdoe@example.com");
        view.change(FormField::FirstName, "John");

        let outcome = view
            .submit(|draft| async move {
                assert_eq!(draft.username, "jdoe");
                assert_eq!(draft.first_name.as_deref(), Some("John"));
                assert_eq!(draft.last_name, None);
                Ok::<_, String>(())
            })
            .await;

        assert_eq!(outcome, SubmitOutcome::Submitted);
        assert_eq!(view.form(), &UserForm::default());
        assert!(view.errors().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_input() {
        let mut view = filled("jdoe", "jdoe@example.com");

        let outcome = view
            .submit(|_| async { Err("Username already exists") })
            .await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(view.form().username, "jdoe");
        assert_eq!(view.form().email, "jdoe@example.com");
        assert!(!view.is_submitting());
    }

    #[test]
    fn test_editing_clears_only_that_error() {
        let mut view = filled("ab", "bad");
        assert!(view.prepare_submit().is_none());

        view.change(FormField::Username, "abc");
        assert_eq!(view.errors().get(FormField::Username), None);
        assert_eq!(view.errors().get(FormField::Email), Some("Email is invalid"));
    }

    #[test]
    fn test_prepare_submit_sets_flag() {
        let mut view = filled("jdoe", "jdoe@example.com");
        assert!(view.prepare_submit().is_some());
        assert!(view.is_submitting());

        view.finish_submit(Ok::<_, String>(()));
        assert!(!view.is_submitting());
    }
}
