//! Top-level client state.
//!
//! Every mutation is followed by a full refetch of the list; the dashboard
//! never patches its local copy.

use fullstack_core::{User, UserDraft, UserId};

use crate::error::ClientError;
use crate::form::{FormView, SubmitOutcome};
use crate::service::UserApi;

/// Banner shown when the list cannot be loaded.
pub const FETCH_FAILED: &str = "Failed to fetch users";
/// Banner shown when a create fails.
pub const CREATE_FAILED: &str = "Failed to create user";
/// Banner shown when a delete fails.
pub const DELETE_FAILED: &str = "Failed to delete user";

/// What the user list view renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub users: Vec<User>,
    /// `true` while a list fetch is in flight.
    pub loading: bool,
    /// Banner text from the most recent failure.
    pub error: Option<String>,
    /// Whether the "create user" form is visible.
    pub show_form: bool,
}

/// User management front end, generic over the API implementation.
#[derive(Debug)]
pub struct Dashboard<A> {
    api: A,
    state: DashboardState,
    form: FormView,
    last_created: Option<User>,
}

impl<A: UserApi> Dashboard<A> {
    /// Create an empty dashboard. Call [`refresh`](Self::refresh) to load
    /// the list.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: DashboardState::default(),
            form: FormView::new(),
            last_created: None,
        }
    }

    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    pub const fn form(&self) -> &FormView {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut FormView {
        &mut self.form
    }

    pub const fn api(&self) -> &A {
        &self.api
    }

    /// The user returned by the most recent successful create, as the
    /// server answered it. Independent of whether the refetch succeeded.
    pub const fn last_created(&self) -> Option<&User> {
        self.last_created.as_ref()
    }

    /// Show or hide the form.
    pub const fn toggle_form(&mut self) {
        self.state.show_form = !self.state.show_form;
    }

    /// Reload the user list.
    ///
    /// On failure the banner is set and the previous list is kept.
    pub async fn refresh(&mut self) {
        self.state.loading = true;
        self.state.error = None;

        match self.api.list_users().await {
            Ok(response) => self.state.users = response.data,
            Err(err) => {
                tracing::error!(error = %err, "Error fetching users");
                self.state.error = Some(FETCH_FAILED.to_owned());
            }
        }

        self.state.loading = false;
    }

    /// Create a user, hide the form and reload the list.
    ///
    /// # Errors
    ///
    /// Returns the API error after setting the banner. The form stays open.
    pub async fn create_user(&mut self, draft: &UserDraft) -> Result<User, ClientError> {
        match self.api.create_user(draft).await {
            Ok(response) => {
                self.last_created = Some(response.data.clone());
                self.state.show_form = false;
                self.refresh().await;
                Ok(response.data)
            }
            Err(err) => {
                tracing::error!(error = %err, "Error creating user");
                self.last_created = None;
                self.state.error = Some(CREATE_FAILED.to_owned());
                Err(err)
            }
        }
    }

    /// Delete a user and reload the list.
    ///
    /// # Errors
    ///
    /// Returns the API error after setting the banner.
    pub async fn delete_user(&mut self, id: &UserId) -> Result<(), ClientError> {
        match self.api.delete_user(id).await {
            Ok(_) => {
                self.refresh().await;
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, user_id = %id, "Error deleting user");
                self.state.error = Some(DELETE_FAILED.to_owned());
                Err(err)
            }
        }
    }

    /// Submit the form through [`create_user`](Self::create_user).
    pub async fn submit_form(&mut self) -> SubmitOutcome {
        let Some(draft) = self.form.prepare_submit() else {
            return SubmitOutcome::Invalid;
        };
        let result = self.create_user(&draft).await.map(|_| ());
        self.form.finish_submit(result)
    }
}
