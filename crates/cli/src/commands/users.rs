//! Manage users through the REST API.
//!
//! Talks to the server at `FULLSTACK_API_URL`. `create` and `delete` go
//! through the dashboard so they behave exactly like the front end: the form
//! is validated before any request and the list is re-fetched afterwards.

use clap::Subcommand;
use tracing::{error, info};

use fullstack_client::{ClientConfig, Dashboard, SubmitOutcome, UserApi, UserService};
use fullstack_core::{FormField, UserDraft, UserId};

use super::print_json;

#[derive(Subcommand)]
pub enum UserAction {
    /// List every user
    List,
    /// Show one user by ID
    Get { id: String },
    /// Show one user by username
    ByUsername { username: String },
    /// Show one user by email
    ByEmail { email: String },
    /// Create a user (validated like the form)
    Create {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },
    /// Replace a user's fields
    Update {
        id: String,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        /// Mark the user inactive
        #[arg(long)]
        inactive: bool,

        /// New password (the current one is kept when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Delete a user
    Delete { id: String },
    /// Mark a user active
    Activate { id: String },
    /// Mark a user inactive
    Deactivate { id: String },
    /// Find users whose first name contains the text (case-insensitive)
    Search { first_name: String },
    /// Count active users (or inactive ones with --inactive)
    Count {
        #[arg(long)]
        inactive: bool,
    },
}

/// Run a user subcommand.
///
/// # Errors
///
/// Returns an error if the API URL is invalid, the request fails, or the
/// form input is rejected.
pub async fn run(action: UserAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = UserService::new(&ClientConfig::from_env()?)?;

    match action {
        UserAction::List => print_json(&service.list_users().await?.data)?,
        UserAction::Get { id } => print_json(&service.get_user(&UserId::new(id)).await?.data)?,
        UserAction::ByUsername { username } => {
            print_json(&service.get_user_by_username(&username).await?.data)?;
        }
        UserAction::ByEmail { email } => {
            print_json(&service.get_user_by_email(&email).await?.data)?;
        }
        UserAction::Create {
            username,
            email,
            first_name,
            last_name,
        } => create(service, username, email, first_name, last_name).await?,
        UserAction::Update {
            id,
            username,
            email,
            first_name,
            last_name,
            inactive,
            password,
        } => {
            let draft = UserDraft {
                first_name,
                last_name,
                active: !inactive,
                password,
                ..UserDraft::new(username, email)
            };
            print_json(&service.update_user(&UserId::new(id), &draft).await?.data)?;
        }
        UserAction::Delete { id } => {
            let id = UserId::new(id);
            let mut dashboard = Dashboard::new(service);
            dashboard.delete_user(&id).await?;
            info!(user_id = %id, remaining = dashboard.state().users.len(), "User deleted");
        }
        UserAction::Activate { id } => {
            print_json(&service.activate_user(&UserId::new(id)).await?.data)?;
        }
        UserAction::Deactivate { id } => {
            print_json(&service.deactivate_user(&UserId::new(id)).await?.data)?;
        }
        UserAction::Search { first_name } => {
            print_json(&service.search_users(&first_name).await?.data)?;
        }
        UserAction::Count { inactive } => {
            print_json(&service.count_users(!inactive).await?.data)?;
        }
    }
    Ok(())
}

/// Fill in the form and submit it through the dashboard.
async fn create(
    service: UserService,
    username: String,
    email: String,
    first_name: Option<String>,
    last_name: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut dashboard = Dashboard::new(service);
    let form = dashboard.form_mut();
    form.change(FormField::Username, username.clone());
    form.change(FormField::Email, email);
    form.change(FormField::FirstName, first_name.unwrap_or_default());
    form.change(FormField::LastName, last_name.unwrap_or_default());

    match dashboard.submit_form().await {
        SubmitOutcome::Submitted => {
            print_json(&dashboard.last_created())?;
            // The create went through but the refetch did not.
            if let Some(message) = &dashboard.state().error {
                return Err(message.clone().into());
            }
            info!(%username, users = dashboard.state().users.len(), "User created");
            Ok(())
        }
        SubmitOutcome::Invalid => {
            for (field, message) in dashboard.form().errors().iter() {
                error!(field = field.name(), "{message}");
            }
            Err("form validation failed".into())
        }
        SubmitOutcome::Failed => Err(dashboard
            .state()
            .error
            .clone()
            .unwrap_or_else(|| "request failed".to_string())
            .into()),
    }
}
