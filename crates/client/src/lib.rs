//! Full Stack Toolkit client library.
//!
//! Everything a front end needs to manage users over the REST API:
//!
//! - [`service`] - one thin call per REST action (`UserService`, `UserApi`)
//! - [`form`] - the "create user" form with submit-time validation
//! - [`dashboard`] - the top-level state (user list, loading flag, error,
//!   form visibility) and the operations that mutate it
//!
//! # Example
//!
//! ```rust,no_run
//! use fullstack_client::{ClientConfig, Dashboard, UserService};
//!
//! # async fn run() -> Result<(), fullstack_client::ClientError> {
//! let service = UserService::new(&ClientConfig::from_env()?)?;
//! let mut dashboard = Dashboard::new(service);
//! dashboard.refresh().await;
//! println!("{} users", dashboard.state().users.len());
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod dashboard;
pub mod error;
pub mod form;
pub mod service;

pub use config::ClientConfig;
pub use dashboard::{Dashboard, DashboardState};
pub use error::ClientError;
pub use form::{FormView, SubmitOutcome};
pub use service::{ApiResponse, UserApi, UserService};
