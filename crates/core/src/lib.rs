//! Full Stack Toolkit Core - Shared types library.
//!
//! This crate provides common types used across all toolkit components:
//! - `server` - REST backend serving `/api/users` over `MongoDB`
//! - `client` - API client, form model and list orchestration
//! - `cli` - Command-line tools for seeding and user management
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows it
//! to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and emails
//! - [`user`] - User documents and the create/update draft
//! - [`product`] - Product documents
//! - [`form`] - The user form and its submit-time validation
//! - [`validation`] - Field limits and validation error types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod form;
pub mod product;
pub mod types;
pub mod user;
pub mod validation;

pub use form::{FormErrors, FormField, UserForm};
pub use product::Product;
pub use types::*;
pub use user::{User, UserDraft, ValidDraft};
pub use validation::{FieldError, ValidationErrors};
