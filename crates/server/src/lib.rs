//! Full Stack Toolkit server library.
//!
//! The REST backend for `/api/users` and the `MongoDB` bootstrap, exposed as
//! a library so the CLI can seed the database and tests can drive the router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
