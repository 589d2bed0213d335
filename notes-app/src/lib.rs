//! Note-taking client for a managed GraphQL note API.
//!
//! The interesting part lives in [`sync`]: an optimistic local list kept close
//! to the remote store. The other modules sign the user in, talk to the API,
//! and render the form on the console.

pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod form;
pub mod graphql;
pub mod http;
pub mod session;
pub mod side_call;
pub mod sync;
