//! GraphQL access to the managed note API.

pub mod client;
pub mod queries;
pub mod store;

pub use client::GraphQlClient;
pub use store::AppSyncNoteStore;
