//! Work item change notifications for chat webhooks.
//!
//! [`projector`] turns a host work item into a [`document::Document`];
//! [`dispatch`] renders it as a markdown chat message and POSTs it to the
//! resolved webhook, best effort and at most once.

pub mod config;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod model;
pub mod projector;
