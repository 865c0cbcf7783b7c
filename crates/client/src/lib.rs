//! Client side of the task manager: an HTTP binding to the task API, an
//! observable store that mirrors the server's task list, and text views
//! rendering that store.

pub mod api;
pub mod models;
pub mod store;
pub mod views;
