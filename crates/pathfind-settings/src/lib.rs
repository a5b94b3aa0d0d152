//! Settings collaborator for pathfind.
//!
//! The search core never holds user state. This crate owns what a search
//! dialog remembers between invocations: bounded input histories, the last
//! used toggles and scope, and the form being edited. A
//! [`SearchSessionDefaults`] value is created by the caller, handed to the
//! form layer and persisted as TOML.

mod defaults;
mod form;
mod history;

pub use defaults::{SearchSessionDefaults, SettingsError};
pub use form::{ControlState, ScopeChoice, SearchForm};
pub use history::{BoundedHistory, DEFAULT_HISTORY_CAPACITY};
