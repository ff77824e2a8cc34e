//! CLI subcommand implementations.

pub mod create;
pub mod delete;
pub mod get;
pub mod interactive;
pub mod list;
pub mod update;

use anyhow::{anyhow, Error};
use persona_lib::DirectoryError;

/// Turns a directory failure into the message a user should read.
pub(crate) fn user_error(err: DirectoryError) -> Error {
    tracing::debug!("Directory error: {:?}", err);
    anyhow!(err.user_message())
}
