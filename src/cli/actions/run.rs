use crate::cli::actions::{Action, delete, list, login, register, rename};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::List(args) => list::execute(args).await,
        Action::Register(args) => register::execute(args).await,
        Action::Login(args) => login::execute(args).await,
        Action::Rename(args) => rename::execute(args).await,
        Action::Delete(args) => delete::execute(args).await,
    }
}
