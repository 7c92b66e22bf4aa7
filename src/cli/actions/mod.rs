pub mod delete;
pub mod list;
pub mod login;
pub mod register;
pub mod rename;

// Internal "interpreter" for `Action`.
mod run;

use crate::passkey::{PasskeyError, PasskeyManager};

#[derive(Debug)]
pub enum Action {
    List(list::Args),
    Register(register::Args),
    Login(login::Args),
    Rename(rename::Args),
    Delete(delete::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}

/// Wraps a failed operation with the message stored in the session state, or
/// the error itself when nothing was stored.
fn failure(manager: &PasskeyManager, err: PasskeyError) -> anyhow::Error {
    let message = manager.store().error().unwrap_or_else(|| err.to_string());
    anyhow::Error::new(err).context(message)
}
