use crate::cli::globals::GlobalArgs;
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub username: Option<String>,
}

/// Prints the backend's verify response as JSON.
///
/// # Errors
/// Returns the classified failure if the authentication ceremony does not complete.
pub async fn execute(args: Args) -> Result<()> {
    let manager = args.globals.manager()?;
    let response = manager
        .authenticate_with_passkey(args.username.as_deref())
        .await
        .map_err(|err| super::failure(&manager, err))?;

    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
