use crate::cli::globals::GlobalArgs;
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub name: String,
    pub display_name: String,
}

/// # Errors
/// Returns the classified failure if the passkey cannot be renamed.
pub async fn execute(args: Args) -> Result<()> {
    let manager = args.globals.manager()?;
    manager
        .update_credential_name(&args.name, &args.display_name)
        .await
        .map_err(|err| super::failure(&manager, err))?;

    super::list::print_credentials(&manager);

    Ok(())
}
