use crate::cli::globals::GlobalArgs;
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub name: String,
}

/// # Errors
/// Returns the classified failure if the passkey cannot be deleted.
pub async fn execute(args: Args) -> Result<()> {
    let manager = args.globals.manager()?;
    manager
        .delete_credential(&args.name)
        .await
        .map_err(|err| super::failure(&manager, err))?;

    println!("Deleted {}", args.name);
    super::list::print_credentials(&manager);

    Ok(())
}
