use crate::cli::globals::GlobalArgs;
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub display_name: Option<String>,
}

/// # Errors
/// Returns the classified failure if the registration ceremony does not complete.
pub async fn execute(args: Args) -> Result<()> {
    let manager = args.globals.manager()?;
    manager
        .register_passkey(args.display_name.as_deref())
        .await
        .map_err(|err| super::failure(&manager, err))?;

    println!("Passkey registered");
    super::list::print_credentials(&manager);

    Ok(())
}
