use crate::{
    cli::globals::GlobalArgs,
    passkey::{Credential, PasskeyManager},
};
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// # Errors
/// Returns the classified failure if the credential list cannot be loaded.
pub async fn execute(args: Args) -> Result<()> {
    let manager = args.globals.manager()?;
    manager
        .fetch_credentials()
        .await
        .map_err(|err| super::failure(&manager, err))?;

    print_credentials(&manager);

    Ok(())
}

pub(crate) fn print_credentials(manager: &PasskeyManager) {
    let credentials = manager.store().credentials();
    if credentials.is_empty() {
        println!("No passkeys registered");
        return;
    }

    for credential in &credentials {
        println!("{}", format_credential(credential));
    }
}

fn format_credential(credential: &Credential) -> String {
    let spec = &credential.spec;
    format!(
        "{}\t{}\tcreated {}\tlast used {}\t{}",
        credential.metadata.name,
        spec.display_name,
        spec.created_at,
        spec.last_used_at.as_deref().unwrap_or("never"),
        if spec.backed_up { "synced" } else { "device-bound" },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passkey::types::CredentialRecord;

    #[test]
    fn test_format_credential() {
        let credential = Credential::from(CredentialRecord {
            name: "passkey-abc".to_string(),
            credential_id: "cred-1".to_string(),
            display_name: Some("Laptop".to_string()),
            created_at: Some("2024-01-01T00:00:00Z".to_string()),
            backed_up: Some(true),
            ..CredentialRecord::default()
        });

        assert_eq!(
            format_credential(&credential),
            "passkey-abc\tLaptop\tcreated 2024-01-01T00:00:00Z\tlast used never\tsynced"
        );
    }
}
