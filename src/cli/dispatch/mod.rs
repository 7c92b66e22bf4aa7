use crate::cli::{
    actions::{Action, delete, list, login, register, rename},
    commands::{ARG_AUTHENTICATOR, ARG_ORIGIN, ARG_SESSION, ARG_TIMEOUT, ARG_URL},
    globals::GlobalArgs,
};
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;
use std::time::Duration;

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = global_args(matches)?;

    let (name, sub_m) = matches.subcommand().context("missing subcommand")?;
    let required = |id: &str| -> Result<String> {
        sub_m
            .get_one::<String>(id)
            .cloned()
            .with_context(|| format!("missing required argument: {id}"))
    };

    let action = match name {
        "list" => Action::List(list::Args { globals }),
        "register" => Action::Register(register::Args {
            globals,
            display_name: sub_m.get_one::<String>("name").cloned(),
        }),
        "login" => Action::Login(login::Args {
            globals,
            username: sub_m.get_one::<String>("username").cloned(),
        }),
        "rename" => Action::Rename(rename::Args {
            globals,
            name: required("name")?,
            display_name: required("display-name")?,
        }),
        "delete" => Action::Delete(delete::Args {
            globals,
            name: required("name")?,
        }),
        other => return Err(anyhow!("unknown subcommand: {other}")),
    };

    Ok(action)
}

fn global_args(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let url = matches
        .get_one::<String>(ARG_URL)
        .cloned()
        .context("missing required argument: --url")?;
    let origin = matches.get_one::<String>(ARG_ORIGIN).cloned();

    let mut globals = GlobalArgs::new(url, origin)?;

    if let Some(session) = matches.get_one::<String>(ARG_SESSION) {
        globals.set_session(SecretString::from(session.clone()));
    }
    globals.authenticator = matches.get_one::<String>(ARG_AUTHENTICATOR).cloned();
    if let Some(timeout) = matches.get_one::<u64>(ARG_TIMEOUT) {
        globals.timeout = Duration::from_secs(*timeout);
    }

    Ok(globals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;

    fn matches(args: &[&str]) -> clap::ArgMatches {
        let mut argv = vec!["passkey", "--url", "https://blog.example.com"];
        argv.extend_from_slice(args);
        commands::new().get_matches_from(argv)
    }

    fn without_env<F: FnOnce()>(f: F) {
        temp_env::with_vars(
            [
                ("PASSKEY_URL", None::<String>),
                ("PASSKEY_ORIGIN", None),
                ("PASSKEY_SESSION", None),
                ("PASSKEY_AUTHENTICATOR", None),
                ("PASSKEY_TIMEOUT", None),
            ],
            f,
        );
    }

    #[test]
    fn test_list() {
        without_env(|| {
            let action = handler(&matches(&["list"])).unwrap();
            match action {
                Action::List(args) => {
                    assert_eq!(args.globals.origin, "https://blog.example.com");
                    assert_eq!(args.globals.timeout, Duration::from_secs(10));
                    assert!(args.globals.session.is_none());
                    assert!(args.globals.authenticator.is_none());
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn test_register_with_globals() {
        without_env(|| {
            let action = handler(&matches(&[
                "--session",
                "SESSION=abc",
                "--authenticator",
                "fido-helper",
                "--timeout",
                "3",
                "register",
                "--name",
                "Laptop",
            ]))
            .unwrap();
            match action {
                Action::Register(args) => {
                    assert_eq!(args.display_name.as_deref(), Some("Laptop"));
                    assert!(args.globals.session.is_some());
                    assert_eq!(args.globals.authenticator.as_deref(), Some("fido-helper"));
                    assert_eq!(args.globals.timeout, Duration::from_secs(3));
                }
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }

    #[test]
    fn test_login_without_username() {
        without_env(|| {
            let action = handler(&matches(&["login"])).unwrap();
            assert!(matches!(action, Action::Login(login::Args { username: None, .. })));
        });
    }

    #[test]
    fn test_rename_and_delete() {
        without_env(|| {
            match handler(&matches(&["rename", "passkey-abc", "Phone"])).unwrap() {
                Action::Rename(args) => {
                    assert_eq!(args.name, "passkey-abc");
                    assert_eq!(args.display_name, "Phone");
                }
                other => panic!("unexpected action: {other:?}"),
            }
            match handler(&matches(&["delete", "passkey-abc"])).unwrap() {
                Action::Delete(args) => assert_eq!(args.name, "passkey-abc"),
                other => panic!("unexpected action: {other:?}"),
            }
        });
    }
}
