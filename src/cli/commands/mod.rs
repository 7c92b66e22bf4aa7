pub mod logging;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_URL: &str = "url";
pub const ARG_ORIGIN: &str = "origin";
pub const ARG_SESSION: &str = "session";
pub const ARG_AUTHENTICATOR: &str = "authenticator";
pub const ARG_TIMEOUT: &str = "timeout";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("passkey")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(ARG_URL)
                .short('u')
                .long("url")
                .help("Server URL, example: https://blog.example.com")
                .env("PASSKEY_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_ORIGIN)
                .long("origin")
                .help("Origin sent with ceremonies (default: origin of --url)")
                .env("PASSKEY_ORIGIN"),
        )
        .arg(
            Arg::new(ARG_SESSION)
                .long("session")
                .help("Cookie header carrying the authenticated session, example: SESSION=...")
                .env("PASSKEY_SESSION")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_AUTHENTICATOR)
                .short('a')
                .long("authenticator")
                .help("Command that runs WebAuthn ceremonies over stdin/stdout JSON")
                .env("PASSKEY_AUTHENTICATOR"),
        )
        .arg(
            Arg::new(ARG_TIMEOUT)
                .short('t')
                .long("timeout")
                .help("HTTP request timeout in seconds")
                .default_value("10")
                .env("PASSKEY_TIMEOUT")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .subcommand(Command::new("list").about("List registered passkeys"))
        .subcommand(
            Command::new("register")
                .about("Register a new passkey")
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .help("Display name for the new passkey"),
                ),
        )
        .subcommand(
            Command::new("login")
                .about("Sign in with a passkey and print the server response")
                .arg(
                    Arg::new("username")
                        .long("username")
                        .help("Username hint; omit to use a discoverable credential"),
                ),
        )
        .subcommand(
            Command::new("rename")
                .about("Change the display name of a passkey")
                .arg(
                    Arg::new("name")
                        .help("Passkey resource name")
                        .required(true),
                )
                .arg(
                    Arg::new("display-name")
                        .help("New display name")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("delete").about("Delete a passkey").arg(
                Arg::new("name")
                    .help("Passkey resource name")
                    .required(true),
            ),
        );

    logging::with_args(command)
}
