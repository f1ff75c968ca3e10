//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use mqlib_cli::CliError;

#[expect(
    clippy::print_stderr,
    reason = "the binary reports fatal errors on stderr"
)]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    if let Err(err) = mqlib_cli::run() {
        if let CliError::ArgumentParsing(parse) = &err {
            parse.exit();
        }
        eprintln!("mqlib: {err}");
        std::process::exit(1);
    }
}
