//! Interactive mode for the server.
//!
//! Prompts for the bind address, port and SMS gateway before starting
//! the server.

use dialoguer::{Confirm, Input};

/// Runs the server in interactive mode, prompting for configuration.
///
/// Asks for a bind address, port and optional SMS gateway URL, sets the
/// corresponding environment variables (`BIND_ADDR`, `PORT`,
/// `SMS_GATEWAY_URL`), and delegates to [`super::run_server`].
///
/// # Errors
///
/// Returns an `std::io::Result` error if the underlying server fails to
/// start.
#[allow(clippy::future_not_send)]
pub async fn run() -> std::io::Result<()> {
    println!("Highway Emergency Response Server");
    println!();

    let bind_addr: String = Input::new()
        .with_prompt("Bind address")
        .default("127.0.0.1".to_string())
        .interact_text()
        .unwrap_or_else(|_| "127.0.0.1".to_string());

    let port_str: String = Input::new()
        .with_prompt("Port")
        .default("8080".to_string())
        .interact_text()
        .unwrap_or_else(|_| "8080".to_string());

    let gateway_url: String = Input::new()
        .with_prompt("SMS gateway URL (blank to only log alerts)")
        .allow_empty(true)
        .interact_text()
        .unwrap_or_default();

    // SAFETY: We are single-threaded at this point (before server starts) and
    // these variables are only read once during server initialisation.
    unsafe {
        std::env::set_var("BIND_ADDR", &bind_addr);
        std::env::set_var("PORT", &port_str);
        if !gateway_url.trim().is_empty() {
            std::env::set_var("SMS_GATEWAY_URL", gateway_url.trim());
        }
    }

    if !Confirm::new()
        .with_prompt(format!("Start server on {bind_addr}:{port_str}?"))
        .default(true)
        .interact()
        .unwrap_or(true)
    {
        println!("Cancelled.");
        return Ok(());
    }

    super::run_server().await
}
