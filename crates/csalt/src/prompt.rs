//! Interactive terminal prompts.

use dialoguer::Input;
use secrecy::SecretString;

use csalt_core::PasswordPrompt;

use crate::error::CliError;

/// Reads passwords from the controlling terminal without echo.
pub struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_password(&mut self, user: &str, attempt: u32) -> std::io::Result<SecretString> {
        if attempt == 1 {
            eprintln!("Authentication is required for {user}");
        } else {
            eprintln!("Incorrect user/password, try again");
        }
        rpassword::prompt_password("Enter Password: ").map(SecretString::from)
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Prompt {
        message: e.to_string(),
    }
}

/// Ask for the API username when none is configured.
pub fn prompt_username() -> Result<String, CliError> {
    eprintln!("User configuration missing");
    let user: String = Input::new()
        .with_prompt("Enter Username")
        .interact_text()
        .map_err(prompt_err)?;

    let user = user.trim();
    if user.is_empty() {
        return Err(CliError::Validation {
            field: "username".into(),
            reason: "username cannot be empty".into(),
        });
    }
    Ok(user.to_owned())
}
