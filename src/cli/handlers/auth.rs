use std::path::Path;

use crate::backend::{Backend, BackendError};
use crate::cli::commands::{LoginArgs, SignupArgs, StrengthArgs};
use crate::cli::output::{session_to_json, strength_to_json};
use crate::ops::auth_ops::{self, PasswordStrength};

use super::{CmdResult, open_backend, read_stdin_line};

/// Password from the flag, or the first line of stdin
fn password_or_stdin(password: Option<String>) -> Result<String, std::io::Error> {
    match password {
        Some(p) => Ok(p),
        None => read_stdin_line(),
    }
}

pub fn cmd_login(args: LoginArgs, config_path: &Path, json: bool) -> CmdResult {
    let email = args.email.unwrap_or_default();
    let password = password_or_stdin(args.password)?;
    // reject an empty form before touching the config or the network
    auth_ops::validate_login(email.trim(), &password)?;

    let mut backend = open_backend(config_path)?;
    let session = auth_ops::login(&mut backend, email.trim(), &password)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&session_to_json(&session))?);
    } else {
        let n = auth_ops::login_notification(&Ok(session));
        println!("{} {}", n.title, n.description);
    }
    Ok(())
}

pub fn cmd_signup(args: SignupArgs, config_path: &Path, json: bool) -> CmdResult {
    let password = password_or_stdin(args.password)?;
    let name = args.name.trim();
    let email = args.email.trim();
    auth_ops::validate_signup(name, email, &password)?;

    let mut backend = open_backend(config_path)?;
    let result = auth_ops::signup(&mut backend, name, email, &password)?;
    if json {
        let session = result.as_ref().map(session_to_json);
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        let n = auth_ops::signup_notification(&Ok(result));
        println!("{} {}", n.title, n.description);
    }
    Ok(())
}

pub fn cmd_logout(config_path: &Path) -> CmdResult {
    let mut backend = open_backend(config_path)?;
    let n = auth_ops::logout(&mut backend);
    if n.is_failure() {
        return Err(n.description.into());
    }
    println!("{} {}", n.title, n.description);
    Ok(())
}

pub fn cmd_whoami(config_path: &Path, json: bool) -> CmdResult {
    let mut backend = open_backend(config_path)?;
    let session = backend
        .get_session()
        .ok_or_else(|| format!("{} (run `tf login`)", BackendError::NotAuthenticated))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&session_to_json(&session))?);
    } else {
        println!("{}", session.email.as_deref().unwrap_or(&session.user_id));
    }
    Ok(())
}

pub fn cmd_strength(args: StrengthArgs, json: bool) -> CmdResult {
    let password = password_or_stdin(args.password)?;
    let strength = PasswordStrength::classify(&password);
    if json {
        println!("{}", serde_json::to_string_pretty(&strength_to_json(strength))?);
    } else {
        match strength {
            Some(s) => println!("{}", s.label()),
            None => println!("(empty)"),
        }
    }
    Ok(())
}
