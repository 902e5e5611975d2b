use std::path::Path;

use crate::cli::commands::ConfigAction;
use crate::cli::output::{format_config, redact_key};
use crate::io::config_io;

use super::CmdResult;

pub fn cmd_config(action: ConfigAction, config_path: &Path, json: bool) -> CmdResult {
    match action {
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
        ConfigAction::Show => {
            let config = config_io::load_config(config_path)?;
            if json {
                let mut shown = config.clone();
                shown.backend.anon_key = redact_key(&shown.backend.anon_key);
                println!("{}", serde_json::to_string_pretty(&shown)?);
            } else {
                print!("{}", format_config(&config)?);
            }
        }
        ConfigAction::Set { key, value } => {
            config_io::update_config_file(config_path, &key, &value)?;
            tracing::info!(key = %key, path = %config_path.display(), "config updated");
            println!("{key} = {value}");
        }
    }
    Ok(())
}
