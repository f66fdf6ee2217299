//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use otl_core::Config;

use crate::output::Output;

/// Show the current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load()?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "config_file": Config::config_file_path(),
                "data_dir": config.data_dir,
                "suggestion_limit": config.suggestion_limit,
            })
        );
    } else {
        println!("Config file:      {}", Config::config_file_path().display());
        println!("data_dir:         {}", config.data_dir.display());
        println!("suggestion_limit: {}", config.suggestion_limit);
    }
    Ok(())
}

/// Set a configuration value and save it
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load()?;

    match key.as_str() {
        "data_dir" => config.data_dir = PathBuf::from(&value),
        "suggestion_limit" => {
            config.suggestion_limit = value
                .parse()
                .context("suggestion_limit must be a number")?;
        }
        _ => bail!("Unknown configuration key: {} (expected data_dir or suggestion_limit)", key),
    }

    config.save()?;
    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}
