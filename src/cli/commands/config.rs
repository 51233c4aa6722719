//! Configuration command implementations

use crate::cli::{ConfigCommands, Output};
use crate::config::ScanImageConfig;
use anyhow::Result;

/// Execute config commands, returning the exit code
pub fn execute(cmd: ConfigCommands, config_path: Option<&str>, output: &Output) -> Result<i32> {
    match cmd {
        ConfigCommands::Init { force } => init(force, output),
        ConfigCommands::Validate => Ok(validate(config_path, output)),
        ConfigCommands::Show => show(config_path, output),
    }
}

fn init(force: bool, output: &Output) -> Result<i32> {
    let config_path = ScanImageConfig::project_config_path();

    if config_path.exists() && !force {
        output.warning(&format!("{} already exists", config_path.display()));
        if !output.confirm("Do you want to overwrite it?")? {
            output.info("Configuration initialization cancelled");
            return Ok(0);
        }
    }

    ScanImageConfig::default().save_to_file(&config_path)?;
    output.success(&format!("Wrote {}", config_path.display()));
    Ok(0)
}

fn validate(config_path: Option<&str>, output: &Output) -> i32 {
    match ScanImageConfig::load(config_path, None) {
        Ok(config) => {
            output.success("Configuration is valid");
            output.key_value("Extensions:", &config.scanner.extensions.join(", "), false);
            output.key_value(
                "Minimum size:",
                &format!("{}x{}", config.scanner.min_width, config.scanner.min_height),
                false,
            );
            output.key_value("Edge density:", &format!("> {}", config.scanner.edge_density_threshold), false);
            output.key_value("OCR language:", &config.ocr.language, false);
            0
        }
        Err(e) => {
            output.error(&format!("Configuration is invalid: {e:#}"));
            1
        }
    }
}

fn show(config_path: Option<&str>, output: &Output) -> Result<i32> {
    let config = ScanImageConfig::load(config_path, None)?;
    output.verbose("Merged from defaults, config files, environment and flags");
    // Plain TOML on stdout so it can be redirected into a config file
    print!("{}", config.to_toml_string()?);
    Ok(0)
}
