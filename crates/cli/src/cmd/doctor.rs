use promptvars_core::config::{ConfigLoader, default_config_path};
use std::path::Path;

pub fn run(config: Option<&Path>) {
    match ConfigLoader::load(config) {
        Ok(rc) => {
            crate::logging::init(&rc.logging);
            tracing::debug!("configuration resolved");

            println!("OK   pv doctor");
            println!("{}", promptvars_core::doctor_stub());
            println!(
                "path: {}",
                rc.source.as_ref().map_or_else(
                    || format!("{} (not found, using defaults)", default_config_path().display()),
                    |p| p.display().to_string()
                )
            );
            println!("storage: {}", rc.storage_path.display());
            println!("export_dir: {}", rc.export_dir.display());
            println!("limits.max_value_length: {}", rc.limits.max_value_length);
            println!(
                "limits.max_interactive_value_length: {}",
                rc.limits.max_interactive_value_length
            );
            println!("logging.level: {}", rc.logging.level);
            if let Some(file) = &rc.logging.file {
                println!("logging.file: {}", file.display());
            }
        }
        Err(e) => {
            println!("FAIL pv doctor");
            println!("{e}");
            if config.is_none() {
                println!("looked for: {}", default_config_path().display());
            }
            std::process::exit(1);
        }
    }
}
