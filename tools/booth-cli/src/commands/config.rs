//! Show or initialize configuration.

use photobooth_common::config::{config_file_path, AppConfig};

pub fn run(config: &AppConfig, init: bool) -> anyhow::Result<()> {
    let path = config_file_path();
    if init {
        if path.exists() {
            println!("Config already exists: {}", path.display());
        } else {
            AppConfig::default().save()?;
            println!("Wrote default config: {}", path.display());
        }
        return Ok(());
    }

    println!("# {}", path.display());
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
