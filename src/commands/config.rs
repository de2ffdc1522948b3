//! Config command handler.

use leadflow::config::{CONFIG_PATH_ENV, DATA_DIR_ENV, LeadflowConfig};

/// Config command.
pub fn cmd_config(config: &LeadflowConfig) -> anyhow::Result<()> {
    println!("# Effective configuration");
    match LeadflowConfig::default_path() {
        Some(path) if path.exists() => println!("# default file: {}", path.display()),
        Some(path) => println!("# default file: {} (not present)", path.display()),
        None => println!("# default file: (no config dir)"),
    }
    println!("# overrides: ${CONFIG_PATH_ENV}, ${DATA_DIR_ENV}, --data-dir");
    println!();
    print!("{}", config.to_toml()?);
    Ok(())
}
