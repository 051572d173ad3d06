/// Canonical location of the uptray settings file.
///
/// The file lives under the per-user configuration directory:
///   - Linux:   ~/.config/uptray/config.toml
///   - Windows: %APPDATA%\uptray\config.toml
use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR_NAME: &str = "uptray";
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns the full path to the settings file.
pub fn config_file_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine the user configuration directory")?;
    Ok(base.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_path_has_correct_name() {
        let path = config_file_path().unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }

    #[test]
    fn config_file_path_is_inside_app_dir() {
        let path = config_file_path().unwrap();
        assert_eq!(path.parent().unwrap().file_name().unwrap(), APP_DIR_NAME);
    }
}
