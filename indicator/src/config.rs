use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Root settings structure. Deserialized from the per-user config.toml
/// (see [`crate::paths::config_file_path`]).
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Ordered list of monitorable processes; the CLI selects one by index.
    #[serde(default)]
    pub processes: Vec<ProcessEntry>,
}

/// One monitorable process.
#[derive(Debug, Deserialize, Clone)]
pub struct ProcessEntry {
    /// Executable name without a path (e.g. "firefox"). The platform
    /// executable suffix is optional: "foo" also matches "foo.exe".
    pub name: String,
}

impl Settings {
    /// Returns the entry at `index`, or an error naming the valid range.
    pub fn select(&self, index: usize) -> Result<&ProcessEntry> {
        self.processes.get(index).ok_or_else(|| {
            anyhow!(
                "The settings file only has {} items, starting with index 0",
                self.processes.len()
            )
        })
    }
}

/// Loads the settings file at `path`. A missing, unreadable or malformed
/// file is an error: the monitor must not start without a process list.
pub fn load(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_settings(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        (dir, path)
    }

    // ── load ──────────────────────────────────────────────────────────────────

    #[test]
    fn load_parses_process_list_in_order() {
        let (_dir, path) = write_settings(
            r#"
[[processes]]
name = "firefox"

[[processes]]
name = "code"
"#,
        );
        let settings = load(&path).unwrap();
        assert_eq!(settings.processes.len(), 2);
        assert_eq!(settings.processes[0].name, "firefox");
        assert_eq!(settings.processes[1].name, "code");
    }

    #[test]
    fn load_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nonexistent.toml");
        assert!(load(&path).is_err());
    }

    #[test]
    fn load_invalid_toml_is_an_error() {
        let (_dir, path) = write_settings("this is not valid toml ][[[");
        assert!(load(&path).is_err());
    }

    #[test]
    fn load_empty_file_yields_empty_list() {
        let (_dir, path) = write_settings("");
        let settings = load(&path).unwrap();
        assert!(settings.processes.is_empty());
    }

    // ── select ────────────────────────────────────────────────────────────────

    #[test]
    fn select_returns_entry_at_index() {
        let (_dir, path) = write_settings(
            "[[processes]]\nname = \"firefox\"\n[[processes]]\nname = \"code\"\n",
        );
        let settings = load(&path).unwrap();
        assert_eq!(settings.select(1).unwrap().name, "code");
    }

    #[test]
    fn select_out_of_range_names_the_valid_range() {
        let (_dir, path) = write_settings(
            "[[processes]]\nname = \"firefox\"\n[[processes]]\nname = \"code\"\n",
        );
        let settings = load(&path).unwrap();
        let err = settings.select(5).unwrap_err().to_string();
        assert!(
            err.contains("2 items, starting with index 0"),
            "unexpected message: {err}"
        );
    }

    #[test]
    fn select_on_empty_list_is_an_error() {
        let settings = Settings { processes: Vec::new() };
        let err = settings.select(0).unwrap_err().to_string();
        assert!(err.contains("0 items"));
    }
}
