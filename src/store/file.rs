use super::{RecordStore, StoreError};
use crate::catalog::ToolRecord;
use serde_json::Value;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Dataset kept as a pretty-printed JSON array on disk
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "dataset.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn invalid(&self, message: impl Into<String>) -> StoreError {
        StoreError::InvalidFormat {
            path: self.path.clone(),
            message: message.into(),
        }
    }
}

impl RecordStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ToolRecord>, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No dataset at {}, starting empty", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        if contents.trim().is_empty() {
            debug!("Dataset file {} is empty", self.path.display());
            return Ok(Vec::new());
        }

        let value: Value =
            serde_json::from_str(&contents).map_err(|e| self.invalid(e.to_string()))?;
        if !value.is_array() {
            return Err(self.invalid("expected a JSON array of tool records"));
        }

        let records: Vec<ToolRecord> =
            serde_json::from_value(value).map_err(|e| self.invalid(e.to_string()))?;
        info!(
            "Loaded {} record(s) from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }

    fn save(&self, records: &[ToolRecord]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let contents = serde_json::to_string_pretty(records)?;
        let temp = self.temp_path();
        fs::write(&temp, contents).map_err(|e| self.io_error(e))?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(self.io_error(e));
        }

        info!("Saved {} record(s) to {}", records.len(), self.path.display());
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample() -> Vec<ToolRecord> {
        vec![
            ToolRecord::new("Kimi")
                .with_url("https://kimi.moonshot.cn")
                .with_category("AI聊天助手")
                .with_tags(["chat", "long-context"]),
            ToolRecord::new("Cursor").with_description("AI code editor"),
        ]
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("tools.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("data").join("tools.json");
        let store = JsonFileStore::new(&path);

        store.save(&sample()).unwrap();

        assert!(path.exists());
        assert!(!store.temp_path().exists());
        assert_eq!(store.load().unwrap(), sample());
    }

    #[test]
    fn test_saved_file_is_pretty_utf8() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("tools.json"));
        store.save(&sample()).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.contains("AI聊天助手"));
        assert!(contents.contains("\n  {"));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(&path, r#"[{"name": "Kimi"}]"#).unwrap();

        let records = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(records, vec![ToolRecord::new("Kimi")]);
    }

    #[test]
    fn test_null_fields_load_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(
            &path,
            r#"[{"name": "Kimi", "description": null, "tags": null}, {"name": "Cursor"}]"#,
        )
        .unwrap();

        let records = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(records, vec![ToolRecord::new("Kimi"), ToolRecord::new("Cursor")]);
    }

    #[test]
    fn test_unmodelled_keys_survive_save() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(
            &path,
            r#"[{"id": 7, "name": "Kimi", "url": "https://kimi.moonshot.cn", "categoryId": 3, "isActive": true, "rating": 4.5}]"#,
        )
        .unwrap();
        let store = JsonFileStore::new(&path);

        let records = store.load().unwrap();
        store.save(&records).unwrap();

        let saved: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved[0]["id"], 7);
        assert_eq!(saved[0]["categoryId"], 3);
        assert_eq!(saved[0]["isActive"], true);
        assert_eq!(saved[0]["rating"], 4.5);
        assert_eq!(saved[0]["name"], "Kimi");
    }

    #[test]
    fn test_corrupted_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(&path, "[{\"name\": ").unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::InvalidFormat { .. }));
    }

    #[test]
    fn test_non_array_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(&path, r#"{"tools": []}"#).unwrap();

        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("expected a JSON array"));
    }

    #[test]
    fn test_save_replaces_previous_dataset() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("tools.json"));

        store.save(&sample()).unwrap();
        store.save(&[ToolRecord::new("Only")]).unwrap();

        assert_eq!(store.load().unwrap(), vec![ToolRecord::new("Only")]);
    }
}
