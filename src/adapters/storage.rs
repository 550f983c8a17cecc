use crate::domain::model::{LoginRecord, PreferenceKey, StoredPreferences};
use crate::domain::ports::PreferenceStore;
use crate::utils::error::{Result, UnblockError};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::PathBuf;
use tokio::sync::Mutex;

/// 以 JSON 檔保存偏好設定，檔案不存在時視為全部預設值
///
/// 寫入只動到指定的鍵，檔案中其他設定原樣保留。
#[derive(Debug)]
pub struct JsonPreferenceStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonPreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_map(&self) -> Result<Map<String, Value>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(UnblockError::StorageError {
                    message: format!("{}: {}", self.path.display(), e),
                })
            }
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Map::new());
        }

        let value: Value = serde_json::from_slice(&bytes)?;
        match value {
            Value::Object(map) => Ok(map),
            other => Err(UnblockError::StorageError {
                message: format!(
                    "{}: expected a JSON object, found {}",
                    self.path.display(),
                    other
                ),
            }),
        }
    }

    async fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_vec_pretty(map)?;
        tokio::fs::write(&self.path, data).await?;
        Ok(())
    }

    async fn update<F>(&self, change: F) -> Result<()>
    where
        F: FnOnce(&mut Map<String, Value>) + Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut map = self.read_map().await?;
        change(&mut map);
        self.write_map(&map).await
    }
}

#[async_trait]
impl PreferenceStore for JsonPreferenceStore {
    async fn get(&self) -> Result<StoredPreferences> {
        let map = self.read_map().await?;
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    async fn set_login(&self, login: &LoginRecord) -> Result<()> {
        let login = serde_json::to_value(login)?;
        self.update(move |map| {
            map.insert(PreferenceKey::Login.as_str().to_string(), login);
        })
        .await
    }

    async fn remove(&self, keys: &[PreferenceKey]) -> Result<()> {
        let keys = keys.to_vec();
        self.update(move |map| {
            for key in keys {
                map.remove(key.as_str());
            }
        })
        .await
    }
}
