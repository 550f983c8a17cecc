use crate::domain::model::{CookieSpec, Notification, TabMessage, TabRef};
use crate::domain::ports::{CookieJar, Decryptor, Notifier, TabMessenger};
use crate::utils::error::{Result, UnblockError};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;

/// 把 cookie 寫進 JSON 檔，同網域同名稱的 cookie 會被覆寫
#[derive(Debug)]
pub struct FileCookieJar {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileCookieJar {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn cookies(&self) -> Result<Vec<CookieSpec>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(UnblockError::CookieError {
                message: format!("{}: {}", self.path.display(), e),
            }),
        }
    }
}

#[async_trait]
impl CookieJar for FileCookieJar {
    async fn set_cookie(&self, cookie: &CookieSpec) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut cookies = self.cookies().await?;
        cookies.retain(|existing| !(existing.domain == cookie.domain && existing.name == cookie.name));
        cookies.push(cookie.clone());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let data = serde_json::to_vec_pretty(&cookies)?;
        tokio::fs::write(&self.path, data)
            .await
            .map_err(|e| UnblockError::CookieError {
                message: format!("{}: {}", self.path.display(), e),
            })
    }
}

/// 通知寫到日誌與 stderr
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        tracing::warn!("{}: {}", notification.title, notification.message);
        eprintln!("❌ {}", notification.message);
    }
}

/// 命令列沒有瀏覽器分頁：只有一個虛擬分頁，reload 訊息以 JSON 印到 stdout
#[derive(Debug, Default)]
pub struct ConsoleTabs;

#[async_trait]
impl TabMessenger for ConsoleTabs {
    async fn query_active_tabs(&self) -> Result<Vec<TabRef>> {
        Ok(vec![TabRef(0)])
    }

    async fn send_message(&self, _tab: TabRef, message: &TabMessage) -> Result<()> {
        println!("{}", serde_json::to_string(message)?);
        Ok(())
    }
}

/// 這個版本不支援加密密碼，遇到時登入失敗並請使用者手動登入
#[derive(Debug, Default)]
pub struct UnsupportedDecryptor;

#[async_trait]
impl Decryptor for UnsupportedDecryptor {
    async fn decrypt(&self, _username: &str, _opaque: &serde_json::Value) -> Result<String> {
        Err(UnblockError::DecryptError {
            message: "no decryption key available in this build".to_string(),
        })
    }
}
