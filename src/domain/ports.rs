use crate::domain::model::{
    CookieSpec, LoginRecord, LoginResult, Notification, PreferenceKey,
    ServerDescriptor, SessionData, StoredPreferences, TabMessage, TabRef,
};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// 持久化的偏好設定（對應擴充功能的 storage.local）
#[async_trait]
pub trait PreferenceStore: Send + Sync {
    /// 讀取全部偏好設定，缺少的鍵使用預設值
    async fn get(&self) -> Result<StoredPreferences>;
    async fn set_login(&self, login: &LoginRecord) -> Result<()>;
    async fn remove(&self, keys: &[PreferenceKey]) -> Result<()>;
}

#[async_trait]
pub trait CookieJar: Send + Sync {
    async fn set_cookie(&self, cookie: &CookieSpec) -> Result<()>;
}

/// 通知是 fire-and-forget，不回報錯誤
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

#[async_trait]
pub trait TabMessenger: Send + Sync {
    async fn query_active_tabs(&self) -> Result<Vec<TabRef>>;
    async fn send_message(&self, tab: TabRef, message: &TabMessage) -> Result<()>;
}

#[async_trait]
pub trait Decryptor: Send + Sync {
    async fn decrypt(&self, username: &str, opaque: &serde_json::Value) -> Result<String>;
}

/// 取得單一候選伺服器的 session
#[async_trait]
pub trait SessionSource: Send + Sync {
    async fn fetch(&self, server: &ServerDescriptor, auth: Option<&str>) -> Result<SessionData>;
}

#[async_trait]
pub trait LoginApi: Send + Sync {
    async fn login(&self, session_id: &str, username: &str, password: &str)
        -> Result<LoginResult>;
}

/// 注入的平台能力，取代全域的 browser / chrome 物件
#[derive(Clone)]
pub struct Platform {
    pub storage: Arc<dyn PreferenceStore>,
    pub cookies: Arc<dyn CookieJar>,
    pub notifications: Arc<dyn Notifier>,
    pub tabs: Arc<dyn TabMessenger>,
    pub decryptor: Arc<dyn Decryptor>,
}
