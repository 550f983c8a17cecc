use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Cookie 與登入 API 使用的語系，固定為美國英文
pub const LOCALE: &str = "enUS";

pub const SESSION_COOKIE: &str = "sess_id";
pub const LOCALE_COOKIE: &str = "c_locale";

pub type Timestamp = DateTime<FixedOffset>;

/// 使用者資料保持不透明，只關心是否存在
pub type UserRef = serde_json::Value;

/// 一台可取得 session 的候選伺服器
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDescriptor {
    pub endpoint: String,
    pub device_type: String,
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: String,
    pub country_code: String,
    // 缺少 user 鍵與 user: null 一樣視為未登入
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub auth: Option<String>,
    #[serde(default)]
    pub expires: Option<Timestamp>,
}

impl SessionData {
    pub fn is_authenticated(&self) -> bool {
        self.user.as_ref().is_some_and(|user| !user.is_null())
    }
}

/// 後端的共同回應外殼：`{ error, message, data }`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// 儲存的密碼：字串是明文，其他任何 JSON 形式都視為加密後的不透明資料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Password {
    Plain(String),
    Encrypted(serde_json::Value),
}

impl Password {
    pub fn is_plaintext(&self) -> bool {
        matches!(self, Password::Plain(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginData {
    pub username: String,
    pub password: Password,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRecord {
    pub auth: String,
    #[serde(default)]
    pub expiration: Option<Timestamp>,
}

impl LoginRecord {
    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expiration.is_some_and(|expiration| expiration <= now)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPreferences {
    #[serde(default)]
    pub save_login: bool,
    #[serde(default)]
    pub login: Option<LoginRecord>,
    #[serde(default)]
    pub login_data: Option<LoginData>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    SaveLogin,
    Login,
    LoginData,
}

impl PreferenceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PreferenceKey::SaveLogin => "saveLogin",
            PreferenceKey::Login => "login",
            PreferenceKey::LoginData => "loginData",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResult {
    #[serde(default)]
    pub user: Option<UserRef>,
    pub auth: String,
    #[serde(default)]
    pub expires: Option<Timestamp>,
}

impl From<&LoginResult> for LoginRecord {
    fn from(result: &LoginResult) -> Self {
        Self {
            auth: result.auth.clone(),
            expiration: result.expires,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieSpec {
    pub url: String,
    pub name: String,
    pub value: String,
    pub domain: String,
    pub http_only: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub icon: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabRef(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabMessage {
    pub msg: String,
}

impl TabMessage {
    pub fn reload() -> Self {
        Self {
            msg: "reload".to_string(),
        }
    }
}

/// 內容腳本送來的觸發訊息，`msg` 是目前網域的後綴
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerMessage {
    pub msg: String,
}
