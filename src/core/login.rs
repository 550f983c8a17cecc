use crate::core::reload::UserAlerts;
use crate::domain::model::{
    ApiEnvelope, LoginData, LoginRecord, LoginResult, Password, PreferenceKey, SessionData,
    StoredPreferences, Timestamp, LOCALE,
};
use crate::domain::ports::{LoginApi, Platform};
use crate::utils::error::{Result, UnblockError};
use async_trait::async_trait;
use reqwest::Client;

/// 帳號密碼登入 API
pub struct HttpLoginClient {
    client: Client,
    endpoint: String,
}

impl HttpLoginClient {
    pub fn new(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    async fn request(&self, session_id: &str, username: &str, password: &str) -> Result<LoginResult> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("session_id", session_id),
                ("locale", LOCALE),
                ("account", username),
                ("password", password),
            ])
            .send()
            .await?;

        let status = response.status();
        let envelope: ApiEnvelope<LoginResult> = match response.json().await {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(UnblockError::Transport {
                    status: status.as_u16(),
                })
            }
            Err(e) => return Err(e.into()),
        };

        if envelope.error {
            return Err(UnblockError::LoginError {
                message: envelope
                    .message
                    .unwrap_or_else(|| "login rejected".to_string()),
            });
        }

        envelope.data.ok_or_else(|| UnblockError::LoginError {
            message: "login response carried no data".to_string(),
        })
    }
}

#[async_trait]
impl LoginApi for HttpLoginClient {
    async fn login(&self, session_id: &str, username: &str, password: &str) -> Result<LoginResult> {
        self.request(session_id, username, password)
            .await
            .map_err(|e| match e {
                e @ UnblockError::LoginError { .. } => e,
                other => UnblockError::LoginError {
                    message: other.to_string(),
                },
            })
    }
}

/// 取得 session 之後要做什麼
#[derive(Debug, Clone, PartialEq)]
pub enum LoginDecision {
    /// 使用者沒有選擇保存登入
    Skip,
    /// session 已帶有登入中的使用者，只需保存新的 auth
    PersistSessionAuth,
    CredentialLogin(LoginData),
}

pub fn decide(session: &SessionData, preferences: &StoredPreferences) -> LoginDecision {
    if !preferences.save_login {
        return LoginDecision::Skip;
    }
    if session.is_authenticated() {
        return LoginDecision::PersistSessionAuth;
    }
    match &preferences.login_data {
        Some(login_data) => LoginDecision::CredentialLogin(login_data.clone()),
        None => LoginDecision::Skip,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Skipped,
    SessionAuthenticated { expires: Option<Timestamp> },
    LoggedIn { expires: Option<Timestamp> },
    Failed,
}

/// 登入狀態機：NeedDecrypt → LoggingIn → 結束
enum LoginStep {
    NeedDecrypt {
        username: String,
        opaque: serde_json::Value,
    },
    LoggingIn {
        username: String,
        password: String,
    },
}

pub struct LoginOrchestrator<L: LoginApi> {
    api: L,
}

impl<L: LoginApi> LoginOrchestrator<L> {
    pub fn new(api: L) -> Self {
        Self { api }
    }

    /// 在兩個 cookie 都寫入之後執行；失敗只通知使用者，不中斷流程
    pub async fn run(
        &self,
        session: &SessionData,
        preferences: &StoredPreferences,
        platform: &Platform,
        alerts: &UserAlerts,
    ) -> LoginOutcome {
        match decide(session, preferences) {
            LoginDecision::Skip => {
                tracing::debug!("No login needed");
                LoginOutcome::Skipped
            }
            LoginDecision::PersistSessionAuth => {
                tracing::info!("Logged in until {:?}", session.expires);
                match &session.auth {
                    Some(auth) => {
                        let record = LoginRecord {
                            auth: auth.clone(),
                            expiration: session.expires,
                        };
                        persist_login(platform, &record).await;
                    }
                    None => tracing::warn!("Session has a user but no auth token, nothing saved"),
                }
                LoginOutcome::SessionAuthenticated {
                    expires: session.expires,
                }
            }
            LoginDecision::CredentialLogin(login_data) => {
                tracing::info!("Logging in using username/password");
                match self
                    .credential_login(&session.session_id, login_data, platform)
                    .await
                {
                    Ok(result) => {
                        tracing::info!("User logged in until {:?}", result.expires);
                        persist_login(platform, &LoginRecord::from(&result)).await;
                        LoginOutcome::LoggedIn {
                            expires: result.expires,
                        }
                    }
                    Err(e) => {
                        tracing::error!("Login failed: {}", e);
                        alerts.notify_failure(&e);
                        LoginOutcome::Failed
                    }
                }
            }
        }
    }

    async fn credential_login(
        &self,
        session_id: &str,
        login_data: LoginData,
        platform: &Platform,
    ) -> Result<LoginResult> {
        let LoginData { username, password } = login_data;

        let mut step = match password {
            Password::Plain(password) => {
                // 明文密碼不再保留，之後改存 auth token
                if let Err(e) = platform.storage.remove(&[PreferenceKey::LoginData]).await {
                    tracing::warn!("Could not remove plaintext login data: {}", e);
                }
                LoginStep::LoggingIn { username, password }
            }
            Password::Encrypted(opaque) => LoginStep::NeedDecrypt { username, opaque },
        };

        loop {
            step = match step {
                LoginStep::NeedDecrypt { username, opaque } => {
                    let password = platform
                        .decryptor
                        .decrypt(&username, &opaque)
                        .await
                        .map_err(|e| match e {
                            e @ UnblockError::DecryptError { .. } => e,
                            other => UnblockError::DecryptError {
                                message: other.to_string(),
                            },
                        })?;
                    LoginStep::LoggingIn { username, password }
                }
                LoginStep::LoggingIn { username, password } => {
                    return self.api.login(session_id, &username, &password).await;
                }
            };
        }
    }
}

async fn persist_login(platform: &Platform, record: &LoginRecord) {
    if let Err(e) = platform.storage.set_login(record).await {
        tracing::error!("Could not save login token: {}", e);
    }
}
