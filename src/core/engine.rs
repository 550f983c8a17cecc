use crate::config::{AppConfig, NotificationConfig};
use crate::core::catalog::ServerCatalog;
use crate::core::cookies::CookiePersister;
use crate::core::failover::FailoverCoordinator;
use crate::core::fetcher::HttpSessionFetcher;
use crate::core::login::{HttpLoginClient, LoginOrchestrator, LoginOutcome};
use crate::core::reload::{reload_active_tabs, UserAlerts};
use crate::domain::model::{StoredPreferences, TriggerMessage};
use crate::domain::ports::{LoginApi, Platform, SessionSource};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use reqwest::Client;
use tokio::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub session_id: String,
    pub login: LoginOutcome,
    pub tabs_reloaded: usize,
}

/// 一次完整的流程：取得 US session → 寫 cookie → 視需要登入 → 重新整理分頁
pub struct Localizer<F: SessionSource, L: LoginApi> {
    catalog: ServerCatalog,
    coordinator: FailoverCoordinator<F>,
    cookies: CookiePersister,
    login: LoginOrchestrator<L>,
    platform: Platform,
    alerts: UserAlerts,
    skip_expired_auth: bool,
    // 同一時間只跑一個流程，偏好設定的讀寫不會交錯
    in_flight: Mutex<()>,
}

impl Localizer<HttpSessionFetcher, HttpLoginClient> {
    pub fn from_config(config: &AppConfig, platform: Platform) -> Result<Self> {
        config.validate()?;

        let client = Client::builder().timeout(config.request_timeout()).build()?;
        let fetcher = HttpSessionFetcher::new(
            client.clone(),
            config.session.device_id.clone(),
            config.session.api_version.clone(),
        );
        let login_api = HttpLoginClient::new(client, config.login.endpoint.clone());

        Ok(Self::new(
            ServerCatalog::new(config.servers.clone()),
            fetcher,
            login_api,
            CookiePersister::new(config.cookies.host.clone()),
            &config.notifications,
            platform,
        )
        .with_skip_expired_auth(config.session.skip_expired_auth))
    }
}

impl<F: SessionSource, L: LoginApi> Localizer<F, L> {
    pub fn new(
        catalog: ServerCatalog,
        fetcher: F,
        login_api: L,
        cookies: CookiePersister,
        notifications: &NotificationConfig,
        platform: Platform,
    ) -> Self {
        let alerts = UserAlerts::new(platform.notifications.clone(), notifications);
        Self {
            catalog,
            coordinator: FailoverCoordinator::new(fetcher),
            cookies,
            login: LoginOrchestrator::new(login_api),
            platform,
            alerts,
            skip_expired_auth: true,
            in_flight: Mutex::new(()),
        }
    }

    pub fn with_skip_expired_auth(mut self, skip: bool) -> Self {
        self.skip_expired_auth = skip;
        self
    }

    pub async fn handle_message(&self, message: &TriggerMessage) -> Result<CycleOutcome> {
        self.localize(&message.msg).await
    }

    pub async fn localize(&self, extension: &str) -> Result<CycleOutcome> {
        let _guard = self.in_flight.lock().await;

        let target = self.cookies.target(extension)?;
        tracing::info!("Localizing {} to the US", target.domain);

        let preferences = match self.platform.storage.get().await {
            Ok(preferences) => preferences,
            Err(e) => {
                tracing::warn!("Could not read preferences, using defaults: {}", e);
                StoredPreferences::default()
            }
        };

        let auth = self.saved_auth(&preferences);
        if auth.is_some() {
            tracing::info!("Logging in using auth token...");
        }

        let session = match self.coordinator.acquire(&self.catalog, auth).await {
            Ok(session) => session,
            Err(e) => {
                self.alerts.notify_failure(&e);
                return Err(e);
            }
        };

        if let Err(e) = self
            .cookies
            .persist(self.platform.cookies.as_ref(), &target, &session)
            .await
        {
            tracing::error!("Cookie update failed: {}", e);
            self.alerts.notify_failure(&e);
            return Err(e);
        }

        let login = self
            .login
            .run(&session, &preferences, &self.platform, &self.alerts)
            .await;

        let tabs_reloaded = reload_active_tabs(self.platform.tabs.as_ref()).await;

        Ok(CycleOutcome {
            session_id: session.session_id,
            login,
            tabs_reloaded,
        })
    }

    fn saved_auth<'a>(&self, preferences: &'a StoredPreferences) -> Option<&'a str> {
        if !preferences.save_login {
            return None;
        }
        let login = preferences.login.as_ref()?;
        if self.skip_expired_auth && login.is_expired(chrono::Utc::now().fixed_offset()) {
            tracing::debug!("Saved auth token expired at {:?}, not forwarding it", login.expiration);
            return None;
        }
        Some(login.auth.as_str())
    }
}
