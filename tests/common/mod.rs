#![allow(dead_code)]

use async_trait::async_trait;
use cr_unblocker::config::NotificationConfig;
use cr_unblocker::core::catalog::ServerCatalog;
use cr_unblocker::core::cookies::CookiePersister;
use cr_unblocker::core::fetcher::HttpSessionFetcher;
use cr_unblocker::core::login::HttpLoginClient;
use cr_unblocker::domain::model::{
    CookieSpec, LoginRecord, Notification, PreferenceKey, ServerDescriptor, StoredPreferences,
    TabMessage, TabRef,
};
use cr_unblocker::domain::ports::{CookieJar, Decryptor, Notifier, PreferenceStore, TabMessenger};
use cr_unblocker::{Localizer, Platform, Result, UnblockError};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory browser platform that records every side effect in order.
#[derive(Default)]
pub struct RecordingPlatform {
    pub events: Mutex<Vec<String>>,
    pub preferences: Mutex<StoredPreferences>,
    pub cookies: Mutex<Vec<CookieSpec>>,
    pub notifications: Mutex<Vec<Notification>>,
    pub decrypt_calls: Mutex<usize>,
    pub decrypted_password: Option<String>,
    pub failing_cookie: Option<&'static str>,
}

impl RecordingPlatform {
    pub fn with_preferences(preferences: StoredPreferences) -> Arc<Self> {
        Arc::new(Self {
            preferences: Mutex::new(preferences),
            decrypted_password: Some("decrypted-secret".to_string()),
            ..Default::default()
        })
    }

    pub fn platform(self: &Arc<Self>) -> Platform {
        Platform {
            storage: self.clone(),
            cookies: self.clone(),
            notifications: self.clone(),
            tabs: self.clone(),
            decryptor: self.clone(),
        }
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl PreferenceStore for RecordingPlatform {
    async fn get(&self) -> Result<StoredPreferences> {
        Ok(self.preferences.lock().unwrap().clone())
    }

    async fn set_login(&self, login: &LoginRecord) -> Result<()> {
        self.push(format!("set_login:{}", login.auth));
        self.preferences.lock().unwrap().login = Some(login.clone());
        Ok(())
    }

    async fn remove(&self, keys: &[PreferenceKey]) -> Result<()> {
        for key in keys {
            self.push(format!("remove:{}", key.as_str()));
            let mut preferences = self.preferences.lock().unwrap();
            match key {
                PreferenceKey::SaveLogin => preferences.save_login = false,
                PreferenceKey::Login => preferences.login = None,
                PreferenceKey::LoginData => preferences.login_data = None,
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CookieJar for RecordingPlatform {
    async fn set_cookie(&self, cookie: &CookieSpec) -> Result<()> {
        if self.failing_cookie == Some(cookie.name.as_str()) {
            return Err(UnblockError::CookieError {
                message: format!("{} rejected by the browser", cookie.name),
            });
        }
        self.push(format!("cookie:{}", cookie.name));
        self.cookies.lock().unwrap().push(cookie.clone());
        Ok(())
    }
}

impl Notifier for RecordingPlatform {
    fn notify(&self, notification: &Notification) {
        self.push(format!("notify:{}", notification.message));
        self.notifications.lock().unwrap().push(notification.clone());
    }
}

#[async_trait]
impl TabMessenger for RecordingPlatform {
    async fn query_active_tabs(&self) -> Result<Vec<TabRef>> {
        Ok(vec![TabRef(11)])
    }

    async fn send_message(&self, tab: TabRef, message: &TabMessage) -> Result<()> {
        self.push(format!("{}:{}", message.msg, tab.0));
        Ok(())
    }
}

#[async_trait]
impl Decryptor for RecordingPlatform {
    async fn decrypt(&self, username: &str, _opaque: &serde_json::Value) -> Result<String> {
        *self.decrypt_calls.lock().unwrap() += 1;
        self.push(format!("decrypt:{}", username));
        self.decrypted_password
            .clone()
            .ok_or_else(|| UnblockError::DecryptError {
                message: "wrong key".to_string(),
            })
    }
}

pub fn descriptor(endpoint: String, device_type: &str) -> ServerDescriptor {
    ServerDescriptor {
        endpoint,
        device_type: device_type.to_string(),
        access_token: format!("token-{}", device_type),
    }
}

pub fn us_session(session_id: &str) -> serde_json::Value {
    serde_json::json!({
        "error": false,
        "data": {
            "session_id": session_id,
            "country_code": "US",
            "user": null,
            "auth": null,
            "expires": null
        }
    })
}

pub fn localizer(
    servers: Vec<ServerDescriptor>,
    login_endpoint: String,
    recorder: &Arc<RecordingPlatform>,
) -> Localizer<HttpSessionFetcher, HttpLoginClient> {
    localizer_with_timeout(servers, login_endpoint, recorder, Duration::from_secs(5))
}

pub fn localizer_with_timeout(
    servers: Vec<ServerDescriptor>,
    login_endpoint: String,
    recorder: &Arc<RecordingPlatform>,
    timeout: Duration,
) -> Localizer<HttpSessionFetcher, HttpLoginClient> {
    let fetcher = HttpSessionFetcher::with_timeout(timeout, "a", "1.0").unwrap();
    Localizer::new(
        ServerCatalog::new(servers),
        fetcher,
        HttpLoginClient::new(reqwest::Client::new(), login_endpoint),
        CookiePersister::new("crunchyroll"),
        &NotificationConfig::default(),
        recorder.platform(),
    )
}
