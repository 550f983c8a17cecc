use crate::config::NotificationConfig;
use crate::domain::model::{Notification, TabMessage};
use crate::domain::ports::{Notifier, TabMessenger};
use crate::utils::error::UnblockError;
use std::sync::Arc;

/// 對目前視窗的作用中分頁送出 reload 訊息，回傳成功送達的分頁數
pub async fn reload_active_tabs(tabs: &dyn TabMessenger) -> usize {
    tracing::info!("Done!");

    let active = match tabs.query_active_tabs().await {
        Ok(active) => active,
        Err(e) => {
            tracing::error!("Could not query active tabs: {}", e);
            return 0;
        }
    };

    let message = TabMessage::reload();
    let mut reloaded = 0;
    for tab in active {
        tracing::debug!("Reload tab {} via content script", tab.0);
        match tabs.send_message(tab, &message).await {
            Ok(()) => reloaded += 1,
            Err(e) => tracing::warn!("Reload message to tab {} failed: {}", tab.0, e),
        }
    }
    reloaded
}

/// 以固定標題與圖示發出錯誤通知
#[derive(Clone)]
pub struct UserAlerts {
    notifier: Arc<dyn Notifier>,
    title: String,
    icon: String,
}

impl UserAlerts {
    pub fn new(notifier: Arc<dyn Notifier>, config: &NotificationConfig) -> Self {
        Self {
            notifier,
            title: config.title.clone(),
            icon: config.icon.clone(),
        }
    }

    pub fn notify(&self, message: impl Into<String>) {
        self.notifier.notify(&Notification {
            title: self.title.clone(),
            message: message.into(),
            icon: self.icon.clone(),
        });
    }

    pub fn notify_failure(&self, error: &UnblockError) {
        self.notify(error.user_friendly_message());
    }
}
