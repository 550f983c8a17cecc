use anyhow::Context;
use clap::Parser;
use cr_unblocker::adapters::{
    ConsoleTabs, FileCookieJar, JsonPreferenceStore, TracingNotifier, UnsupportedDecryptor,
};
use cr_unblocker::utils::{logger, validation::Validate};
use cr_unblocker::{AppConfig, CliConfig, Localizer, LoginOutcome, Platform, TriggerMessage};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose, cli.log_json);
    tracing::info!("Starting cr-unblocker");
    tracing::debug!("CLI config: {:?}", cli);

    // 載入並驗證配置
    let config = match &cli.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let platform = Platform {
        storage: Arc::new(JsonPreferenceStore::new(cli.preferences.clone())),
        cookies: Arc::new(FileCookieJar::new(cli.cookies.clone())),
        notifications: Arc::new(TracingNotifier),
        tabs: Arc::new(ConsoleTabs),
        decryptor: Arc::new(UnsupportedDecryptor),
    };
    let localizer = Localizer::from_config(&config, platform)?;

    let message = TriggerMessage {
        msg: cli.extension.clone(),
    };
    match localizer.handle_message(&message).await {
        Ok(outcome) => {
            tracing::info!("✅ Session localized to the US");
            if outcome.login == LoginOutcome::Failed {
                tracing::warn!("Saved login could not be restored");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Localization failed: {}", e);
            std::process::exit(2);
        }
    }
}
