use crate::core::catalog::ServerCatalog;
use crate::domain::model::{ServerDescriptor, SessionData};
use crate::domain::ports::SessionSource;
use crate::utils::error::{Result, UnblockError};

/// 依序嘗試候選伺服器，一次只有一個請求在進行
pub struct FailoverCoordinator<F: SessionSource> {
    fetcher: F,
}

impl<F: SessionSource> FailoverCoordinator<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// 洗牌一次，然後依該順序嘗試
    pub async fn acquire(&self, catalog: &ServerCatalog, auth: Option<&str>) -> Result<SessionData> {
        let candidates = catalog.shuffled();
        self.acquire_in_order(&candidates, auth).await
    }

    pub async fn acquire_in_order(
        &self,
        candidates: &[ServerDescriptor],
        auth: Option<&str>,
    ) -> Result<SessionData> {
        let mut last_failure = None;

        for (attempt, server) in candidates.iter().enumerate() {
            // NOTE: only the first candidate receives the saved auth token.
            // Failover requests go out anonymously, so the token is never
            // shown to more than one backend per cycle.
            let auth = if attempt == 0 { auth } else { None };

            match self.fetcher.fetch(server, auth).await {
                Ok(session) => {
                    tracing::info!(
                        "Session acquired from {} (attempt {}/{})",
                        server.device_type,
                        attempt + 1,
                        candidates.len()
                    );
                    return Ok(session);
                }
                Err(e) => {
                    if e.is_candidate_failure() {
                        tracing::warn!(
                            "Server {} failed ({}), trying next candidate",
                            server.device_type,
                            e
                        );
                    } else {
                        tracing::error!(
                            "Unexpected failure from {}: {}, trying next candidate",
                            server.device_type,
                            e
                        );
                    }
                    last_failure = Some(Box::new(e));
                }
            }
        }

        tracing::error!(
            "All {} servers failed; last error: {:?}",
            candidates.len(),
            last_failure
        );
        Err(UnblockError::AllServersExhausted {
            attempts: candidates.len(),
            last: last_failure,
        })
    }
}
