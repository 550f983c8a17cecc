use crate::domain::model::{CookieSpec, SessionData, LOCALE, LOCALE_COOKIE, SESSION_COOKIE};
use crate::domain::ports::CookieJar;
use crate::utils::error::{Result, UnblockError};
use crate::utils::logger::redact;
use crate::utils::validation::validate_domain_extension;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieTarget {
    pub url: String,
    pub domain: String,
}

/// 寫入 sess_id 與 c_locale 兩個 cookie
#[derive(Debug, Clone)]
pub struct CookiePersister {
    host: String,
}

impl CookiePersister {
    pub fn new(host: impl Into<String>) -> Self {
        Self { host: host.into() }
    }

    pub fn target(&self, extension: &str) -> Result<CookieTarget> {
        let domain = validate_domain_extension(&self.host, extension)?;
        Ok(CookieTarget {
            url: format!("http://{}", domain),
            domain,
        })
    }

    pub fn session_cookies(target: &CookieTarget, session: &SessionData) -> [CookieSpec; 2] {
        let cookie = |name: &str, value: &str| CookieSpec {
            url: target.url.clone(),
            name: name.to_string(),
            value: value.to_string(),
            domain: target.domain.clone(),
            http_only: true,
        };
        [
            cookie(SESSION_COOKIE, &session.session_id),
            cookie(LOCALE_COOKIE, LOCALE),
        ]
    }

    /// 先 session id 再語系；第一個完成後才寫第二個
    pub async fn persist(
        &self,
        jar: &dyn CookieJar,
        target: &CookieTarget,
        session: &SessionData,
    ) -> Result<()> {
        tracing::info!(
            "Got session id. Setting cookie {} on {}",
            redact(&session.session_id),
            target.domain
        );

        for cookie in Self::session_cookies(target, session) {
            jar.set_cookie(&cookie).await.map_err(|e| match e {
                e @ UnblockError::CookieError { .. } => e,
                other => UnblockError::CookieError {
                    message: format!("{}: {}", cookie.name, other),
                },
            })?;
            tracing::debug!("Cookie {} set", cookie.name);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct RecordingJar {
        cookies: Arc<Mutex<Vec<CookieSpec>>>,
        fail_on: Option<&'static str>,
    }

    #[async_trait]
    impl CookieJar for RecordingJar {
        async fn set_cookie(&self, cookie: &CookieSpec) -> Result<()> {
            if self.fail_on == Some(cookie.name.as_str()) {
                return Err(UnblockError::StorageError {
                    message: "cookie store unavailable".to_string(),
                });
            }
            self.cookies.lock().unwrap().push(cookie.clone());
            Ok(())
        }
    }

    fn session() -> SessionData {
        SessionData {
            session_id: "sess-789".to_string(),
            country_code: "US".to_string(),
            user: None,
            auth: None,
            expires: None,
        }
    }

    #[test]
    fn test_target_from_extension() {
        let persister = CookiePersister::new("crunchyroll");
        let target = persister.target(".com").unwrap();
        assert_eq!(target.url, "http://crunchyroll.com");
        assert_eq!(target.domain, "crunchyroll.com");
        assert!(matches!(
            persister.target("com"),
            Err(UnblockError::InvalidTrigger { .. })
        ));
    }

    #[tokio::test]
    async fn test_persist_sets_session_then_locale() {
        let jar = RecordingJar::default();
        let persister = CookiePersister::new("crunchyroll");
        let target = persister.target(".co.uk").unwrap();

        persister.persist(&jar, &target, &session()).await.unwrap();

        let cookies = jar.cookies.lock().unwrap().clone();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].name, "sess_id");
        assert_eq!(cookies[0].value, "sess-789");
        assert_eq!(cookies[1].name, "c_locale");
        assert_eq!(cookies[1].value, "enUS");
        for cookie in &cookies {
            assert_eq!(cookie.domain, "crunchyroll.co.uk");
            assert_eq!(cookie.url, "http://crunchyroll.co.uk");
            assert!(cookie.http_only);
        }
    }

    #[tokio::test]
    async fn test_locale_not_set_when_session_cookie_fails() {
        let jar = RecordingJar {
            fail_on: Some("sess_id"),
            ..Default::default()
        };
        let persister = CookiePersister::new("crunchyroll");
        let target = persister.target(".com").unwrap();

        let err = persister
            .persist(&jar, &target, &session())
            .await
            .unwrap_err();

        assert!(matches!(err, UnblockError::CookieError { .. }));
        assert!(jar.cookies.lock().unwrap().is_empty());
    }
}
