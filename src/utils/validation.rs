use crate::utils::error::{UnblockError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(UnblockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(UnblockError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(UnblockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UnblockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(UnblockError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 驗證網域後綴（例如 ".com"、".co.uk"），並回傳 cookie 目標主機名稱
pub fn validate_domain_extension(host: &str, extension: &str) -> Result<String> {
    if !extension.starts_with('.') || extension.len() < 2 {
        return Err(UnblockError::InvalidTrigger {
            reason: format!("domain extension must start with '.', got '{}'", extension),
        });
    }

    let domain = format!("{}{}", host, extension);
    let url = Url::parse(&format!("http://{}", domain)).map_err(|e| {
        UnblockError::InvalidTrigger {
            reason: format!("'{}' is not a valid host: {}", domain, e),
        }
    })?;

    // 後綴不能夾帶路徑、連接埠或帳號資訊
    if url.host_str() != Some(domain.to_ascii_lowercase().as_str()) || url.port().is_some() {
        return Err(UnblockError::InvalidTrigger {
            reason: format!("'{}' is not a plain host name", domain),
        });
    }

    Ok(domain)
}
