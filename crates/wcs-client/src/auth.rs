//! Management API request signing

use crate::{config::Settings, util::urlsafe_base64_encode, ClientError, Result};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use sha1::Sha1;
use std::fmt;
use url::Url;

use crate::config::mask_secret;

type HmacSha1 = Hmac<Sha1>;

/// Form body content type used by the management API
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Access/secret key pair
#[derive(Clone)]
pub struct Auth {
    access_key: String,
    secret_key: String,
}

impl Auth {
    pub fn new(access_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            secret_key: secret_key.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.access_key.clone(), settings.secret_key.clone())
    }

    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    /// Token for a management request: `access_key:base64url(hex(hmac_sha1(path[?query]\nbody)))`
    pub fn management_token(&self, url: &str, body: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        let mut signing = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            signing.push('?');
            signing.push_str(query);
        }
        signing.push('\n');
        signing.push_str(body);

        let mut mac = HmacSha1::new_from_slice(self.secret_key.as_bytes())
            .map_err(|e| ClientError::Config(format!("invalid secret key: {}", e)))?;
        mac.update(signing.as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());

        Ok(format!("{}:{}", self.access_key, urlsafe_base64_encode(digest)))
    }

    /// Headers for a signed form POST
    pub fn headers(&self, url: &str, body: &str) -> Result<HeaderMap> {
        let token = self.management_token(url, body)?;
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&token)
                .map_err(|e| ClientError::Config(format!("invalid access key: {}", e)))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        Ok(headers)
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("access_key", &mask_secret(&self.access_key))
            .field("secret_key", &mask_secret(&self.secret_key))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_management_token() {
        let auth = Auth::new("AK", "SK");
        let token = auth
            .management_token("http://mgr.example.com/fmgr/move", "fops=a")
            .unwrap();
        assert_eq!(
            token,
            "AK:NTc2NTM3ZTAyMjgzYjE4OTk4OTA1ZGIxMTNjYTFhODg1YzI4OWY3ZQ=="
        );
    }

    #[test]
    fn test_query_is_signed() {
        let auth = Auth::new("AK", "SK");
        let plain = auth.management_token("http://m/fmgr/status", "").unwrap();
        let with_query = auth
            .management_token("http://m/fmgr/status?persistentId=1", "")
            .unwrap();
        assert_ne!(plain, with_query);
    }

    #[test]
    fn test_headers() {
        let headers = Auth::new("AK", "SK").headers("http://m/fmgr/copy", "fops=x").unwrap();
        assert!(headers[AUTHORIZATION].to_str().unwrap().starts_with("AK:"));
        assert_eq!(headers[CONTENT_TYPE], FORM_CONTENT_TYPE);
    }

    #[test]
    fn test_invalid_url() {
        assert!(Auth::new("AK", "SK").management_token("not a url", "").is_err());
    }

    #[test]
    fn test_debug_hides_secret() {
        let rendered = format!("{:?}", Auth::new("ACCESSKEY", "SECRETKEY"));
        assert!(!rendered.contains("SECRETKEY"));
        assert!(!rendered.contains("ACCESSKEY"));
    }
}
