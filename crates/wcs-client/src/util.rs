//! URL and encoding helpers

use base64::{engine::general_purpose::URL_SAFE, Engine as _};

/// URL-safe base64 (`-` and `_`, padded)
pub fn urlsafe_base64_encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE.encode(data)
}

/// Normalize the scheme of `url`.
///
/// With `ishttps` set, `http://` becomes `https://`. A URL with no scheme gets
/// `https://` or `http://` accordingly.
pub fn https_check(url: &str, ishttps: bool) -> String {
    if let Some(rest) = url.strip_prefix("http://") {
        if ishttps {
            return format!("https://{}", rest);
        }
        return url.to_string();
    }
    if url.starts_with("https://") {
        return url.to_string();
    }
    let scheme = if ishttps { "https" } else { "http" };
    format!("{}://{}", scheme, url)
}
