use url::Url;

/// Validates a URL before it is passed to `open::that`.
///
/// Only `http` and `https` schemes are accepted. The catalog API may hand
/// us arbitrary format URLs, and shelling out to the system opener with a
/// `file://` or custom scheme is not something we want.
///
/// Returns a user-displayable error message on rejection.
pub fn validate_url_for_open(url_str: &str) -> Result<(), String> {
    let url = Url::parse(url_str).map_err(|e| format!("Invalid URL: {}", e))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!(
            "Refusing to open URL with scheme '{}' (only http/https allowed)",
            scheme
        )),
    }
}
