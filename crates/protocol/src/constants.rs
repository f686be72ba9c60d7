use std::time::Duration;

/// API prefix the controller serves its JSON resources under.
pub const API_BASE_URL: &str = "api/v1";

/// Address of the controller when the dashboard host is joined to its
/// access point.
pub const DEFAULT_DEVICE_URL: &str = "http://192.168.4.1";

/// How often live telemetry is fetched.
pub const TELEMETRY_FETCH_INTERVAL: Duration = Duration::from_secs(10);

/// How often registration (identity, firmware version) is fetched.
///
/// Registration data only changes across reflashes, so it is polled far less
/// often than telemetry.
pub const REGISTRATION_FETCH_INTERVAL: Duration = Duration::from_secs(60);

/// Upper bound on a single request, so a hung connection surfaces as a
/// failed cycle instead of stalling it.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Resource name for live telemetry.
pub const TELEMETRY: &str = "telemetry";

/// Resource name for device registration.
pub const REGISTRATION: &str = "registration";

/// Endpoint path of the telemetry resource, relative to the API base.
pub const TELEMETRY_PATH: &str = "/telemetry";

/// Endpoint path of the registration resource, relative to the API base.
pub const REGISTRATION_PATH: &str = "/registration";

/// Resolves the base URL that resource paths are appended to.
///
/// An absolute `api_base_url` (`http://` or `https://`) is used as is.
/// A relative one is joined onto `device_url` with a single `/`.
pub fn resolve_base_url(device_url: &str, api_base_url: &str) -> String {
    let api = api_base_url.trim();
    if api.starts_with("http://") || api.starts_with("https://") {
        return api.trim_end_matches('/').to_string();
    }

    let device = device_url.trim().trim_end_matches('/');
    let api = api.trim_matches('/');
    if api.is_empty() {
        device.to_string()
    } else {
        format!("{device}/{api}")
    }
}

/// Joins a resource path onto a base URL without doubling the slash.
pub fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
