//! Config serialization to TOML
//!
//! Single source of truth for config file format.

use super::Config;

impl Config {
    /// Render the config as a commented TOML document
    pub fn to_toml(&self) -> String {
        format!(
            r#"# tavares configuration

# Base URL of the school API (TAVARES_API_URL overrides)
api_url = "{api_url}"

# Trust the backend's self-signed development certificate
accept_invalid_certs = {invalid_certs}

# Seconds before a request is abandoned
request_timeout_secs = {timeout}

# Theme: dark, light
theme = "{theme}"

# Interactive UI timing
[ui]
close_delay_ms = {close_delay}  # form stays open this long after a save
toast_secs = {toast_secs}

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
# File logging (in addition to TUI buffer or stderr)
file_enabled = {log_file_enabled}
file_dir = "{log_file_dir}"
file_rotation = "{log_file_rotation}"  # hourly, daily, never
file_prefix = "{log_file_prefix}"
"#,
            api_url = self.api_url,
            invalid_certs = self.accept_invalid_certs,
            timeout = self.request_timeout_secs,
            theme = self.theme.as_str(),
            close_delay = self.ui.close_delay_ms,
            toast_secs = self.ui.toast_secs,
            log_level = self.logging.level,
            log_file_enabled = self.logging.file_enabled,
            log_file_dir = self.logging.file_dir.display().to_string().replace('\\', "/"),
            log_file_rotation = self.logging.file_rotation.as_str(),
            log_file_prefix = self.logging.file_prefix,
        )
    }
}
