//! Placeholder substitution for mapping keys and string values.

use std::path::Path;

use tracing::warn;

use crate::error::ConfigError;

/// Token replaced in mapping keys with the machine hostname.
pub const HOSTNAME_TOKEN: &str = "$hostname";

/// Token replaced in string values with the published hostname.
pub const PUBLIC_HOSTNAME_TOKEN: &str = "$public_hostname";

/// Default location of the published-hostname file.
pub const DEFAULT_PUBLIC_HOSTNAME_FILE: &str = "/etc/public-hostname";

/// Replace [`HOSTNAME_TOKEN`] in a mapping key with the machine hostname.
///
/// Keys without the token are returned unchanged without touching the OS.
/// A hostname that cannot be resolved is fatal.
pub fn substitute_key(key: &str) -> Result<String, ConfigError> {
    if !key.contains(HOSTNAME_TOKEN) {
        return Ok(key.to_string());
    }
    let hostname = nix::unistd::gethostname()
        .map_err(|errno| ConfigError::HostnameResolution(errno.to_string()))?;
    Ok(key.replace(HOSTNAME_TOKEN, &hostname.to_string_lossy()))
}

/// Replace [`PUBLIC_HOSTNAME_TOKEN`] in a string value with the trimmed
/// contents of `source`.
///
/// An unreadable file leaves the value unsubstituted; binding continues.
pub fn substitute_value(value: &str, source: &Path) -> String {
    if !value.contains(PUBLIC_HOSTNAME_TOKEN) {
        return value.to_string();
    }
    match std::fs::read_to_string(source) {
        Ok(contents) => value.replace(PUBLIC_HOSTNAME_TOKEN, contents.trim()),
        Err(err) => {
            warn!(
                file = %source.display(),
                %err,
                "public hostname file unreadable, leaving value unsubstituted"
            );
            value.to_string()
        }
    }
}
