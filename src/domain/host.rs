//! Probe target validation
//!
//! Untrusted input must never reach the process spawn unvalidated. Targets
//! are accepted only if they parse as an IP literal or match a strict
//! RFC-1123 hostname grammar; everything else (including anything carrying
//! shell metacharacters) is rejected before a process exists to abuse.

use std::net::IpAddr;

/// Maximum total length of a hostname
const MAX_HOSTNAME_LEN: usize = 253;

/// Maximum length of a single DNS label
const MAX_LABEL_LEN: usize = 63;

/// Validate a probe target, returning the trimmed host on success.
pub fn validate(host: &str) -> Result<&str, String> {
    let host = host.trim();

    if host.is_empty() {
        return Err("host must not be empty".to_string());
    }

    // IP literals (v4 and v6) are fine as-is
    if host.parse::<IpAddr>().is_ok() {
        return Ok(host);
    }

    if host.len() > MAX_HOSTNAME_LEN {
        return Err(format!(
            "host exceeds {} characters",
            MAX_HOSTNAME_LEN
        ));
    }

    // RFC-1123: dot-separated labels of alphanumerics and interior hyphens
    for label in host.split('.') {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(format!("invalid hostname label in '{}'", host));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(format!("hostname label must not start or end with '-': '{}'", label));
        }
        if !label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-') {
            return Err(format!("host contains disallowed characters: '{}'", host));
        }
    }

    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_hostnames_and_ips() {
        for host in [
            "example.com",
            "sub.domain.example.com",
            "localhost",
            "my-host-1",
            "192.168.1.1",
            "8.8.8.8",
            "2001:db8::1",
            "::1",
        ] {
            assert!(validate(host).is_ok(), "should accept {}", host);
        }
    }

    #[test]
    fn test_rejects_shell_metacharacters() {
        for host in [
            "example.com; rm -rf /",
            "host | cat /etc/passwd",
            "a && b",
            "$(whoami)",
            "`id`",
            "host (x)",
            "a&b",
            "host$HOME",
        ] {
            assert!(validate(host).is_err(), "should reject {}", host);
        }
    }

    #[test]
    fn test_rejects_empty_and_whitespace() {
        assert!(validate("").is_err());
        assert!(validate("   ").is_err());
        assert!(validate("a b").is_err());
    }

    #[test]
    fn test_rejects_malformed_labels() {
        assert!(validate("-leading.example.com").is_err());
        assert!(validate("trailing-.example.com").is_err());
        assert!(validate("double..dot").is_err());
        assert!(validate(&"a".repeat(64)).is_err());
        assert!(validate(&format!("{}.com", "a.".repeat(130))).is_err());
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        assert_eq!(validate("  example.com  ").unwrap(), "example.com");
    }
}
