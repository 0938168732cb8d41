//! Matching user-typed tokens against device records.
//!
//! Matching is exact: a token either names the device (case-insensitively)
//! or equals the host part of its location. There is no partial matching.

use crate::device::Device;

/// True if the token equals the device's name, ignoring case.
///
/// Devices without a name never match by name.
pub fn matches_name(device: &Device, token: &str) -> bool {
    !device.name.is_empty() && device.name.to_lowercase() == token.to_lowercase()
}

/// True if the token equals the host part of the device's location.
pub fn matches_host(device: &Device, token: &str) -> bool {
    device.host() == token
}

/// True if the token matches the device by name or by host.
///
/// # Examples
///
/// ```
/// use yeelight_lan::{Device, matches};
///
/// let mut device = Device::new("192.168.1.5:55443");
/// device.set_name("bedroom");
///
/// assert!(matches(&device, "Bedroom"));
/// assert!(matches(&device, "192.168.1.5"));
/// assert!(!matches(&device, "192.168.1.5:55443"));
/// ```
pub fn matches(device: &Device, token: &str) -> bool {
    matches_name(device, token) || matches_host(device, token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bedroom() -> Device {
        let mut device = Device::new("192.168.1.5:55443");
        device.name = "bedroom".into();
        device
    }

    #[test]
    fn test_matches_name_any_case() {
        assert!(matches(&bedroom(), "bedroom"));
        assert!(matches(&bedroom(), "Bedroom"));
        assert!(matches(&bedroom(), "BEDROOM"));
    }

    #[test]
    fn test_matches_host_only() {
        assert!(matches(&bedroom(), "192.168.1.5"));
        assert!(!matches(&bedroom(), "192.168.1.5:55443"));
        assert!(!matches(&bedroom(), "192.168.1.50"));
    }

    #[test]
    fn test_no_partial_match() {
        assert!(!matches(&bedroom(), "kitchen"));
        assert!(!matches(&bedroom(), "bed"));
    }

    #[test]
    fn test_mixed_case_stored_name_still_matches() {
        let mut device = Device::new("192.168.1.5:55443");
        device.name = "Bedroom".into();
        assert!(matches_name(&device, "bedroom"));
        assert!(matches_name(&device, "BEDROOM"));
    }

    #[test]
    fn test_unnamed_device_needs_host() {
        let device = Device::new("10.0.0.9:55443");
        assert!(!matches_name(&device, ""));
        assert!(matches_host(&device, "10.0.0.9"));
    }
}
