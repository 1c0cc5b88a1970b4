//! Device Enumeration
//!
//! **The order of `DeviceKind::ALL` is the device code used at training time.**
//! Reordering it silently corrupts every ordinal-encoded prediction, which is
//! why it feeds the layout hash in `layout.rs`.

use serde::{Deserialize, Serialize};

/// Closed set of supported medical device categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceKind {
    #[serde(rename = "ECG Monitor")]
    EcgMonitor,
    #[serde(rename = "Ventilator")]
    Ventilator,
    #[serde(rename = "Infusion Pump")]
    InfusionPump,
    #[serde(rename = "Ultrasound Scanner")]
    UltrasoundScanner,
    #[serde(rename = "X-Ray Machine")]
    XRayMachine,
    #[serde(rename = "Defibrillator")]
    Defibrillator,
    #[serde(rename = "Patient Monitor")]
    PatientMonitor,
    #[serde(rename = "Anesthesia Machine")]
    AnesthesiaMachine,
}

/// Number of device categories
pub const DEVICE_COUNT: usize = 8;

impl DeviceKind {
    /// All devices, in device-code order
    pub const ALL: [DeviceKind; DEVICE_COUNT] = [
        DeviceKind::EcgMonitor,        // 0
        DeviceKind::Ventilator,        // 1
        DeviceKind::InfusionPump,      // 2
        DeviceKind::UltrasoundScanner, // 3
        DeviceKind::XRayMachine,       // 4
        DeviceKind::Defibrillator,     // 5
        DeviceKind::PatientMonitor,    // 6
        DeviceKind::AnesthesiaMachine, // 7
    ];

    /// Display name (the string the wire contract and training data use)
    pub fn name(self) -> &'static str {
        match self {
            DeviceKind::EcgMonitor => "ECG Monitor",
            DeviceKind::Ventilator => "Ventilator",
            DeviceKind::InfusionPump => "Infusion Pump",
            DeviceKind::UltrasoundScanner => "Ultrasound Scanner",
            DeviceKind::XRayMachine => "X-Ray Machine",
            DeviceKind::Defibrillator => "Defibrillator",
            DeviceKind::PatientMonitor => "Patient Monitor",
            DeviceKind::AnesthesiaMachine => "Anesthesia Machine",
        }
    }

    /// Integer position in `ALL`
    pub fn code(self) -> u8 {
        // ALL is small and const; position always exists
        Self::ALL.iter().position(|d| *d == self).unwrap_or(0) as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Strict lookup by display name, snake_case key or case-insensitive name
    pub fn lookup(name: &str) -> Option<Self> {
        let trimmed = name.trim();
        Self::ALL.iter().copied().find(|d| {
            d.name() == trimmed
                || d.name().eq_ignore_ascii_case(trimmed)
                || d.key() == trimmed
        })
    }

    /// snake_case key, e.g. `x_ray_machine`
    pub fn key(self) -> String {
        self.name()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect()
    }

    /// Names in code order
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|d| d.name()).collect()
    }
}

impl Default for DeviceKind {
    fn default() -> Self {
        DeviceKind::ALL[0]
    }
}

impl std::fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed device identifier. Unrecognized strings are kept, not aliased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Device {
    Known(DeviceKind),
    Unknown(String),
}

impl Device {
    pub fn parse(name: &str) -> Self {
        match DeviceKind::lookup(name) {
            Some(kind) => Device::Known(kind),
            None => Device::Unknown(name.to_string()),
        }
    }

    pub fn kind(&self) -> Option<DeviceKind> {
        match self {
            Device::Known(kind) => Some(*kind),
            Device::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Device::Known(_))
    }
}

impl From<DeviceKind> for Device {
    fn from(kind: DeviceKind) -> Self {
        Device::Known(kind)
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Device::Known(kind) => f.write_str(kind.name()),
            Device::Unknown(raw) => write!(f, "{} (unknown)", raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_codes_match_training_order() {
        let expected = [
            ("ECG Monitor", 0),
            ("Ventilator", 1),
            ("Infusion Pump", 2),
            ("Ultrasound Scanner", 3),
            ("X-Ray Machine", 4),
            ("Defibrillator", 5),
            ("Patient Monitor", 6),
            ("Anesthesia Machine", 7),
        ];
        for (name, code) in expected {
            let kind = DeviceKind::lookup(name).unwrap();
            assert_eq!(kind.code(), code, "{}", name);
            assert_eq!(DeviceKind::from_code(code), Some(kind));
        }
        assert_eq!(DeviceKind::ALL.len(), DEVICE_COUNT);
    }

    #[test]
    fn test_lookup_variants() {
        assert_eq!(DeviceKind::lookup("x-ray machine"), Some(DeviceKind::XRayMachine));
        assert_eq!(DeviceKind::lookup("x_ray_machine"), Some(DeviceKind::XRayMachine));
        assert_eq!(DeviceKind::lookup(" Ventilator "), Some(DeviceKind::Ventilator));
        assert_eq!(DeviceKind::lookup("Ventilater"), None);
        assert_eq!(DeviceKind::lookup(""), None);
    }

    #[test]
    fn test_unknown_device_is_surfaced() {
        let device = Device::parse("MRI Scanner");
        assert_eq!(device, Device::Unknown("MRI Scanner".to_string()));
        assert!(!device.is_known());
        assert_eq!(device.kind(), None);
    }

    #[test]
    fn test_serde_uses_display_names() {
        let json = serde_json::to_string(&DeviceKind::InfusionPump).unwrap();
        assert_eq!(json, "\"Infusion Pump\"");
        let back: DeviceKind = serde_json::from_str("\"Patient Monitor\"").unwrap();
        assert_eq!(back, DeviceKind::PatientMonitor);
    }
}
