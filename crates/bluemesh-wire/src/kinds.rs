//! Well-known type codes carried in mesh and configuration records.
//!
//! Configuration types select the layout of a [`ConfigRecord`](crate::ConfigRecord)
//! payload; hub message types select the layout of a
//! [`HubMessage`](crate::HubMessage) payload.

/// Value written into every reserved alignment byte.
pub const RESERVED: u8 = 0x00;

/// Device name (UTF-8).
pub const CONFIG_TYPE_NAME: u8 = 0x00;
/// Device type.
pub const CONFIG_TYPE_DEVICE_TYPE: u8 = 0x01;
/// Room identifier.
pub const CONFIG_TYPE_ROOM: u8 = 0x02;
/// Floor identifier.
pub const CONFIG_TYPE_FLOOR: u8 = 0x03;
/// Nearby timeout.
pub const CONFIG_TYPE_NEARBY_TIMEOUT: u8 = 0x04;
/// PWM frequency.
pub const CONFIG_TYPE_PWM_FREQUENCY: u8 = 0x05;
/// iBeacon major.
pub const CONFIG_TYPE_IBEACON_MAJOR: u8 = 0x06;
/// iBeacon minor.
pub const CONFIG_TYPE_IBEACON_MINOR: u8 = 0x07;
/// iBeacon proximity UUID.
pub const CONFIG_TYPE_IBEACON_PROXIMITY_UUID: u8 = 0x08;
/// iBeacon calibrated RSSI.
pub const CONFIG_TYPE_IBEACON_RSSI: u8 = 0x09;
/// Wi-Fi credentials.
pub const CONFIG_TYPE_WIFI: u8 = 0x0A;
/// Radio TX power.
pub const CONFIG_TYPE_TX_POWER: u8 = 0x0B;
/// Advertisement interval.
pub const CONFIG_TYPE_ADV_INTERVAL: u8 = 0x0C;
/// Pairing passkey.
pub const CONFIG_TYPE_PASSKEY: u8 = 0x0D;
/// Minimum environment temperature.
pub const CONFIG_TYPE_MIN_ENV_TEMP: u8 = 0x0E;
/// Maximum environment temperature.
pub const CONFIG_TYPE_MAX_ENV_TEMP: u8 = 0x0F;

/// Hub message carrying a list of scanned devices.
pub const SCAN_MESSAGE: u16 = 101;

/// Mesh data channel for outgoing command messages.
pub const CHANNEL_DATA: u8 = 0x02;
/// Mesh command: set PWM value.
pub const MESH_TYPE_PWM: u16 = 0x01;
/// Mesh command: beacon configuration.
pub const MESH_TYPE_BEACON_CONFIG: u16 = 0x02;

/// Returns a human-readable name for a configuration type.
pub fn config_type_name(kind: u8) -> &'static str {
    match kind {
        CONFIG_TYPE_NAME => "NAME",
        CONFIG_TYPE_DEVICE_TYPE => "DEVICE_TYPE",
        CONFIG_TYPE_ROOM => "ROOM",
        CONFIG_TYPE_FLOOR => "FLOOR",
        CONFIG_TYPE_NEARBY_TIMEOUT => "NEARBY_TIMEOUT",
        CONFIG_TYPE_PWM_FREQUENCY => "PWM_FREQUENCY",
        CONFIG_TYPE_IBEACON_MAJOR => "IBEACON_MAJOR",
        CONFIG_TYPE_IBEACON_MINOR => "IBEACON_MINOR",
        CONFIG_TYPE_IBEACON_PROXIMITY_UUID => "IBEACON_PROXIMITY_UUID",
        CONFIG_TYPE_IBEACON_RSSI => "IBEACON_RSSI",
        CONFIG_TYPE_WIFI => "WIFI",
        CONFIG_TYPE_TX_POWER => "TX_POWER",
        CONFIG_TYPE_ADV_INTERVAL => "ADV_INTERVAL",
        CONFIG_TYPE_PASSKEY => "PASSKEY",
        CONFIG_TYPE_MIN_ENV_TEMP => "MIN_ENV_TEMP",
        CONFIG_TYPE_MAX_ENV_TEMP => "MAX_ENV_TEMP",
        _ => "UNKNOWN",
    }
}

/// Returns a human-readable name for a hub message type.
pub fn hub_message_name(kind: u16) -> &'static str {
    match kind {
        SCAN_MESSAGE => "SCAN_RESULT",
        _ => "UNKNOWN",
    }
}
