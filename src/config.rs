//! Fixed build-time configuration
//!
//! The appliance has no interactive surface: network credentials, the
//! collector endpoint, and every timing threshold are compiled in. The
//! network strings can be overridden at build time through environment
//! variables, mirroring how deployments bake in site credentials.

/// WiFi network name (override with `PULSE_TALLY_SSID`)
pub const WIFI_SSID: &str = match option_env!("PULSE_TALLY_SSID") {
    Some(ssid) => ssid,
    None => "KALFIX",
};

/// WiFi WPA2 password (override with `PULSE_TALLY_PASSWORD`)
pub const WIFI_PASSWORD: &str = match option_env!("PULSE_TALLY_PASSWORD") {
    Some(password) => password,
    None => "9988776655",
};

/// Collector host (override with `PULSE_TALLY_HOST`)
pub const COLLECTOR_HOST: &str = match option_env!("PULSE_TALLY_HOST") {
    Some(host) => host,
    None => "192.168.18.184",
};

/// Collector TCP port
pub const COLLECTOR_PORT: u16 = 5000;

/// Minimum spacing between two accepted sensor pulses
pub const DEBOUNCE_MS: u64 = 10;

/// Persist at least this often while the counter is changing
pub const SAVE_TIME_THRESHOLD_MS: u64 = 5000;

/// Persist whenever the counter advances this far past the last saved value
pub const SAVE_EVENT_THRESHOLD: u32 = 5;

/// Radio initialization retry interval
pub const RADIO_INIT_RETRY_MS: u64 = 10_000;

/// Association retry interval
pub const JOIN_RETRY_MS: u64 = 3_000;

/// Minimum spacing between delivery attempts
pub const DELIVERY_RETRY_MS: u64 = 5_000;

/// Consecutive delivery failures that force a reconnect cycle
pub const DELIVERY_FAILS_TO_RECONNECT: u8 = 3;

/// Clock snapshot refresh interval for the sampling loop
pub const CLOCK_REFRESH_MS: u64 = 1000;
