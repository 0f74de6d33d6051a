// Application constants

/// Notification title is this prefix followed by the probe name
pub const NOTIFY_TITLE_PREFIX: &str = "Hypnos-";

/// Notification body sent on every fire
pub const NOTIFY_MESSAGE: &str = "Downtime complete";

/// Extension of per-probe log files
pub const LOG_EXTENSION: &str = "log";

/// Wait interval used when neither flags nor presets give one
pub const DEFAULT_DURATION: &str = "1h";
