use std::time::Duration;

/// Top-level command keyword and its short alias
pub const COMMAND_KEYWORD: &str = "amongus";
pub const COMMAND_ALIAS: &str = "au";

/// Default path of the settings document
pub const DEFAULT_SETTINGS_PATH: &str = "resources/settings.json";

/// Default path of the channel-binding storage file
pub const DEFAULT_STORAGE_PATH: &str = "resources/storage.json";

/// How often the channel registry is written back to disk
pub const STORAGE_SAVE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "crewmute=info";
