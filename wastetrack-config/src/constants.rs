pub const DEFAULT_SERVER_HOST: &str = "0.0.0.0";
pub const DEFAULT_SERVER_PORT: u16 = 5000;
pub const DEFAULT_DATABASE_PORT: u16 = 5432;

pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;
pub const DEFAULT_MIN_CONNECTIONS: u32 = 0;
pub const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 30;

pub const CONFIG_PATH_ENV: &str = "WASTETRACK_CONFIG";
pub const DEFAULT_CONFIG_LOCATIONS: &[&str] =
    &["wastetrack.toml", "config/wastetrack.toml"];
