use std::fs;
use std::path::PathBuf;

use url::Url;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("SCHEDULE_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("schedule").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// API base URL: `--server`, then `SCHEDULE_API_URL`, then the local default
pub fn resolve_server_url(flag: Option<&str>) -> anyhow::Result<Url> {
    let env_value = std::env::var("SCHEDULE_API_URL").ok();
    pick_server_url(flag, env_value.as_deref())
}

fn pick_server_url(flag: Option<&str>, env_value: Option<&str>) -> anyhow::Result<Url> {
    let raw = flag
        .or(env_value)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_SERVER_URL);

    let url = Url::parse(raw).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => anyhow::bail!("Unsupported server URL scheme '{}'", other),
    }
}
