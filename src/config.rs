use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "inkwell", about = "Web front-end for the Inkwell blogging platform")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path to data directory
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Base URL of the Inkwell REST API
    #[arg(long)]
    pub api_url: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout. Requests never time out when unset.
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AuthConfig {
    pub cookie_name: String,
    pub remember_days: u64,
    /// Sessions kept only for the browser session are dropped after this long without use.
    pub volatile_idle_hours: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:6969".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "inkwell_user".to_string(),
            remember_days: 30,
            volatile_idle_hours: 12,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl AuthConfig {
    pub fn remember_secs(&self) -> u64 {
        self.remember_days.saturating_mul(24 * 3600)
    }

    pub fn volatile_idle(&self) -> Duration {
        Duration::from_secs(self.volatile_idle_hours.saturating_mul(3600))
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli)?;
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| data_dir.join("config.toml"));

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Config::default()
        };

        // CLI overrides
        if let Some(ref host) = cli.host {
            config.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.server.port = port;
        }
        if let Some(ref api_url) = cli.api_url {
            config.api.base_url = api_url.clone();
        }

        url::Url::parse(&config.api.base_url).map_err(|e| {
            anyhow::anyhow!("invalid api base_url {:?}: {}", config.api.base_url, e)
        })?;

        if config.database.path.is_none() {
            config.database.path = Some(data_dir.join("inkwell.db"));
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> anyhow::Result<PathBuf> {
        match cli.data_dir {
            Some(ref dir) => Ok(dir.clone()),
            None => dirs::home_dir()
                .map(|home| home.join(".inkwell"))
                .ok_or_else(|| anyhow::anyhow!("could not determine home directory")),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.database
            .path
            .clone()
            .unwrap_or_else(|| PathBuf::from("inkwell.db"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with(data_dir: &std::path::Path) -> Cli {
        Cli {
            config: None,
            host: None,
            port: None,
            data_dir: Some(data_dir.to_path_buf()),
            api_url: None,
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.api.base_url, "http://localhost:6969");
        assert!(config.api.timeout().is_none());
        assert_eq!(config.auth.cookie_name, "inkwell_user");
        assert_eq!(config.auth.remember_days, 30);
        assert_eq!(config.auth.volatile_idle(), Duration::from_secs(12 * 3600));
        assert!(config.database.path.is_none());
    }

    #[test]
    fn huge_durations_saturate() {
        let auth = AuthConfig {
            remember_days: u64::MAX,
            volatile_idle_hours: u64::MAX,
            ..AuthConfig::default()
        };
        assert_eq!(auth.remember_secs(), u64::MAX);
        assert_eq!(auth.volatile_idle(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn data_dir_uses_cli_override() {
        let cli = cli_with(std::path::Path::new("/tmp/test-inkwell"));
        assert_eq!(
            Config::data_dir(&cli).unwrap(),
            PathBuf::from("/tmp/test-inkwell")
        );
    }

    #[test]
    fn data_dir_defaults_to_home_dot_inkwell() {
        let cli = Cli {
            config: None,
            host: None,
            port: None,
            data_dir: None,
            api_url: None,
        };
        let dir = Config::data_dir(&cli).unwrap();
        assert!(dir.ends_with(".inkwell"));
    }

    #[test]
    fn load_with_no_config_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = Config::load(&cli_with(tmp.path())).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.db_path(), tmp.path().join("inkwell.db"));
    }

    #[test]
    fn load_reads_toml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
port = 9000

[api]
base_url = "https://api.inkwell.test"
timeout_secs = 15

[auth]
remember_days = 7
"#,
        )
        .unwrap();

        let mut cli = cli_with(tmp.path());
        cli.config = Some(config_path);
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.api.base_url, "https://api.inkwell.test");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.auth.remember_secs(), 7 * 24 * 3600);
        assert_eq!(config.auth.cookie_name, "inkwell_user");
    }

    #[test]
    fn cli_overrides_beat_toml_values() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
host = "192.168.1.1"
port = 9000

[api]
base_url = "https://api.inkwell.test"
"#,
        )
        .unwrap();

        let mut cli = cli_with(tmp.path());
        cli.host = Some("0.0.0.0".to_string());
        cli.port = Some(4000);
        cli.api_url = Some("http://10.0.0.5:6969".to_string());
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.api.base_url, "http://10.0.0.5:6969");
    }

    #[test]
    fn load_rejects_invalid_api_url() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cli = cli_with(tmp.path());
        cli.api_url = Some("not a url".to_string());
        assert!(Config::load(&cli).is_err());
    }
}
