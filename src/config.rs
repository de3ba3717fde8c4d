use clap::Parser;
use rand::Rng;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "quill", about = "A small server-rendered blog")]
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
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
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
    /// Cookie-signing secret. Loaded from (or generated into)
    /// `<data-dir>/secret` when not set explicitly.
    pub secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            cookie_name: "user_id".to_string(),
            secret: None,
        }
    }
}

impl Config {
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let data_dir = Self::data_dir(cli);
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

        // Resolve paths relative to data dir
        if config.database.path.is_none() {
            config.database.path = Some(data_dir.join("quill.db"));
        }

        // Resolve the signing secret: config value wins, otherwise read the
        // secret file, generating one on first boot.
        if config.auth.secret.is_none() {
            config.auth.secret = Some(load_or_create_secret(&data_dir)?);
        }

        Ok(config)
    }

    pub fn data_dir(cli: &Cli) -> PathBuf {
        cli.data_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .expect("Could not determine home directory")
                .join(".quill")
        })
    }

    pub fn db_path(&self) -> &PathBuf {
        self.database.path.as_ref().unwrap()
    }

    pub fn secret(&self) -> &str {
        self.auth.secret.as_deref().unwrap()
    }
}

fn load_or_create_secret(data_dir: &std::path::Path) -> anyhow::Result<String> {
    let path = data_dir.join("secret");
    if path.exists() {
        let secret = std::fs::read_to_string(&path)?;
        return Ok(secret.trim().to_string());
    }

    let bytes: [u8; 32] = rand::thread_rng().gen();
    let secret = hex::encode(bytes);
    std::fs::create_dir_all(data_dir)?;
    std::fs::write(&path, &secret)?;
    tracing::info!("Generated new cookie-signing secret at {}", path.display());
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(data_dir: Option<PathBuf>) -> Cli {
        Cli {
            config: None,
            host: None,
            port: None,
            data_dir,
        }
    }

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.auth.cookie_name, "user_id");
        assert!(config.auth.secret.is_none());
        assert!(config.database.path.is_none());
    }

    #[test]
    fn data_dir_uses_cli_override() {
        let cli = cli(Some(PathBuf::from("/tmp/test-quill")));
        assert_eq!(Config::data_dir(&cli), PathBuf::from("/tmp/test-quill"));
    }

    #[test]
    fn load_with_no_config_file_uses_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cli = cli(Some(tmp.path().to_path_buf()));
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.db_path(), &tmp.path().join("quill.db"));
    }

    #[test]
    fn load_applies_cli_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        let mut cli = cli(Some(tmp.path().to_path_buf()));
        cli.host = Some("127.0.0.1".to_string());
        cli.port = Some(8080);
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn load_reads_toml_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config_path = tmp.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[server]
host = "192.168.1.1"
port = 9000

[auth]
cookie_name = "blog_user"
secret = "not so secret"
"#,
        )
        .unwrap();

        let mut cli = cli(Some(tmp.path().to_path_buf()));
        cli.config = Some(config_path);
        let config = Config::load(&cli).unwrap();
        assert_eq!(config.server.host, "192.168.1.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.auth.cookie_name, "blog_user");
        assert_eq!(config.secret(), "not so secret");
    }

    #[test]
    fn secret_is_generated_once_and_reused() {
        let tmp = tempfile::tempdir().unwrap();
        let first = Config::load(&cli(Some(tmp.path().to_path_buf()))).unwrap();
        let second = Config::load(&cli(Some(tmp.path().to_path_buf()))).unwrap();
        assert_eq!(first.secret(), second.secret());
        assert_eq!(first.secret().len(), 64);
        assert!(tmp.path().join("secret").exists());
    }
}
