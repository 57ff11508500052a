use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub upload: UploadConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    pub image_dir: String,
    pub max_image_size: usize,   // 5 MiB in bytes
    pub max_request_size: usize, // whole request, must exceed max_image_size
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
impl Config {
    /// Settings for tests: in-memory database, cheap bcrypt cost.
    pub fn for_tests(image_dir: &str) -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
            },
            database: DatabaseConfig {
                url: "sqlite::memory:".into(),
                max_connections: 1,
            },
            auth: AuthConfig {
                jwt_secret: "test-secret-key-12345".into(),
                issuer: "employee-portal".into(),
                audience: "employee-portal-client".into(),
                bcrypt_cost: 4,
            },
            upload: UploadConfig {
                image_dir: image_dir.into(),
                max_image_size: 5 * 1024 * 1024,
                max_request_size: 10 * 1024 * 1024,
            },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:3000".into()],
            },
        }
    }
}
