use std::env;

/// Runtime configuration for the gallery API
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Maximum upload size in bytes (default: 5 MB)
    pub max_file_size: usize,

    /// Directory uploaded files are stored in (default: "uploads")
    pub upload_dir: String,

    /// JWT secret key
    pub jwt_secret: String,

    /// Allowed CORS origins (comma separated)
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_file_size: 5 * 1024 * 1024, // 5 MB
            upload_dir: "uploads".to_string(),
            jwt_secret: "secret".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(), // Vite default
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            upload_dir: env::var("UPLOAD_DIR").unwrap_or(default.upload_dir),

            jwt_secret: env::var("JWT_SECRET").unwrap_or(default.jwt_secret),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|v| v.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(default.allowed_origins),
        }
    }

    /// Config for tests and local development
    pub fn development() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.max_file_size, 5 * 1024 * 1024);
        assert_eq!(config.upload_dir, "uploads");
        assert!(!config.allowed_origins.is_empty());
    }
}
