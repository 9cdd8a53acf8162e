use std::env;

use axum::http::HeaderValue;

const DEFAULT_PORT: u16 = 3001;
const DEFAULT_DATABASE_PATH: &str = "todos.db";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TOOLING_OWNER: &str = "mcp-user";

/// Identity-provider key material used to verify tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    Hs256Secret(String),
    Rs256PublicKey(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub base_path: String,
    pub allowed_origins: Vec<HeaderValue>,
    pub key: KeyMaterial,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Owner assumed for requests without credentials. Development only.
    pub dev_fallback_owner: Option<String>,
    pub tooling_routes: bool,
    pub tooling_owner: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is not a valid value for {1}")]
    Invalid(String, &'static str),
    #[error("either TODO_AUTH_HS256_SECRET or TODO_AUTH_RSA_PUBLIC_KEY must be set")]
    MissingKeyMaterial,
    #[error("TODO_AUTH_HS256_SECRET and TODO_AUTH_RSA_PUBLIC_KEY are mutually exclusive")]
    ConflictingKeyMaterial,
}

impl Config {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("TODO_PORT") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(v, "TODO_PORT"))?,
            None => DEFAULT_PORT,
        };

        let allowed_origins = var("TODO_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string())
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(|o| {
                let invalid = || ConfigError::Invalid(o.to_string(), "TODO_ALLOWED_ORIGINS");
                // Credentialed CORS cannot be combined with a wildcard origin
                if o == "*" {
                    return Err(invalid());
                }
                HeaderValue::from_str(o).map_err(|_| invalid())
            })
            .collect::<Result<Vec<_>, _>>()?;

        let key = match (var("TODO_AUTH_HS256_SECRET"), var("TODO_AUTH_RSA_PUBLIC_KEY")) {
            (Some(secret), None) => KeyMaterial::Hs256Secret(secret),
            (None, Some(pem)) => KeyMaterial::Rs256PublicKey(pem.replace("\\n", "\n")),
            (None, None) => return Err(ConfigError::MissingKeyMaterial),
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingKeyMaterial),
        };

        let tooling_routes = match var("TODO_TOOLING_ROUTES") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid(v, "TODO_TOOLING_ROUTES"))?,
            None => false,
        };

        Ok(Config {
            port,
            database_path: var("TODO_DATABASE_PATH")
                .unwrap_or_else(|| DEFAULT_DATABASE_PATH.to_string()),
            base_path: normalize_base_path(var("TODO_BASE_PATH")),
            allowed_origins,
            key,
            issuer: var("TODO_AUTH_ISSUER"),
            audience: var("TODO_AUTH_AUDIENCE"),
            dev_fallback_owner: var("TODO_DEV_FALLBACK_OWNER"),
            tooling_routes,
            tooling_owner: var("TODO_TOOLING_OWNER")
                .unwrap_or_else(|| DEFAULT_TOOLING_OWNER.to_string()),
        })
    }

    /// Strict defaults around the given key material; handy for tests.
    pub fn with_key(key: KeyMaterial) -> Self {
        Config {
            port: DEFAULT_PORT,
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            base_path: String::new(),
            allowed_origins: vec![HeaderValue::from_static(DEFAULT_ALLOWED_ORIGIN)],
            key,
            issuer: None,
            audience: None,
            dev_fallback_owner: None,
            tooling_routes: false,
            tooling_owner: DEFAULT_TOOLING_OWNER.to_string(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn normalize_base_path(path: Option<String>) -> String {
    path.map(|path| {
        let path = path.trim().trim_end_matches('/');
        if path.is_empty() || path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        }
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_are_strict() {
        let config = load(&[("TODO_AUTH_HS256_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.database_path, "todos.db");
        assert_eq!(config.allowed_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.key, KeyMaterial::Hs256Secret("s3cret".into()));
        assert!(config.dev_fallback_owner.is_none());
        assert!(!config.tooling_routes);
        assert_eq!(config.tooling_owner, "mcp-user");
    }

    #[test]
    fn key_material_is_required_and_exclusive() {
        assert!(matches!(load(&[]), Err(ConfigError::MissingKeyMaterial)));
        assert!(matches!(
            load(&[
                ("TODO_AUTH_HS256_SECRET", "a"),
                ("TODO_AUTH_RSA_PUBLIC_KEY", "b")
            ]),
            Err(ConfigError::ConflictingKeyMaterial)
        ));
    }

    #[test]
    fn parses_overrides() {
        let config = load(&[
            ("TODO_AUTH_RSA_PUBLIC_KEY", "-----BEGIN\\nKEY"),
            ("TODO_PORT", "8080"),
            ("TODO_BASE_PATH", "todo/"),
            (
                "TODO_ALLOWED_ORIGINS",
                "https://app.example, http://localhost:5173",
            ),
            ("TODO_TOOLING_ROUTES", "true"),
            ("TODO_DEV_FALLBACK_OWNER", "dev-user"),
        ])
        .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.base_path, "/todo");
        assert_eq!(config.allowed_origins.len(), 2);
        assert_eq!(config.key, KeyMaterial::Rs256PublicKey("-----BEGIN\nKEY".into()));
        assert!(config.tooling_routes);
        assert_eq!(config.dev_fallback_owner.as_deref(), Some("dev-user"));
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(load(&[("TODO_AUTH_HS256_SECRET", "s"), ("TODO_PORT", "http")]).is_err());
        assert!(load(&[
            ("TODO_AUTH_HS256_SECRET", "s"),
            ("TODO_TOOLING_ROUTES", "maybe")
        ])
        .is_err());

        for origins in ["*", "https://app.example, *"] {
            let err = load(&[
                ("TODO_AUTH_HS256_SECRET", "s"),
                ("TODO_ALLOWED_ORIGINS", origins),
            ])
            .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::Invalid(ref value, "TODO_ALLOWED_ORIGINS") if value == "*"
            ));
        }
    }
}
