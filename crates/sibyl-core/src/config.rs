use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_TOPICS: &[&str] = &[
    "poderes",
    "afiliaciones_heroes",
    "afiliaciones_villanos",
    "especie",
    "origen",
    "armas",
    "genero_ocupacion",
];

/// Knobs of the decision side of inference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Minimum probability the top candidate needs before it is proposed.
    pub acceptance_threshold: f64,
    /// Number of ranked entries returned to callers.
    pub top_k: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            acceptance_threshold: 0.5,
            top_k: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub catalog_path: PathBuf,
    pub catalog_url: Option<Url>,
    pub name_column: String,
    pub manifest_dir: PathBuf,
    pub topics: Vec<String>,
    pub questions_path: Option<PathBuf>,
    pub prewarm: bool,
    pub engine: EngineConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = EngineConfig::default();

        Self {
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            catalog_path: std::env::var("SIBYL_CATALOG_PATH")
                .unwrap_or_else(|_| "./data/catalog.json".into())
                .into(),
            catalog_url: std::env::var("SIBYL_CATALOG_URL")
                .ok()
                .and_then(|u| match Url::parse(&u) {
                    Ok(url) => Some(url),
                    Err(e) => {
                        tracing::warn!(url = %u, error = %e, "Ignoring invalid SIBYL_CATALOG_URL");
                        None
                    }
                }),
            name_column: std::env::var("SIBYL_NAME_COLUMN").unwrap_or_else(|_| "nombre".into()),
            manifest_dir: std::env::var("SIBYL_MANIFEST_DIR")
                .unwrap_or_else(|_| "./data/manifests".into())
                .into(),
            topics: std::env::var("SIBYL_TOPICS")
                .map(|raw| parse_topics(&raw))
                .unwrap_or_else(|_| DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()),
            questions_path: std::env::var("SIBYL_QUESTIONS_PATH").ok().map(PathBuf::from),
            prewarm: std::env::var("SIBYL_PREWARM")
                .ok()
                .and_then(|v| match parse_flag(&v) {
                    Some(flag) => Some(flag),
                    None => {
                        tracing::warn!(value = %v, "Ignoring unparseable SIBYL_PREWARM");
                        None
                    }
                })
                .unwrap_or(true),
            engine: EngineConfig {
                acceptance_threshold: std::env::var("SIBYL_THRESHOLD")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.acceptance_threshold),
                top_k: std::env::var("SIBYL_TOP_K")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.top_k),
            },
        }
    }
}

/// Splits a comma-separated topic list, dropping blanks.
pub fn parse_topics(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Reads a boolean switch: `true/false`, `1/0`, `yes/no`, `on/off`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
