use anyhow::{Result, bail};
use clap::Parser;
use serde::Deserialize;
use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mediarepo")]
#[command(about = "Serves the media repository pages", long_about = None)]
pub struct Cli {
    #[arg(short = 'c', long = "config")]
    pub config_path: Option<String>,

    /// Overrides `app.port` from the config file.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,
}

pub fn default_config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".mediarepo")
}

pub fn default_config_path() -> PathBuf {
    default_config_dir().join("config.yaml")
}

#[derive(Debug, Deserialize, Clone)]
pub struct App {
    #[serde(default = "default_database")]
    database: String,
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default)]
    pub turso_url: Option<String>,
    #[serde(default)]
    pub turso_auth_token: Option<String>,
    #[serde(default = "default_sync_interval")]
    pub sync_interval_seconds: u64,
}

fn default_database() -> String {
    "mediarepo.db".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_sync_interval() -> u64 {
    60
}

impl Default for App {
    fn default() -> Self {
        App {
            database: default_database(),
            port: default_port(),
            turso_url: None,
            turso_auth_token: None,
            sync_interval_seconds: default_sync_interval(),
        }
    }
}

impl App {
    pub fn get_db(&self) -> &str {
        &self.database
    }

    pub fn get_port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Remote url and token, present only when both are set to something non-empty.
    /// `${TURSO_URL:-}` style substitution leaves empty strings behind otherwise.
    pub fn replica(&self) -> Option<(&str, &str)> {
        match (self.turso_url.as_deref(), self.turso_auth_token.as_deref()) {
            (Some(url), Some(token)) if !url.is_empty() && !token.is_empty() => Some((url, token)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Banner {
    pub src: String,
    #[serde(default)]
    pub link: Option<String>,
}

/// One page variant bound to one collection of records.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Page {
    pub path: String,
    pub collection: String,
    pub heading: String,
    #[serde(default)]
    pub nav_label: Option<String>,
    #[serde(default)]
    pub search: bool,
    #[serde(default)]
    pub banner_label: Option<String>,
    #[serde(default)]
    pub banners: Vec<Banner>,
}

impl Page {
    /// Prefix for the page's form actions; empty for the root page.
    pub fn base(&self) -> &str {
        self.path.trim_end_matches('/')
    }

    pub fn label(&self) -> &str {
        self.nav_label.as_deref().unwrap_or(&self.heading)
    }
}

fn default_pages() -> Vec<Page> {
    vec![
        Page {
            path: "/".to_string(),
            collection: "urls".to_string(),
            heading: "Media Repository".to_string(),
            nav_label: Some("Media".to_string()),
            search: false,
            banner_label: Some("Nature ❤️".to_string()),
            banners: vec![
                Banner {
                    src: "/static/nature-1.svg".to_string(),
                    link: None,
                },
                Banner {
                    src: "/static/nature-2.svg".to_string(),
                    link: None,
                },
            ],
        },
        Page {
            path: "/csspage".to_string(),
            collection: "urlcss".to_string(),
            heading: "CSS Media Repository".to_string(),
            nav_label: Some("CSS".to_string()),
            search: true,
            banner_label: Some("CSS 🖥️".to_string()),
            banners: vec![Banner {
                src: "/static/css.svg".to_string(),
                link: Some("https://en.wikipedia.org/wiki/CSS".to_string()),
            }],
        },
    ]
}

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub app: App,
    #[serde(default = "default_pages")]
    pub pages: Vec<Page>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            app: App::default(),
            pages: default_pages(),
        }
    }
}

impl Config {
    pub fn new(path: &str) -> Result<Self> {
        let yaml_str = fs::read_to_string(path)?;
        Config::from_yaml(&yaml_str)
    }

    pub fn from_yaml(yaml_str: &str) -> Result<Self> {
        let yaml_with_env = Config::substitute_env_vars(yaml_str)?;
        let config: Config = serde_yaml::from_str(&yaml_with_env)?;
        config.validate()?;
        Ok(config)
    }

    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|p| p.collection.as_str())
    }

    fn validate(&self) -> Result<()> {
        if self.pages.is_empty() {
            bail!("at least one page must be configured");
        }

        let mut paths = HashSet::new();
        for page in &self.pages {
            if !page.path.starts_with('/') {
                bail!("page path {:?} must start with '/'", page.path);
            }
            if !paths.insert(page.base()) {
                bail!("page path {:?} is configured twice", page.path);
            }
            if page.base().starts_with("/api") || page.base().starts_with("/static") {
                bail!("page path {:?} collides with a reserved prefix", page.path);
            }
            let valid_name = !page.collection.is_empty()
                && page
                    .collection
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-');
            if !valid_name {
                bail!("collection name {:?} must match [a-z0-9_-]+", page.collection);
            }
        }

        Ok(())
    }

    fn substitute_env_vars(yaml_str: &str) -> Result<String> {
        let mut result = yaml_str.to_string();
        let mut offset = 0;

        while let Some(start) = result[offset..].find("${") {
            let actual_start = offset + start;
            let Some(end) = result[actual_start..].find('}') else {
                break;
            };
            let var_name = &result[actual_start + 2..actual_start + end];

            // ${VAR:-default}
            let env_value = match var_name.split_once(":-") {
                Some((actual_var, default_val)) => {
                    env::var(actual_var).unwrap_or_else(|_| default_val.to_string())
                }
                None => env::var(var_name).unwrap_or_else(|_| {
                    tracing::warn!(var = var_name, "environment variable referenced by config is not set");
                    String::new()
                }),
            };

            result.replace_range(actual_start..actual_start + end + 1, &env_value);
            offset = actual_start + env_value.len();
        }

        Ok(result)
    }
}
