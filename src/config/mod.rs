use config::{Config, File};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

pub mod validator;

use crate::cli::Cli;
use crate::domain::param_info::ParamInfo;
use crate::widgets::WidgetRegistry;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerSettings,
    /// Page-wide form defaults
    #[serde(default)]
    pub form: FormSettings,
    /// Forms served by the HTTP surface; also loaded from `config/forms/`
    #[serde(default)]
    pub forms: Vec<FormConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FormSettings {
    /// Root prefix for generated field names
    #[serde(default)]
    pub prefix: String,
    /// Testcase count consumed by fixed-count parameters
    #[serde(default)]
    pub testcases: usize,
}

/// One parameter form: a schema plus the value previously stored for it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormConfig {
    pub name: String,
    /// Overrides `form.prefix`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    /// Overrides `form.testcases`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testcases: Option<usize>,
    pub schema: ParamInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl FormConfig {
    pub fn prefix<'a>(&'a self, defaults: &'a FormSettings) -> &'a str {
        self.prefix.as_deref().unwrap_or(&defaults.prefix)
    }

    pub fn testcases(&self, defaults: &FormSettings) -> usize {
        self.testcases.unwrap_or(defaults.testcases)
    }
}

impl Settings {
    /// Create settings from CLI arguments (includes config file and CLI overrides).
    /// Form schemas are checked against `registry`, so custom kinds are accepted.
    pub fn new_with_cli(cli: &Cli, registry: &WidgetRegistry) -> Result<Self, anyhow::Error> {
        let config_path = &cli.config;
        let root = config_path
            .parent()
            .and_then(|p| p.to_str())
            .filter(|p| !p.is_empty())
            .unwrap_or(".");

        let s = Config::builder()
            .add_source(File::from(config_path.clone()).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        // CLI > env vars > config file
        settings.apply_cli_overrides(cli);

        settings.load_forms_from_dir(&format!("{}/config/forms", root))?;
        settings.validate(registry)?;

        Ok(settings)
    }

    fn apply_cli_overrides(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(testcases) = cli.testcases {
            self.form.testcases = testcases;
        }
    }

    pub fn from_root(root: &str) -> Result<Self, anyhow::Error> {
        Self::from_root_with_registry(root, &WidgetRegistry::with_defaults())
    }

    pub fn from_root_with_registry(
        root: &str,
        registry: &WidgetRegistry,
    ) -> Result<Self, anyhow::Error> {
        let config_path = Path::new(root).join("paramform");
        let s = Config::builder()
            .add_source(File::from(config_path).required(false))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .build()?;

        let mut settings: Settings = s.try_deserialize()?;

        settings.load_forms_from_dir(&format!("{}/config/forms", root))?;
        settings.validate(registry)?;

        Ok(settings)
    }

    fn validate(&self, registry: &WidgetRegistry) -> Result<(), anyhow::Error> {
        validator::ConfigValidator::validate_with_registry(self, registry).map_err(|errors| {
            let error_messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            anyhow::anyhow!("Configuration validation failed:\n{}", error_messages.join("\n"))
        })
    }

    /// Look up a configured form by name
    pub fn form(&self, name: &str) -> Option<&FormConfig> {
        self.forms.iter().find(|f| f.name == name)
    }

    fn load_forms_from_dir(&mut self, path: &str) -> Result<(), anyhow::Error> {
        let pattern = format!("{}/*", path);
        let mut entries: Vec<_> = glob::glob(&pattern)?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!("Failed to read glob entry: {}", e);
                    None
                }
            })
            .collect();
        entries.sort();

        for path in entries {
            if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
                if matches!(ext, "json" | "yaml" | "yml") {
                    let content = std::fs::read_to_string(&path)?;
                    let form: FormConfig = if ext == "json" {
                        serde_json::from_str(&content)?
                    } else {
                        serde_yaml::from_str(&content)?
                    };
                    tracing::debug!(form = %form.name, path = %path.display(), "loaded form definition");
                    self.forms.push(form);
                }
            }
        }
        Ok(())
    }
}
