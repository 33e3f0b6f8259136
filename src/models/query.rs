//! Query configuration and plugin selection
//!
//! A query config names the dashboard template that produced the rows and
//! may carry a `plugins` object of boolean flags. Everything else (filters,
//! limits, date ranges) is carried through untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Optional row transforms, in the order the pipeline runs them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Plugin {
    /// Classify referrer URLs into display names
    ParseReferrers,
    /// Derive `path_clean` from `path`
    NormalizeUrls,
}

impl Plugin {
    /// Every plugin, in execution order
    pub const PIPELINE: [Plugin; 2] = [Plugin::ParseReferrers, Plugin::NormalizeUrls];

    /// Key of the flag inside a config's `plugins` object
    pub fn flag(&self) -> &'static str {
        match self {
            Plugin::ParseReferrers => "parseReferrers",
            Plugin::NormalizeUrls => "normalizeUrls",
        }
    }
}

impl std::fmt::Display for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.flag())
    }
}

/// Templates whose rows are referrers and get parsed without an explicit flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferrerTemplate {
    TopReferrers,
    Referrer,
    Referrers,
    TrafficSources,
}

impl ReferrerTemplate {
    /// All recognized referrer-shaped templates
    pub const ALL: [ReferrerTemplate; 4] = [
        ReferrerTemplate::TopReferrers,
        ReferrerTemplate::Referrer,
        ReferrerTemplate::Referrers,
        ReferrerTemplate::TrafficSources,
    ];

    /// Template identifier as it appears in query configs
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferrerTemplate::TopReferrers => "top_referrers",
            ReferrerTemplate::Referrer => "referrer",
            ReferrerTemplate::Referrers => "referrers",
            ReferrerTemplate::TrafficSources => "traffic_sources",
        }
    }

    /// Look up a template by its exact identifier
    pub fn from_identifier(identifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|template| template.as_str() == identifier)
    }
}

/// Per-request query description
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Template identifier
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub template_type: Option<String>,

    /// Alternate template identifier used by some callers
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub name: Option<String>,

    /// Plugin flags; only literal `true` enables a plugin
    #[serde(
        default,
        deserialize_with = "lenient_object",
        skip_serializing_if = "Map::is_empty"
    )]
    pub plugins: Map<String, Value>,

    /// Filters, limits and anything else the core does not read
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl QueryConfig {
    /// Config for a named template
    pub fn for_template(template: impl Into<String>) -> Self {
        Self {
            template_type: Some(template.into()),
            ..Self::default()
        }
    }

    /// Set a plugin flag
    pub fn with_plugin(mut self, plugin: Plugin, enabled: bool) -> Self {
        self.plugins
            .insert(plugin.flag().to_string(), Value::Bool(enabled));
        self
    }

    /// Whether the flag for `plugin` is exactly `true`
    pub fn plugin_flag(&self, plugin: Plugin) -> bool {
        matches!(self.plugins.get(plugin.flag()), Some(Value::Bool(true)))
    }

    /// The referrer template named by `type` or `name`, if any
    pub fn referrer_template(&self) -> Option<ReferrerTemplate> {
        [self.template_type.as_deref(), self.name.as_deref()]
            .into_iter()
            .flatten()
            .find_map(ReferrerTemplate::from_identifier)
    }

    /// Whether `plugin` runs for this config
    pub fn is_enabled(&self, plugin: Plugin) -> bool {
        match plugin {
            Plugin::ParseReferrers => {
                self.plugin_flag(plugin) || self.referrer_template().is_some()
            },
            Plugin::NormalizeUrls => self.plugin_flag(plugin),
        }
    }

    /// Enabled plugins in execution order
    pub fn enabled_plugins(&self) -> Vec<Plugin> {
        Plugin::PIPELINE
            .into_iter()
            .filter(|plugin| self.is_enabled(*plugin))
            .collect()
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(Some(s)),
        _ => Ok(None),
    }
}

fn lenient_object<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Map::new()),
    }
}
