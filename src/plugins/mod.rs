//! Plugin pipeline
//!
//! Optional row transforms selected by the query config. Each enabled plugin
//! runs as a full pass over every row before the next one starts, always in
//! [`Plugin::PIPELINE`] order. Input rows are never mutated.

pub mod normalize_urls;
pub mod parse_referrers;

use crate::models::{Plugin, QueryConfig, Row};
use crate::plugin_span;
use crate::referrer::ReferrerRegistry;

pub use normalize_urls::{clean_path, normalize_url_row};
pub use parse_referrers::parse_referrer_row;

/// Runs enabled plugins against one registry
#[derive(Debug, Clone, Copy)]
pub struct PluginPipeline<'a> {
    registry: &'a ReferrerRegistry,
}

impl<'a> PluginPipeline<'a> {
    /// Create a pipeline classifying against `registry`
    pub fn new(registry: &'a ReferrerRegistry) -> Self {
        Self { registry }
    }

    /// Apply every plugin `config` enables, returning new rows
    pub fn apply(&self, rows: &[Row], config: &QueryConfig, site_domain: Option<&str>) -> Vec<Row> {
        let plugins = config.enabled_plugins();
        if plugins.is_empty() {
            return rows.to_vec();
        }

        tracing::debug!(plugins = ?plugins, rows = rows.len(), "Applying plugins");

        let mut current = rows.to_vec();
        for plugin in plugins {
            let span = plugin_span!(plugin, current.len());
            let _guard = span.enter();
            current = self.run(plugin, &current, site_domain);
        }
        current
    }

    fn run(&self, plugin: Plugin, rows: &[Row], site_domain: Option<&str>) -> Vec<Row> {
        match plugin {
            Plugin::ParseReferrers => rows
                .iter()
                .map(|row| parse_referrer_row(row, self.registry, site_domain))
                .collect(),
            Plugin::NormalizeUrls => rows.iter().map(normalize_url_row).collect(),
        }
    }
}

/// Apply plugins using the built-in referrer registry
pub fn apply_plugins(rows: &[Row], config: &QueryConfig, site_domain: Option<&str>) -> Vec<Row> {
    PluginPipeline::new(ReferrerRegistry::builtin()).apply(rows, config, site_domain)
}
