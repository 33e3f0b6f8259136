//! Result composition
//!
//! Runs the plugin pipeline over historical rows and then folds in the
//! real-time snapshot. Both inputs must already be fetched; nothing here
//! performs I/O.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::compose_span;
use crate::config::ComposeConfig;
use crate::error::Result;
use crate::logging::Timer;
use crate::merge::{
    merge_today_data_into_summary, merge_today_into_trends, update_events_with_today_data,
};
use crate::models::{validate_site_domain, Granularity, QueryConfig, Row, TodayData};
use crate::plugins::PluginPipeline;
use crate::referrer::ReferrerRegistry;

/// One composition request, tagged by the shape of the aggregate
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ComposeRequest {
    /// Breakdown rows (top referrers, top pages, ...)
    Rows {
        rows: Vec<Row>,
        #[serde(default)]
        config: QueryConfig,
        #[serde(default)]
        site_domain: Option<String>,
    },
    /// A single aggregate object
    Summary {
        summary: Row,
        #[serde(default)]
        today: Option<TodayData>,
    },
    /// A date-indexed series
    EventsByDate {
        events: Vec<Row>,
        #[serde(default)]
        config: QueryConfig,
        #[serde(default)]
        site_domain: Option<String>,
        #[serde(default)]
        today: Option<TodayData>,
        #[serde(default)]
        granularity: Option<Granularity>,
    },
    /// Flat trend rows
    Trends {
        rows: Vec<Row>,
        #[serde(default)]
        config: QueryConfig,
        #[serde(default)]
        site_domain: Option<String>,
        #[serde(default)]
        today: Option<TodayData>,
        #[serde(default)]
        granularity: Option<Granularity>,
    },
}

impl ComposeRequest {
    /// Shape tag, as used in logs
    pub fn shape(&self) -> &'static str {
        match self {
            ComposeRequest::Rows { .. } => "rows",
            ComposeRequest::Summary { .. } => "summary",
            ComposeRequest::EventsByDate { .. } => "events_by_date",
            ComposeRequest::Trends { .. } => "trends",
        }
    }
}

/// Composed output, tagged like the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ComposeResponse {
    Rows { rows: Vec<Row> },
    Summary { summary: Row },
    EventsByDate { events: Vec<Row> },
    Trends { rows: Vec<Row> },
}

/// Plugin pipeline plus merger, bound to a registry and a clock
#[derive(Clone)]
pub struct ResultComposer {
    registry: Arc<ReferrerRegistry>,
    clock: Arc<dyn Clock>,
    default_site_domain: Option<String>,
    default_granularity: Granularity,
}

impl std::fmt::Debug for ResultComposer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultComposer")
            .field("registry_entries", &self.registry.len())
            .field("now", &self.clock.now())
            .field("default_site_domain", &self.default_site_domain)
            .field("default_granularity", &self.default_granularity)
            .finish()
    }
}

impl ResultComposer {
    /// Create a composer with no defaults
    pub fn new(registry: Arc<ReferrerRegistry>, clock: Arc<dyn Clock>) -> Self {
        Self {
            registry,
            clock,
            default_site_domain: None,
            default_granularity: Granularity::Daily,
        }
    }

    /// Build a composer from configuration, loading the registry it names
    pub fn from_config(config: &ComposeConfig) -> Result<Self> {
        let registry = match &config.registry_path {
            Some(path) => ReferrerRegistry::from_path(path)?,
            None => ReferrerRegistry::builtin().clone(),
        };

        Ok(Self::new(Arc::new(registry), Arc::new(SystemClock))
            .with_default_site_domain(config.site_domain())
            .with_default_granularity(config.granularity()?))
    }

    /// Site domain used when a request carries none
    pub fn with_default_site_domain(mut self, site_domain: Option<String>) -> Self {
        self.default_site_domain = validate_site_domain(site_domain);
        self
    }

    /// Granularity used when a request carries none
    pub fn with_default_granularity(mut self, granularity: Granularity) -> Self {
        self.default_granularity = granularity;
        self
    }

    fn site_domain(&self, requested: Option<&str>) -> Option<String> {
        validate_site_domain(requested.map(str::to_string)).or_else(|| self.default_site_domain.clone())
    }

    /// Run the plugin pipeline over breakdown rows
    pub fn compose_rows(
        &self,
        rows: &[Row],
        config: &QueryConfig,
        site_domain: Option<&str>,
    ) -> Vec<Row> {
        let site_domain = self.site_domain(site_domain);
        PluginPipeline::new(&self.registry).apply(rows, config, site_domain.as_deref())
    }

    /// Annotate a summary with today's counters
    pub fn compose_summary(&self, summary: &Row, today: Option<&TodayData>) -> Row {
        merge_today_data_into_summary(summary, today)
    }

    /// Plugins, then replace-or-append the current bucket
    pub fn compose_events_by_date(
        &self,
        events: &[Row],
        config: &QueryConfig,
        site_domain: Option<&str>,
        today: Option<&TodayData>,
        granularity: Option<Granularity>,
    ) -> Vec<Row> {
        let transformed = self.compose_rows(events, config, site_domain);
        update_events_with_today_data(
            &transformed,
            today,
            granularity.unwrap_or(self.default_granularity),
            self.clock.now(),
        )
    }

    /// Plugins, then overwrite today's metrics on matching trend rows
    pub fn compose_trends(
        &self,
        rows: &[Row],
        config: &QueryConfig,
        site_domain: Option<&str>,
        today: Option<&TodayData>,
        granularity: Option<Granularity>,
    ) -> Vec<Row> {
        let transformed = self.compose_rows(rows, config, site_domain);
        merge_today_into_trends(
            &transformed,
            today,
            granularity.unwrap_or(self.default_granularity),
            self.clock.now(),
        )
    }

    /// Compose a tagged request
    pub fn compose(&self, request: ComposeRequest) -> ComposeResponse {
        let span = compose_span!(request.shape());
        let _guard = span.enter();
        let timer = Timer::start(format!("compose_{}", request.shape()));

        let (rows_in, response) = match request {
            ComposeRequest::Rows {
                rows,
                config,
                site_domain,
            } => (
                rows.len(),
                ComposeResponse::Rows {
                    rows: self.compose_rows(&rows, &config, site_domain.as_deref()),
                },
            ),
            ComposeRequest::Summary { summary, today } => (
                1,
                ComposeResponse::Summary {
                    summary: self.compose_summary(&summary, today.as_ref()),
                },
            ),
            ComposeRequest::EventsByDate {
                events,
                config,
                site_domain,
                today,
                granularity,
            } => (
                events.len(),
                ComposeResponse::EventsByDate {
                    events: self.compose_events_by_date(
                        &events,
                        &config,
                        site_domain.as_deref(),
                        today.as_ref(),
                        granularity,
                    ),
                },
            ),
            ComposeRequest::Trends {
                rows,
                config,
                site_domain,
                today,
                granularity,
            } => (
                rows.len(),
                ComposeResponse::Trends {
                    rows: self.compose_trends(
                        &rows,
                        &config,
                        site_domain.as_deref(),
                        today.as_ref(),
                        granularity,
                    ),
                },
            ),
        };

        span.record("rows_in", rows_in);
        span.record("rows_out", response.len());
        timer.stop();
        response
    }
}

impl ComposeResponse {
    /// Number of rows in the response; a summary counts as one
    pub fn len(&self) -> usize {
        match self {
            ComposeResponse::Rows { rows } | ComposeResponse::Trends { rows } => rows.len(),
            ComposeResponse::EventsByDate { events } => events.len(),
            ComposeResponse::Summary { .. } => 1,
        }
    }

    /// Check if the response carries no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
