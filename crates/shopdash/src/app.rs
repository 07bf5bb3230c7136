//! One render cycle: load, filter, aggregate, draw, publish

use chrono::NaiveDate;
use shopdash_common::{format_currency, DashboardError, Result};
use shopdash_config::Config;
use shopdash_data::{DashboardSnapshot, DatasetLoader, OrderTable, RangeFilter};
use shopdash_graphs::{ChartStyle, GraphManager, RenderedChart, ReportWriter};
use std::fmt::Write as _;
use std::path::PathBuf;
use tracing::{info, instrument};

/// Result of a single dashboard run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// Aggregates for the selected range
    pub snapshot: DashboardSnapshot,
    /// Chart files, empty when charts were skipped
    pub charts: Vec<RenderedChart>,
    /// The written `index.html`, if any
    pub page: Option<PathBuf>,
}

/// Dashboard bound to a validated configuration
#[derive(Debug, Clone)]
pub struct Dashboard {
    config: Config,
}

impl Dashboard {
    /// Create a dashboard for `config`
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read the configured dataset
    pub fn load_table(&self) -> Result<OrderTable> {
        DatasetLoader::from_config(&self.config.dataset)?.load()
    }

    /// Build the range filter, filling missing bounds from the data
    pub fn range_filter(
        &self,
        table: &OrderTable,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<RangeFilter> {
        Ok(RangeFilter::from_selection(start, end, table.date_bounds())?
            .with_policy(self.config.dashboard.invalid_range))
    }

    /// Recompute the snapshot and, when `render` is set, write charts and page
    #[instrument(skip(self, table))]
    pub async fn run_on(
        &self,
        table: &OrderTable,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        render: bool,
    ) -> Result<RunOutcome> {
        let filter = self.range_filter(table, start, end)?;
        let snapshot = DashboardSnapshot::compute(table, &filter)?;

        if !render {
            return Ok(RunOutcome {
                snapshot,
                charts: Vec::new(),
                page: None,
            });
        }

        let dashboard = &self.config.dashboard;
        let manager = GraphManager::new(
            ChartStyle::from_config(&self.config.graph),
            &dashboard.output_dir,
            dashboard.top_n,
        );
        let charts = manager.render_all(&snapshot).await?;
        let page = ReportWriter::from_config(dashboard).write(&snapshot, &charts).await?;

        info!(page = %page.display(), "Dashboard published");
        Ok(RunOutcome {
            snapshot,
            charts,
            page: Some(page),
        })
    }

    /// Load the dataset and run one cycle over it
    pub async fn run(&self, start: Option<NaiveDate>, end: Option<NaiveDate>, render: bool) -> Result<RunOutcome> {
        let table = self.load_table()?;
        self.run_on(&table, start, end, render).await
    }

    /// Operator-facing summary of the run
    pub fn summary(&self, outcome: &RunOutcome) -> String {
        let mut text = render_summary(&self.config, &outcome.snapshot);
        for chart in &outcome.charts {
            let _ = writeln!(text, "  {}: {}", chart.heading, chart.path.display());
        }
        if let Some(page) = &outcome.page {
            let _ = writeln!(text, "Dashboard page: {}", page.display());
        }
        text
    }
}

/// Process exit status for a failed run: 2 when the operator's input was
/// rejected (a new selection can succeed), 1 otherwise
pub fn exit_status(err: &DashboardError) -> u8 {
    if err.is_fatal() {
        1
    } else {
        2
    }
}

/// Title, range and the two headline metrics as plain text
pub fn render_summary(config: &Config, snapshot: &DashboardSnapshot) -> String {
    let range = snapshot
        .range
        .map_or_else(|| "no dates selected".to_string(), |r| r.to_string());

    let mut text = String::new();
    let _ = writeln!(text, "{}", config.dashboard.title);
    let _ = writeln!(text, "Time range: {range}");
    let _ = writeln!(text, "Total orders: {}", snapshot.total_orders);
    let _ = writeln!(
        text,
        "Total Revenue: {}",
        format_currency(snapshot.total_revenue, &config.dashboard.currency)
    );
    text
}
