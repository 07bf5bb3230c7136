//! Concurrent rendering of the dashboard charts

use crate::bar_chart::{PaymentTypeChart, ProductPerformanceChart, RankedBarChart};
use crate::daily_orders::DailyOrdersChart;
use crate::renderer::ChartRenderer;
use crate::types::ChartStyle;
use futures::future::try_join_all;
use serde::Serialize;
use shopdash_common::{DashboardError, Result};
use shopdash_data::DashboardSnapshot;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

/// A chart image written to the output directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedChart {
    /// Chart identifier
    pub name: &'static str,
    /// Subheading shown above the chart
    pub heading: String,
    /// File name relative to the output directory
    pub file_name: String,
    /// Full path of the written file
    pub path: PathBuf,
}

/// Builds the six dashboard charts and renders them into an output directory
#[derive(Debug, Clone)]
pub struct GraphManager {
    style: ChartStyle,
    output_dir: PathBuf,
    top_n: usize,
}

impl GraphManager {
    /// Manager writing into `output_dir`
    pub fn new(style: ChartStyle, output_dir: impl Into<PathBuf>, top_n: usize) -> Self {
        Self {
            style,
            output_dir: output_dir.into(),
            top_n,
        }
    }

    /// Directory receiving the chart files
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// The six charts in page order
    pub fn charts_for(&self, snapshot: &DashboardSnapshot) -> Vec<Box<dyn ChartRenderer>> {
        vec![
            Box::new(DailyOrdersChart::new(&snapshot.daily_orders)),
            Box::new(RankedBarChart::customers_by_city(snapshot, self.top_n)),
            Box::new(RankedBarChart::sellers_by_city(snapshot, self.top_n)),
            Box::new(ProductPerformanceChart::new(snapshot, self.top_n)),
            Box::new(RankedBarChart::worst_rating(snapshot, self.top_n)),
            Box::new(PaymentTypeChart::new(snapshot)),
        ]
    }

    /// Render every chart of `snapshot`, one blocking task per chart
    #[instrument(skip_all, fields(output_dir = %self.output_dir.display()))]
    pub async fn render_all(&self, snapshot: &DashboardSnapshot) -> Result<Vec<RenderedChart>> {
        self.render(self.charts_for(snapshot)).await
    }

    /// Render the given charts concurrently. Output order follows input order.
    pub async fn render(&self, charts: Vec<Box<dyn ChartRenderer>>) -> Result<Vec<RenderedChart>> {
        tokio::fs::create_dir_all(&self.output_dir).await?;
        let started = Instant::now();

        let tasks = charts.into_iter().map(|chart| {
            let style = self.style.clone();
            let path = self.output_dir.join(chart.file_name());

            let handle = tokio::task::spawn_blocking(move || -> Result<RenderedChart> {
                chart.render_to_file(&style, &path)?;
                Ok(RenderedChart {
                    name: chart.name(),
                    heading: chart.heading().to_string(),
                    file_name: chart.file_name(),
                    path,
                })
            });

            async move {
                handle
                    .await
                    .map_err(|e| DashboardError::graph_with_source("chart rendering task failed", e))?
            }
        });

        let rendered = try_join_all(tasks).await?;
        info!(
            charts = rendered.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Charts rendered"
        );
        Ok(rendered)
    }
}
