//! Static dashboard page and machine-readable snapshot

use crate::manager::RenderedChart;
use shopdash_common::{format_currency, CurrencyStyle, Result};
use shopdash_config::DashboardConfig;
use shopdash_data::DashboardSnapshot;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Page file name inside the output directory
pub const INDEX_FILE: &str = "index.html";
/// Snapshot file name inside the output directory
pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// Writes `index.html`, `snapshot.json` and the logo into the output directory
#[derive(Debug, Clone)]
pub struct ReportWriter {
    title: String,
    output_dir: PathBuf,
    logo_path: PathBuf,
    currency: CurrencyStyle,
}

impl ReportWriter {
    /// Writer configured from the `dashboard` section
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            output_dir: PathBuf::from(&config.output_dir),
            logo_path: PathBuf::from(&config.logo_path),
            currency: config.currency.clone(),
        }
    }

    /// Replace the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Write every report file and return the page path
    pub async fn write(&self, snapshot: &DashboardSnapshot, charts: &[RenderedChart]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let logo = self.copy_logo().await?;

        let snapshot_path = self.output_dir.join(SNAPSHOT_FILE);
        tokio::fs::write(&snapshot_path, serde_json::to_vec_pretty(snapshot)?).await?;

        let index_path = self.output_dir.join(INDEX_FILE);
        let html = self.render_html(snapshot, charts, logo.as_deref());
        tokio::fs::write(&index_path, html).await?;

        info!(path = %index_path.display(), charts = charts.len(), "Dashboard page written");
        Ok(index_path)
    }

    /// Copy the logo next to the page. A missing logo is only a warning.
    async fn copy_logo(&self) -> Result<Option<String>> {
        let Some(file_name) = self.logo_path.file_name().and_then(|n| n.to_str()) else {
            return Ok(None);
        };

        if !tokio::fs::try_exists(&self.logo_path).await.unwrap_or(false) {
            warn!(path = %self.logo_path.display(), "Logo not found, page will have no logo");
            return Ok(None);
        }

        let target = self.output_dir.join(file_name);
        if !same_file(&self.logo_path, &target) {
            tokio::fs::copy(&self.logo_path, &target).await?;
        }
        Ok(Some(file_name.to_string()))
    }

    /// The page markup
    pub fn render_html(&self, snapshot: &DashboardSnapshot, charts: &[RenderedChart], logo: Option<&str>) -> String {
        let range = match snapshot.range {
            Some(range) => format!("{} &ndash; {}", range.start(), range.end()),
            None => "no dates selected".to_string(),
        };
        let revenue = format_currency(snapshot.total_revenue, &self.currency);

        let mut html = String::new();
        let _ = write!(
            html,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: sans-serif; margin: 0; display: flex; }}
aside {{ width: 220px; padding: 24px; background: #f0f2f6; min-height: 100vh; }}
aside img {{ max-width: 100%; }}
main {{ flex: 1; padding: 24px 48px; }}
.metrics {{ display: flex; gap: 64px; }}
.metric .label {{ color: #555; }}
.metric .value {{ font-size: 2em; }}
section img {{ max-width: 100%; }}
</style>
</head>
<body>
<aside>
"#,
            title = escape_html(&self.title),
        );

        if let Some(logo) = logo {
            let _ = writeln!(html, r#"<img src="{}" alt="logo">"#, escape_html(logo));
        }

        let _ = write!(
            html,
            r#"<p>Time Range</p>
<p class="range">{range}</p>
</aside>
<main>
<h1>{title}</h1>
<h2>Daily Orders</h2>
<div class="metrics">
<div class="metric"><div class="label">Total orders</div><div class="value">{orders}</div></div>
<div class="metric"><div class="label">Total Revenue</div><div class="value">{revenue}</div></div>
</div>
"#,
            title = escape_html(&self.title),
            orders = snapshot.total_orders,
            revenue = escape_html(&revenue),
        );

        for chart in charts {
            // The daily orders chart sits under the metrics heading
            if chart.name != "daily_orders" {
                let _ = writeln!(html, "<h2>{}</h2>", escape_html(&chart.heading));
            }
            let _ = writeln!(
                html,
                r#"<section><img src="{}" alt="{}"></section>"#,
                escape_html(&chart.file_name),
                escape_html(&chart.heading),
            );
        }

        html.push_str("</main>\n</body>\n</html>\n");
        html
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
