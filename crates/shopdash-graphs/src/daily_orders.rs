//! Daily orders line chart

use crate::renderer::{draw_no_data, Canvas, ChartRenderer};
use crate::types::ChartStyle;
use chrono::{Duration, NaiveDate};
use plotters::prelude::*;
use shopdash_common::Result;
use shopdash_data::DailyOrders;

/// Order count per day, drawn as a line with point markers
#[derive(Debug, Clone, Default)]
pub struct DailyOrdersChart {
    points: Vec<(NaiveDate, usize)>,
}

impl DailyOrdersChart {
    /// Chart over the daily summary, which is already ordered by day
    pub fn new(daily: &[DailyOrders]) -> Self {
        Self {
            points: daily.iter().map(|d| (d.date, d.order_count)).collect(),
        }
    }

    /// First plotted day
    fn origin(&self) -> Option<NaiveDate> {
        self.points.first().map(|(date, _)| *date)
    }

    /// Points as (days since the first day, order count)
    fn offsets(&self) -> Vec<(i64, f64)> {
        let Some(origin) = self.origin() else {
            return Vec::new();
        };
        self.points
            .iter()
            .map(|(date, count)| ((*date - origin).num_days(), *count as f64))
            .collect()
    }

    /// X extent in days; a single day still gets a unit-wide axis
    fn x_span(&self) -> i64 {
        match (self.points.first(), self.points.last()) {
            (Some((first, _)), Some((last, _))) => (*last - *first).num_days().max(1),
            _ => 1,
        }
    }

    /// Y extent with 10% headroom
    fn y_max(&self) -> f64 {
        let max = self.points.iter().map(|(_, c)| *c).max().unwrap_or(0) as f64;
        (max * 1.1).max(1.0)
    }
}

impl ChartRenderer for DailyOrdersChart {
    fn name(&self) -> &'static str {
        "daily_orders"
    }

    fn heading(&self) -> &str {
        "Daily Orders"
    }

    fn draw(&self, root: &Canvas<'_>, style: &ChartStyle) -> Result<()> {
        let Some(origin) = self.origin() else {
            return draw_no_data(root, style, self.heading());
        };

        let font = style.font_family.as_str();
        let mut chart = ChartBuilder::on(root)
            .caption(self.heading(), (font, style.title_size()))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0i64..self.x_span(), 0f64..self.y_max())?;

        let date_label = |offset: &i64| (origin + Duration::days(*offset)).format("%Y-%m-%d").to_string();
        let count_label = |count: &f64| format!("{count:.0}");

        let mut mesh = chart.configure_mesh();
        mesh.x_labels(6)
            .x_label_formatter(&date_label)
            .y_label_formatter(&count_label)
            .label_style((font, style.font_size))
            .disable_x_mesh();
        if !style.show_grid {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;

        let points = self.offsets();
        chart.draw_series(LineSeries::new(
            points.iter().copied(),
            style.line.stroke_width(2),
        ))?;
        chart.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 4, style.line.filled())),
        )?;

        Ok(())
    }
}
