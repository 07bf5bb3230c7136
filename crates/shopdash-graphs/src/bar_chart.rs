//! Horizontal and vertical bar charts

use crate::ranked;
use crate::renderer::{draw_no_data, Canvas, ChartRenderer};
use crate::types::{BarDatum, ChartStyle};
use plotters::chart::LabelAreaPosition;
use plotters::prelude::*;
use shopdash_common::{truncate_label, Result};
use shopdash_data::DashboardSnapshot;

/// Characters kept from a category or city name on the axis
const MAX_LABEL_CHARS: usize = 24;

/// Which way the value axis of a horizontal panel grows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Bars grow rightwards from the label axis on the left
    Normal,
    /// Bars grow leftwards from the label axis on the right
    Mirrored,
}

/// Format a bar value for its end label
fn value_label(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

/// Draw horizontal bars, first bar at the top
fn draw_horizontal_panel(
    area: &Canvas<'_>,
    style: &ChartStyle,
    title: &str,
    bars: &[BarDatum],
    decimals: usize,
    direction: Direction,
) -> Result<()> {
    if bars.is_empty() {
        return draw_no_data(area, style, title);
    }

    let font = style.font_family.as_str();
    let count = bars.len() as u32;
    let max = ranked::axis_max(bars);
    let (x_range, label_side) = match direction {
        Direction::Normal => (0f64..max, LabelAreaPosition::Left),
        // Negated values mirror the axis; tick labels show magnitudes
        Direction::Mirrored => (-max..0f64, LabelAreaPosition::Right),
    };
    let sign = if direction == Direction::Mirrored { -1.0 } else { 1.0 };

    let mut chart = ChartBuilder::on(area)
        .caption(title, (font, style.title_size()))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Bottom, 35)
        .set_label_area_size(label_side, 180)
        .build_cartesian_2d(x_range, (0u32..count).into_segmented())?;

    // Row 0 sits at the bottom of the plot, so labels are looked up in reverse
    let row_label = |value: &SegmentValue<u32>| match value {
        SegmentValue::CenterOf(row) if *row < count => {
            truncate_label(&bars[(count - 1 - row) as usize].label, MAX_LABEL_CHARS)
        }
        _ => String::new(),
    };
    let magnitude = |value: &f64| value_label(value.abs(), decimals);

    let mut mesh = chart.configure_mesh();
    mesh.y_label_formatter(&row_label)
        .x_label_formatter(&magnitude)
        .y_labels(bars.len())
        .label_style((font, style.font_size))
        .disable_y_mesh();
    if !style.show_grid {
        mesh.disable_x_mesh();
    }
    mesh.draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let row = count - 1 - i as u32;
        let mut rect = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(row)),
                (sign * bar.value, SegmentValue::Exact(row + 1)),
            ],
            style.bar_color(bar).filled(),
        );
        rect.set_margin(4, 4, 0, 0);
        rect
    }))?;

    let text_style = (font, style.font_size).into_font().color(&BLACK);
    chart.draw_series(bars.iter().enumerate().map(|(i, bar)| {
        let row = count - 1 - i as u32;
        Text::new(
            value_label(bar.value, decimals),
            (sign * (bar.value + max * 0.01), SegmentValue::CenterOf(row)),
            text_style.clone(),
        )
    }))?;

    Ok(())
}

/// Horizontal top-N bar chart
#[derive(Debug, Clone)]
pub struct RankedBarChart {
    name: &'static str,
    heading: String,
    bars: Vec<BarDatum>,
    decimals: usize,
}

impl RankedBarChart {
    /// Chart with integer value labels
    pub fn new(name: &'static str, heading: impl Into<String>, bars: Vec<BarDatum>) -> Self {
        Self {
            name,
            heading: heading.into(),
            bars,
            decimals: 0,
        }
    }

    /// Number of decimals in the value labels
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = decimals;
        self
    }

    /// Top-N customer cities
    pub fn customers_by_city(snapshot: &DashboardSnapshot, top_n: usize) -> Self {
        Self::new(
            "customers_by_city",
            "Number of Customers by City",
            ranked::top_cities(&snapshot.customers_by_city, top_n),
        )
    }

    /// Top-N seller cities
    pub fn sellers_by_city(snapshot: &DashboardSnapshot, top_n: usize) -> Self {
        Self::new(
            "sellers_by_city",
            "Number of Sellers by City",
            ranked::top_cities(&snapshot.sellers_by_city, top_n),
        )
    }

    /// The N lowest-rated categories
    pub fn worst_rating(snapshot: &DashboardSnapshot, top_n: usize) -> Self {
        Self::new(
            "worst_rating",
            "Worst Rating Product",
            ranked::worst_rated(&snapshot.category_rating, top_n),
        )
        .with_decimals(1)
    }

    /// Bars in display order
    pub fn bars(&self) -> &[BarDatum] {
        &self.bars
    }
}

impl ChartRenderer for RankedBarChart {
    fn name(&self) -> &'static str {
        self.name
    }

    fn heading(&self) -> &str {
        &self.heading
    }

    fn draw(&self, root: &Canvas<'_>, style: &ChartStyle) -> Result<()> {
        draw_horizontal_panel(root, style, &self.heading, &self.bars, self.decimals, Direction::Normal)
    }
}

/// Best and worst selling categories side by side
#[derive(Debug, Clone)]
pub struct ProductPerformanceChart {
    best: Vec<BarDatum>,
    worst: Vec<BarDatum>,
}

impl ProductPerformanceChart {
    /// Top-N and bottom-N categories by order items
    pub fn new(snapshot: &DashboardSnapshot, top_n: usize) -> Self {
        Self {
            best: ranked::best_performing(&snapshot.category_performance, top_n),
            worst: ranked::worst_performing(&snapshot.category_performance, top_n),
        }
    }

    /// Left panel bars
    pub fn best(&self) -> &[BarDatum] {
        &self.best
    }

    /// Right panel bars
    pub fn worst(&self) -> &[BarDatum] {
        &self.worst
    }
}

impl ChartRenderer for ProductPerformanceChart {
    fn name(&self) -> &'static str {
        "product_performance"
    }

    fn heading(&self) -> &str {
        "Best & Worst Performing Product"
    }

    fn draw(&self, root: &Canvas<'_>, style: &ChartStyle) -> Result<()> {
        let (width, _) = root.dim_in_pixel();
        let (left, right) = root.split_horizontally(width / 2);

        draw_horizontal_panel(&left, style, "Best Performing Products", &self.best, 0, Direction::Normal)?;
        draw_horizontal_panel(&right, style, "Worst Performing Products", &self.worst, 0, Direction::Mirrored)
    }
}

/// Vertical bars of distinct orders per payment type
#[derive(Debug, Clone)]
pub struct PaymentTypeChart {
    bars: Vec<BarDatum>,
}

impl PaymentTypeChart {
    /// Every payment type, most used first
    pub fn new(snapshot: &DashboardSnapshot) -> Self {
        Self {
            bars: ranked::payment_trend(&snapshot.payment_types),
        }
    }

    /// Bars left to right
    pub fn bars(&self) -> &[BarDatum] {
        &self.bars
    }
}

impl ChartRenderer for PaymentTypeChart {
    fn name(&self) -> &'static str {
        "payment_types"
    }

    fn heading(&self) -> &str {
        "Payment Type Trend"
    }

    fn draw(&self, root: &Canvas<'_>, style: &ChartStyle) -> Result<()> {
        if self.bars.is_empty() {
            return draw_no_data(root, style, self.heading());
        }

        let font = style.font_family.as_str();
        let count = self.bars.len() as u32;

        let mut chart = ChartBuilder::on(root)
            .caption(self.heading(), (font, style.title_size()))
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d((0u32..count).into_segmented(), 0f64..ranked::axis_max(&self.bars))?;

        let column_label = |value: &SegmentValue<u32>| match value {
            SegmentValue::CenterOf(col) if *col < count => {
                truncate_label(&self.bars[*col as usize].label, MAX_LABEL_CHARS)
            }
            _ => String::new(),
        };
        let count_label = |value: &f64| value_label(*value, 0);

        let mut mesh = chart.configure_mesh();
        mesh.x_label_formatter(&column_label)
            .y_label_formatter(&count_label)
            .x_labels(self.bars.len())
            .label_style((font, style.font_size))
            .disable_x_mesh();
        if !style.show_grid {
            mesh.disable_y_mesh();
        }
        mesh.draw()?;

        chart.draw_series(self.bars.iter().enumerate().map(|(i, bar)| {
            let col = i as u32;
            let mut rect = Rectangle::new(
                [
                    (SegmentValue::Exact(col), 0.0),
                    (SegmentValue::Exact(col + 1), bar.value),
                ],
                style.bar_color(bar).filled(),
            );
            rect.set_margin(0, 0, 12, 12);
            rect
        }))?;

        Ok(())
    }
}
