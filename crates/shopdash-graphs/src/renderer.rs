//! Chart rendering trait and PNG encoding

use crate::types::ChartStyle;
use plotters::coord::Shift;
use plotters::prelude::*;
use shopdash_common::{DashboardError, Result};
use std::io::Cursor;
use std::path::Path;

/// Drawing surface every chart renders onto
pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// A chart that can draw itself onto an RGB canvas
pub trait ChartRenderer: Send + Sync {
    /// Identifier, also the output file stem
    fn name(&self) -> &'static str;

    /// Subheading shown above the chart on the dashboard page
    fn heading(&self) -> &str;

    /// Draw onto a canvas that is already filled with the background colour
    fn draw(&self, root: &Canvas<'_>, style: &ChartStyle) -> Result<()>;

    /// Output file name
    fn file_name(&self) -> String {
        format!("{}.png", self.name())
    }

    /// Render to PNG bytes
    fn render_to_bytes(&self, style: &ChartStyle) -> Result<Vec<u8>> {
        let (width, height) = (style.width, style.height);
        let mut buffer = vec![0u8; width as usize * height as usize * 3];

        {
            let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
            root.fill(&style.background)?;
            self.draw(&root, style)?;
            root.present()?;
        }

        encode_png(buffer, width, height)
    }

    /// Render to a PNG file
    fn render_to_file(&self, style: &ChartStyle, path: &Path) -> Result<()> {
        let bytes = self.render_to_bytes(style)?;
        std::fs::write(path, bytes)?;
        tracing::debug!(chart = self.name(), path = %path.display(), "Chart written");
        Ok(())
    }
}

/// Encode a packed RGB buffer as PNG
pub fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = image::RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| DashboardError::graph("pixel buffer does not match the image size"))?;

    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(image)
        .write_to(&mut out, image::ImageOutputFormat::Png)
        .map_err(|e| DashboardError::graph_with_source("PNG encoding failed", e))?;
    Ok(out.into_inner())
}

/// Centred message for a chart whose selection has no data
pub fn draw_no_data(root: &Canvas<'_>, style: &ChartStyle, title: &str) -> Result<()> {
    let (width, height) = root.dim_in_pixel();
    let title_font = (style.font_family.as_str(), style.title_size()).into_font();
    let body_font = (style.font_family.as_str(), style.font_size).into_font().color(&RGBColor(120, 120, 120));

    root.draw(&Text::new(
        title.to_string(),
        (width as i32 / 20, height as i32 / 20),
        title_font,
    ))?;
    root.draw(&Text::new(
        "No data for the selected date range",
        (width as i32 / 3, height as i32 / 2),
        body_font,
    ))?;
    Ok(())
}
