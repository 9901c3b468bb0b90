use std::io::Write;
use std::path::Path;

use eframe::egui::Color32;
use image::{Rgba, RgbaImage};
use thiserror::Error;

use crate::color::GenusColors;
use crate::data::aggregate::{by_genus, YearGenusCounts};
use crate::data::filter::ResultSet;
use crate::data::model::TreeDataset;

/// Fixed filename for the table export.
pub const CSV_FILENAME: &str = "trees-results.csv";
/// Fixed filename for the chart export.
pub const PNG_FILENAME: &str = "plot.png";
/// Fixed canvas size of the exported chart.
pub const CHART_SIZE: (u32, u32) = (900, 600);

/// Canonical column order of the table export, matching [`TreeRecord`]'s
/// field order.
///
/// [`TreeRecord`]: crate::data::model::TreeRecord
pub const CSV_HEADER: [&str; 7] = [
    "id",
    "genus",
    "species",
    "neighbourhood",
    "latitude",
    "longitude",
    "year",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Table export
// ---------------------------------------------------------------------------

/// Serialize the current result set as CSV rows into `writer`.
///
/// Blank result sets (Empty / NotReady) produce a header-only file.
/// Idempotent and side-effect-free beyond the written bytes.
pub fn write_results_csv<W: Write>(
    dataset: &TreeDataset,
    results: &ResultSet,
    writer: W,
) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    // Written explicitly so the blank markers still yield a header.
    wtr.write_record(CSV_HEADER)?;
    for &i in results.indices() {
        let rec = &dataset.records[i];
        wtr.write_record([
            rec.id.to_string(),
            rec.genus.clone(),
            rec.species.clone(),
            rec.neighbourhood.clone(),
            rec.latitude.to_string(),
            rec.longitude.to_string(),
            rec.year.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write the table export to `path`.
pub fn save_results_csv(
    dataset: &TreeDataset,
    results: &ResultSet,
    path: &Path,
) -> Result<(), ExportError> {
    let file = std::fs::File::create(path)?;
    write_results_csv(dataset, results, file)
}

// ---------------------------------------------------------------------------
// Chart export
// ---------------------------------------------------------------------------

const MARGIN_LEFT: u32 = 60;
const MARGIN_RIGHT: u32 = 30;
const MARGIN_TOP: u32 = 30;
const MARGIN_BOTTOM: u32 = 50;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([60, 60, 60, 255]);

/// Rasterize the year/genus histogram at a fixed canvas size.
///
/// Mirrors the on-screen chart: one stacked bar per year, one segment
/// per genus, segment colours from the shared [`GenusColors`]. An empty
/// aggregation yields the blank canvas with axes only.
pub fn render_chart(
    counts: &YearGenusCounts,
    colors: &GenusColors,
    width: u32,
    height: u32,
) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);

    let plot_left = MARGIN_LEFT;
    let plot_right = width.saturating_sub(MARGIN_RIGHT);
    let plot_top = MARGIN_TOP;
    let plot_bottom = height.saturating_sub(MARGIN_BOTTOM);

    // Axes
    fill_rect(&mut img, plot_left, plot_top, 1, plot_bottom - plot_top, AXIS);
    fill_rect(&mut img, plot_left, plot_bottom, plot_right - plot_left, 1, AXIS);

    if counts.is_empty() {
        return img;
    }

    let years: Vec<i32> = {
        let mut ys: Vec<i32> = counts.keys().map(|(y, _)| *y).collect();
        ys.sort_unstable();
        ys.dedup();
        ys
    };

    // Tallest stacked bar sets the vertical scale.
    let max_total: u64 = years
        .iter()
        .map(|y| {
            counts
                .iter()
                .filter(|((cy, _), _)| cy == y)
                .map(|(_, n)| *n)
                .sum()
        })
        .max()
        .unwrap_or(1)
        .max(1);

    let plot_w = plot_right - plot_left;
    let plot_h = plot_bottom - plot_top;
    let slot_w = (plot_w / years.len() as u32).max(2);
    let bar_w = (slot_w * 4 / 5).max(1);

    let series = by_genus(counts);
    for (i, year) in years.iter().enumerate() {
        let x = plot_left + i as u32 * slot_w + (slot_w - bar_w) / 2;
        let mut stacked: u64 = 0;
        for (genus, per_year) in &series {
            let Some(&n) = per_year.get(year) else {
                continue;
            };
            let y0 = scale(stacked, max_total, plot_h);
            let y1 = scale(stacked + n, max_total, plot_h);
            let seg_h = (y1 - y0).max(1);
            let color = to_rgba(colors.color_for(genus));
            fill_rect(&mut img, x, plot_bottom - y1, bar_w, seg_h, color);
            stacked += n;
        }
    }

    img
}

/// Render the chart and write it to `path` as PNG.
pub fn save_chart_png(
    counts: &YearGenusCounts,
    colors: &GenusColors,
    path: &Path,
) -> Result<(), ExportError> {
    let (w, h) = CHART_SIZE;
    render_chart(counts, colors, w, h).save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}

fn scale(value: u64, max: u64, plot_h: u32) -> u32 {
    ((value as f64 / max as f64) * plot_h as f64).round() as u32
}

fn to_rgba(c: Color32) -> Rgba<u8> {
    Rgba([c.r(), c.g(), c.b(), 255])
}

fn fill_rect(img: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    for yy in y..(y + h).min(img.height()) {
        for xx in x..(x + w).min(img.width()) {
            img.put_pixel(xx, yy, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterSpec};
    use crate::data::model::TreeRecord;

    fn fixture() -> TreeDataset {
        let rec = |id, genus: &str, lat, lon, year| TreeRecord {
            id,
            genus: genus.to_string(),
            species: "RUBRUM".to_string(),
            neighbourhood: "KITSILANO".to_string(),
            latitude: lat,
            longitude: lon,
            year,
        };
        TreeDataset::from_records(vec![
            rec(1, "ACER", 49.25, -123.10, 2000),
            rec(2, "PRUNUS", 49.25, -123.10, 2001),
            rec(3, "ACER", 49.28, -123.05, 2000),
        ])
    }

    fn acer_results(ds: &TreeDataset) -> ResultSet {
        let spec = FilterSpec {
            genera: ["ACER".to_string()].into_iter().collect(),
            latitude_range: (49.2, 49.29),
            longitude_range: (-123.2, -123.0),
            ..FilterSpec::default()
        };
        apply(ds, &spec)
    }

    #[test]
    fn exports_filtered_rows_with_canonical_header() {
        let ds = fixture();
        let mut buf = Vec::new();
        write_results_csv(&ds, &acer_results(&ds), &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("id,genus,species,neighbourhood,latitude,longitude,year")
        );
        assert_eq!(lines.clone().count(), 2);
        assert!(lines.all(|l| l.contains("ACER")));
    }

    #[test]
    fn export_round_trips_through_csv() {
        let ds = fixture();
        let results = acer_results(&ds);
        let mut buf = Vec::new();
        write_results_csv(&ds, &results, &mut buf).unwrap();

        let mut reader = csv::Reader::from_reader(buf.as_slice());
        let parsed: Vec<TreeRecord> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .unwrap();
        let expected: Vec<TreeRecord> = results
            .indices()
            .iter()
            .map(|&i| ds.records[i].clone())
            .collect();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn blank_results_export_header_only() {
        let ds = fixture();
        for blank in [ResultSet::Empty, ResultSet::NotReady] {
            let mut buf = Vec::new();
            write_results_csv(&ds, &blank, &mut buf).unwrap();
            let text = String::from_utf8(buf).unwrap();
            assert_eq!(
                text.trim_end(),
                "id,genus,species,neighbourhood,latitude,longitude,year"
            );
        }
    }

    #[test]
    fn chart_has_fixed_canvas_size() {
        let counts = YearGenusCounts::new();
        let colors = GenusColors::new(&Default::default(), 0.0);
        let img = render_chart(&counts, &colors, CHART_SIZE.0, CHART_SIZE.1);
        assert_eq!(img.dimensions(), CHART_SIZE);
    }

    #[test]
    fn empty_aggregation_renders_blank_canvas() {
        let counts = YearGenusCounts::new();
        let colors = GenusColors::new(&Default::default(), 0.0);
        let img = render_chart(&counts, &colors, 200, 100);
        // Only background and axis pixels.
        let distinct: std::collections::BTreeSet<_> =
            img.pixels().map(|p| p.0).collect();
        assert!(distinct.len() <= 2);
    }

    #[test]
    fn bars_are_drawn_in_genus_colors() {
        let ds = fixture();
        let counts =
            crate::data::aggregate::count_by_year_genus(&ds, &acer_results(&ds));
        let colors = GenusColors::new(&ds.genera, 0.0);
        let img = render_chart(&counts, &colors, 300, 200);

        let acer = to_rgba(colors.color_for("ACER"));
        assert!(img.pixels().any(|p| *p == acer));
    }
}
