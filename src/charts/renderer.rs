//! Static Chart Renderer
//! Writes the ranking and gender charts to PNG files with plotters.

use crate::analysis::{GenderTrendRow, RankingRow};
use anyhow::Result;
use plotters::prelude::*;
use std::path::Path;

const STEEL_BLUE: RGBColor = RGBColor(70, 130, 180);
const PINK: RGBColor = RGBColor(255, 182, 193);
const LIGHT_BLUE: RGBColor = RGBColor(173, 216, 230);

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Ranking bar chart for one year.
    pub fn render_ranking_png(
        path: &Path,
        year: i32,
        rows: &[RankingRow],
        size: (u32, u32),
    ) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        if rows.is_empty() {
            Self::draw_no_data(&root, size)?;
            root.present()?;
            return Ok(());
        }

        let n = rows.len() as i32;
        let max_count = rows.iter().map(|r| r.total_count).max().unwrap_or(0).max(1);
        let labels: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        // Largest total gets the highest segment so it is drawn on top
        let segment = |rank: usize| n - 1 - rank as i32;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("Top {} Baby Names in {}", rows.len(), year),
                ("sans-serif", 22),
            )
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(120)
            .build_cartesian_2d(0i64..max_count + max_count / 6, (0..n).into_segmented())?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows.len())
            .y_label_formatter(&|value: &SegmentValue<i32>| match value {
                SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => labels
                    .get((n - 1 - idx) as usize)
                    .map(|s| s.to_string())
                    .unwrap_or_default(),
                SegmentValue::Last => String::new(),
            })
            .x_desc("Number of Births")
            .y_desc("Name")
            .draw()?;

        chart.draw_series(
            Histogram::horizontal(&chart)
                .style(STEEL_BLUE.filled())
                .margin(4)
                .data(
                    rows.iter()
                        .enumerate()
                        .map(|(rank, row)| (segment(rank), row.total_count)),
                ),
        )?;

        chart.draw_series(rows.iter().enumerate().map(|(rank, row)| {
            Text::new(
                format!(" {}", row.total_count),
                (row.total_count, SegmentValue::CenterOf(segment(rank))),
                ("sans-serif", 12).into_font(),
            )
        }))?;

        root.present()?;
        Ok(())
    }

    /// Boy/girl percentage lines.
    pub fn render_gender_trend_png(
        path: &Path,
        title: &str,
        rows: &[GenderTrendRow],
        size: (u32, u32),
    ) -> Result<()> {
        let root = BitMapBackend::new(path, size).into_drawing_area();
        root.fill(&WHITE)?;

        let (Some(first), Some(last)) = (rows.first(), rows.last()) else {
            Self::draw_no_data(&root, size)?;
            root.present()?;
            return Ok(());
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 20))
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d((first.year - 1)..(last.year + 1), 0f64..100f64)?;

        chart
            .configure_mesh()
            .x_desc("Year")
            .y_desc("Percentage (%)")
            .draw()?;

        let girls: Vec<(i32, f64)> = rows.iter().map(|r| (r.year, r.pct_girls)).collect();
        let boys: Vec<(i32, f64)> = rows.iter().map(|r| (r.year, r.pct_boys)).collect();

        for (label, color, points) in [("Girls", PINK, girls), ("Boys", LIGHT_BLUE, boys)] {
            chart
                .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
                .label(label)
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
            chart.draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, 3, color.filled())),
            )?;
        }

        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        Ok(())
    }

    fn draw_no_data<DB: DrawingBackend>(
        root: &DrawingArea<DB, plotters::coord::Shift>,
        (width, height): (u32, u32),
    ) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
        root.draw(&Text::new(
            "No data",
            (width as i32 / 2 - 40, height as i32 / 2),
            ("sans-serif", 24).into_font().color(&BLACK),
        ))
    }
}
