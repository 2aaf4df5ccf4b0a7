use super::{Bounds, GraphSaver, PlotKind};
use crate::threshold::{Threshold, ThresholdResult};
use miette::IntoDiagnostic;
use plotters::{
    chart::{ChartBuilder, ChartContext},
    coord::{Shift, types::RangedCoordf64},
    prelude::{Cartesian2d, DrawingArea, IntoDrawingArea, PathElement, SVGBackend},
    series::LineSeries,
    style::{BLACK, Color, IntoFont, Palette, Palette99, RGBAColor, WHITE},
};
use std::{collections::BTreeMap, path::Path};
use tracing::instrument;

type MyDrawingArea<'a> = DrawingArea<SVGBackend<'a>, Shift>;
type MyChartContext<'a> =
    ChartContext<'a, SVGBackend<'a>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

trait MyBuilder<'a>: Sized {
    fn build_rate_graph(
        root: &MyDrawingArea<'a>,
        bounds: Bounds,
        caption: &str,
    ) -> miette::Result<Self>;
    fn draw_series_to_chart(
        &mut self,
        result: &ThresholdResult,
        color: RGBAColor,
    ) -> miette::Result<()>;
    fn draw_level_to_chart(
        &mut self,
        level: f64,
        bounds: &Bounds,
        label: String,
        color: RGBAColor,
    ) -> miette::Result<()>;
}

#[derive(Default)]
pub(crate) struct SvgSaver {}

impl<'a> MyBuilder<'a> for MyChartContext<'a> {
    #[instrument(skip_all, level = "debug")]
    fn build_rate_graph(
        root: &MyDrawingArea<'a>,
        bounds: Bounds,
        caption: &str,
    ) -> miette::Result<MyChartContext<'a>> {
        let mut chart = ChartBuilder::on(root)
            .x_label_area_size(35)
            .y_label_area_size(60)
            .margin(10)
            .caption(caption, ("sans-serif", 30.0).into_font())
            .build_cartesian_2d(
                bounds.time.min..bounds.time.max,
                bounds.rate.min..bounds.rate.max,
            )
            .into_diagnostic()?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("GPS time [s]")
            .y_desc("Glitch rate MA [Hz]")
            .y_label_formatter(&|y| format!("{y:.3}"))
            .draw()
            .into_diagnostic()?;

        Ok(chart)
    }

    #[instrument(skip_all, level = "debug")]
    fn draw_series_to_chart(
        &mut self,
        result: &ThresholdResult,
        color: RGBAColor,
    ) -> miette::Result<()> {
        let data = result
            .series
            .samples()
            .iter()
            .map(|sample| (sample.time, sample.value));

        self.draw_series(LineSeries::new(data, color.stroke_width(2)))
            .into_diagnostic()?
            .label(result.name())
            .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], color));
        Ok(())
    }

    #[instrument(skip_all, level = "debug")]
    fn draw_level_to_chart(
        &mut self,
        level: f64,
        bounds: &Bounds,
        label: String,
        color: RGBAColor,
    ) -> miette::Result<()> {
        let color = color.mix(0.6);
        let line = [(bounds.time.min, level), (bounds.time.max, level)];

        self.draw_series(LineSeries::new(line, color.stroke_width(1)))
            .into_diagnostic()?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x - 10, y), (x + 10, y)], color));
        Ok(())
    }
}

impl GraphSaver for SvgSaver {
    fn save_as_svg(
        results: &BTreeMap<Threshold, ThresholdResult>,
        kind: PlotKind,
        path: &Path,
        (width, height): (u32, u32),
        bounds: Bounds,
    ) -> miette::Result<()> {
        let root = SVGBackend::new(path, (width, height)).into_drawing_area();

        root.fill(&WHITE).into_diagnostic()?;

        let mut chart = MyChartContext::build_rate_graph(&root, bounds, kind.caption())?;

        for (index, result) in results.values().enumerate() {
            let color = Palette99::pick(index).to_rgba();
            chart.draw_series_to_chart(result, color)?;

            if kind == PlotKind::SeriesWithStatistics {
                if let Some((lower, upper)) = result.statistics.band() {
                    let threshold = result.threshold;
                    chart.draw_level_to_chart(
                        lower,
                        &bounds,
                        format!("Mean{threshold}-STD"),
                        color,
                    )?;
                    chart.draw_level_to_chart(
                        upper,
                        &bounds,
                        format!("Mean{threshold}+STD"),
                        color,
                    )?;
                }
            }
        }

        chart
            .configure_series_labels()
            .background_style(WHITE)
            .border_style(BLACK)
            .draw()
            .into_diagnostic()?;

        root.present().into_diagnostic()?;
        Ok(())
    }
}
