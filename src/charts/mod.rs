//! Charts module - interactive plots and static exports

pub mod geo_shapes;
mod palette;
mod plotter;
mod renderer;

pub use palette::ColorScheme;
pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
