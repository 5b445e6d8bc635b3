pub mod chart;
pub mod page;

pub use chart::{candle_chart_svg, oscillator_chart_svg};
pub use page::render_page;
