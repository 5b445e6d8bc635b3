pub mod price_bar;
pub mod price_series;

pub use price_bar::PriceBar;
pub use price_series::PriceSeries;
