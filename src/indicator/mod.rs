pub mod returns;
pub mod rsi;
pub mod sma;
