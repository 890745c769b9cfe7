// Market analysis domain
pub mod alert;
pub mod bar;
pub mod stats;
pub mod window;

pub use alert::Alert;
pub use bar::{DailySeries, PriceBar};
pub use stats::{TickerStats, WindowStats};
pub use window::AnalysisWindow;
