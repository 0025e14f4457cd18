pub mod forecast;
pub mod quantity;
pub mod reading;

pub use forecast::{ForecastRow, ForecastTable};
pub use quantity::{Measurements, Quantity};
pub use reading::{Granularity, Reading, ReadingTable, StationSeries};
