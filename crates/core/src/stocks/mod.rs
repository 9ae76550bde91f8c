pub mod model;
pub mod store;

pub use model::{DailyBar, Exchange, NewStock, Stock};
pub use store::StockStore;
