mod alphavantage;
mod yahoo;

pub use alphavantage::AlphaVantageAdapter;
pub use yahoo::YahooAdapter;
