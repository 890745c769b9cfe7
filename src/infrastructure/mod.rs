pub mod cache;
pub mod export;
pub mod http_client_factory;
pub mod market_data;
pub mod telegram;
pub mod universe;
