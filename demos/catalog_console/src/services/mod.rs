pub mod latency_store;

pub use latency_store::LatencyStore;
