// Adapters layer: concrete implementations for external systems (http, storage, terminal chart).

pub mod chart;
pub mod http;
pub mod storage;
