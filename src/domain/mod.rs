// Domain layer: citation models and ports. Adapters implement the ports.

pub mod model;
pub mod ports;
