// Domain layer: form models and ports (backend + view). No I/O here.

pub mod model;
pub mod ports;
