// Domain layer: records, media and session types plus the ports to external services.

pub mod media;
pub mod model;
pub mod ports;
pub mod records;
pub mod session;
