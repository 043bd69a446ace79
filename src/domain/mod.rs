// Domain layer: models, ports (interfaces) and the group/race lifecycle services.

pub mod model;
pub mod ports;

pub mod services;
