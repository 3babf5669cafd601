// Domain layer: PBM data model and ports (interfaces). No transport or codec code here.

pub mod model;
pub mod ports;
