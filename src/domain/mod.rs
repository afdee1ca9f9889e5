// Domain layer: catalog and ledger models plus the ports the core writes through.

pub mod model;
pub mod ports;
