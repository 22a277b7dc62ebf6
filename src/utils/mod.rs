// Utils compartidos

pub mod constants;
pub mod storage;
pub mod leaflet_ffi;

pub use constants::*;
pub use storage::*;
