pub mod error;
pub mod bits;
pub mod config;
pub mod transport;
pub mod grid;
pub mod raster;
pub mod unpack;
pub mod pack;
pub mod pipeline;
pub mod worker;
