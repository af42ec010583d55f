//! Sensor layer: the DHT22 climate probe and the TSL2561 light sensor.

pub mod climate;
pub mod light;
