pub mod catalogue;
pub mod city;
pub mod fuzzy;
pub mod images;
pub mod pool;
pub mod recommendations;
pub mod weather;
pub mod youtube;

pub use catalogue::Library;
pub use recommendations::Session;
pub use weather::{CwaProvider, WeatherProvider};
