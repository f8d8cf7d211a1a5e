pub mod catalogue;
pub mod recommendation;
pub mod weather;

pub use catalogue::{CatalogueRow, MovieEntry, VideoEntry, WeatherCode};
pub use recommendation::{
    MovieRecommendation, QueryResponse, VideoRecommendation, WeatherImage, WeatherQuery,
};
pub use weather::{
    CwaLocation, CwaParameter, CwaRecords, CwaResponse, CwaTimeEntry, CwaWeatherElement,
    Forecast,
};
