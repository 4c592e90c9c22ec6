pub mod news;
pub mod weather;

pub use news::{Category, NewsApiSource, NewsRequest};
pub use weather::{WeatherFixture, CITY_WEATHER_MARKUP};
