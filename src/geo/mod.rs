pub mod geohash;
pub mod point;
pub mod zoom;

pub use self::geohash::{GeoBox, Geohash, MAX_PRECISION};
pub use self::point::{Bounds, GeoPoint, LonRange};
pub use self::zoom::precision_for_zoom;
