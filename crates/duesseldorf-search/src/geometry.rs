//! Geometry decoding and reprojection into the display CRS.
//!
//! The endpoint delivers WKT in a local projected CRS that is not necessarily
//! registered anywhere, so it is always described by an explicit proj4 string.
//! Coordinates go through geographic WGS84 and are then placed on the
//! spherical web mercator plane (EPSG:3857) used by the map viewer.

use std::f64::consts::FRAC_PI_4;
use std::fmt;

use geo::{Coord, Geometry, MapCoords};
use proj4rs::proj::Proj;
use wkt::TryFromWkt;

use crate::{
    config::SearchConfig,
    error::{Result, SearchError},
};

/// The display CRS
pub const TARGET_EPSG: &str = "EPSG:3857";

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";
const EARTH_RADIUS: f64 = 6_378_137.0;
const MAX_LATITUDE_DEG: f64 = 85.051_128_779_806_59;

/// Reads WKT in the source CRS and returns geometries in [`TARGET_EPSG`].
pub struct Reprojector {
    epsg: u32,
    source: Proj,
    wgs84: Proj,
}

impl fmt::Debug for Reprojector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reprojector")
            .field("source", &format_args!("EPSG:{}", self.epsg))
            .field("target", &TARGET_EPSG)
            .finish()
    }
}

impl Reprojector {
    pub fn new(epsg: u32, proj4: &str) -> Result<Self> {
        let source = Proj::from_proj_string(proj4).map_err(|e| {
            SearchError::Projection(format!("Invalid proj4 definition for EPSG:{epsg}: {e}"))
        })?;
        let wgs84 = Proj::from_proj_string(WGS84).map_err(|e| SearchError::Projection(e.to_string()))?;
        Ok(Self {
            epsg,
            source,
            wgs84,
        })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::new(config.epsg_code()?, &config.proj4)
    }

    pub const fn source_epsg(&self) -> u32 {
        self.epsg
    }

    /// Parse WKT in the source CRS and reproject every coordinate.
    pub fn read_wkt(&self, wkt: &str) -> Result<Geometry<f64>> {
        let geometry = Geometry::<f64>::try_from_wkt_str(wkt)
            .map_err(|e| SearchError::InvalidGeometry(e.to_string()))?;
        geometry.try_map_coords(|coord| self.project(coord))
    }

    /// Project a single source coordinate.
    pub fn project(&self, coord: Coord<f64>) -> Result<Coord<f64>> {
        let mut point = (coord.x, coord.y, 0.0);
        proj4rs::transform::transform(&self.source, &self.wgs84, &mut point)
            .map_err(|e| SearchError::Projection(e.to_string()))?;
        // geographic output is in radians
        Ok(web_mercator(point.0, point.1))
    }
}

/// Spherical mercator for a longitude/latitude pair given in radians.
///
/// Latitude is clamped to the square extent of the web mercator plane.
pub fn web_mercator(lon: f64, lat: f64) -> Coord<f64> {
    let max_lat = MAX_LATITUDE_DEG.to_radians();
    let lat = lat.clamp(-max_lat, max_lat);
    Coord {
        x: EARTH_RADIUS * lon,
        y: EARTH_RADIUS * (FRAC_PI_4 + lat / 2.0).tan().ln(),
    }
}

/// Inverse of [`web_mercator`], in degrees. Handy for checking results.
pub fn web_mercator_to_lon_lat(coord: Coord<f64>) -> (f64, f64) {
    let lon = coord.x / EARTH_RADIUS;
    let lat = 2.0 * (coord.y / EARTH_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2;
    (lon.to_degrees(), lat.to_degrees())
}
