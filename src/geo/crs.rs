use super::ProjectionError;
use proj4rs::proj::Proj;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Coordinate reference system identified by its EPSG code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crs {
    epsg: u16,
}

impl Crs {
    pub const WGS84: Crs = Crs { epsg: 4326 };

    pub fn from_epsg(epsg: u16) -> Result<Self, ProjectionError> {
        Proj::from_epsg_code(epsg)?;
        Ok(Self { epsg })
    }

    pub fn epsg(&self) -> u16 {
        self.epsg
    }

    pub fn proj(&self) -> Result<Proj, ProjectionError> {
        Ok(Proj::from_epsg_code(self.epsg)?)
    }

    pub fn is_geographic(&self) -> Result<bool, ProjectionError> {
        Ok(self.proj()?.is_latlong())
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::WGS84
    }
}

impl FromStr for Crs {
    type Err = ProjectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let code = match trimmed.split_once(':') {
            Some((authority, code)) if authority.eq_ignore_ascii_case("epsg") => code,
            _ => return Err(ProjectionError::BadCrs(s.to_string())),
        };
        let epsg = code
            .parse::<u16>()
            .map_err(|_| ProjectionError::BadCrs(s.to_string()))?;
        Self::from_epsg(epsg)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EPSG:{}", self.epsg)
    }
}

impl Serialize for Crs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
