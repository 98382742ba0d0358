use super::{Crs, ProjectionError, Region};
use crate::error::{CloudMaskError, CloudMaskResult};
use proj4rs::transform::transform;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Simple polygon given as a ring of `(lon, lat)` vertices in degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    ring: Vec<(f64, f64)>,
}

impl Polygon {
    pub fn new(vertices: Vec<(f64, f64)>) -> CloudMaskResult<Self> {
        let mut ring = vertices;
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }

        for &(lon, lat) in ring.iter() {
            if !lon.is_finite() || !lat.is_finite() {
                return Err(CloudMaskError::BadPolygon(format!(
                    "Non-finite vertex ({lon}, {lat})"
                )));
            }
            if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
                return Err(CloudMaskError::BadPolygon(format!(
                    "Vertex ({lon}, {lat}) outside lon [-180, 180], lat [-90, 90]"
                )));
            }
        }

        let mut distinct: Vec<(f64, f64)> = Vec::with_capacity(ring.len());
        for vertex in ring.iter() {
            if !distinct.contains(vertex) {
                distinct.push(*vertex);
            }
        }
        if distinct.len() < 3 {
            return Err(CloudMaskError::BadPolygon(format!(
                "Need at least 3 distinct vertices, got {}",
                distinct.len()
            )));
        }
        if shoelace_area(&ring) == 0.0 {
            return Err(CloudMaskError::BadPolygon("Ring has zero area".into()));
        }

        Ok(Self { ring })
    }

    pub fn rectangle(west: f64, south: f64, east: f64, north: f64) -> CloudMaskResult<Self> {
        Self::new(vec![
            (west, north),
            (west, south),
            (east, south),
            (east, north),
        ])
    }

    pub fn vertices(&self) -> &[(f64, f64)] {
        &self.ring
    }

    /// Closed ring as `[[lon, lat], ...]`, first vertex repeated at the end.
    pub fn coordinates(&self) -> Vec<[f64; 2]> {
        self.ring
            .iter()
            .chain(self.ring.first())
            .map(|&(lon, lat)| [lon, lat])
            .collect()
    }

    /// Longitude/latitude bounding box in degrees.
    pub fn bounds(&self) -> Region<f64> {
        let mut region = Region::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for &(lon, lat) in self.ring.iter() {
            region.x.min = region.x.min.min(lon);
            region.x.max = region.x.max.max(lon);
            region.y.min = region.y.min.min(lat);
            region.y.max = region.y.max.max(lat);
        }
        region
    }

    /// Bounding box corners projected into `crs`.
    ///
    /// Geographic targets are returned in degrees, projected targets in the
    /// CRS's native units.
    pub fn bounds_in(&self, crs: &Crs) -> Result<Region<f64>, ProjectionError> {
        let from = Crs::WGS84.proj()?;
        let to = crs.proj()?;
        let geographic = to.is_latlong();

        let (west, south, east, north) = self.bounds().as_tuple();
        let mut corners = Vec::with_capacity(4);
        for (lon, lat) in [(west, south), (west, north), (east, south), (east, north)] {
            let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
            transform(&from, &to, &mut point)?;
            let (x, y) = if geographic {
                (point.0.to_degrees(), point.1.to_degrees())
            } else {
                (point.0, point.1)
            };
            if !x.is_finite() || !y.is_finite() {
                return Err(ProjectionError::NonFinite((x, y)));
            }
            corners.push((x, y));
        }

        let mut region = Region::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (x, y) in corners {
            region.x.min = region.x.min.min(x);
            region.x.max = region.x.max.max(x);
            region.y.min = region.y.min.min(y);
            region.y.max = region.y.max.max(y);
        }
        Ok(region)
    }
}

// GeoJSON geometry
impl Serialize for Polygon {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Polygon", 2)?;
        state.serialize_field("type", "Polygon")?;
        state.serialize_field("coordinates", &[self.coordinates()])?;
        state.end()
    }
}

fn shoelace_area(ring: &[(f64, f64)]) -> f64 {
    let n = ring.len();
    (0..n)
        .map(|i| {
            let (x0, y0) = ring[i];
            let (x1, y1) = ring[(i + 1) % n];
            x0 * y1 - x1 * y0
        })
        .sum::<f64>()
        .abs()
        / 2.0
}
