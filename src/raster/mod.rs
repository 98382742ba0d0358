use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Display;

mod decode;
mod endian;
mod format;
mod masked;

pub use endian::Endian;
pub use format::SampleFormat;
pub use masked::{MaskedBand, MaskedTile};

#[derive(Debug)]
pub enum RasterError {
    BufferSize((usize, (u32, u32), u16)),
    SampleCount((usize, (u32, u32))),
    DimensionMismatch {
        band: String,
        expected: (u32, u32),
        found: (u32, u32),
    },
    NotSupported(String),
}

/// A single 2D grid of numeric samples, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct Band {
    pub dimensions: (u32, u32),
    samples: Vec<f64>,
}

impl Band {
    pub fn new(dimensions: (u32, u32), samples: Vec<f64>) -> Result<Self, RasterError> {
        if samples.len() != pixel_count(dimensions) {
            return Err(RasterError::SampleCount((samples.len(), dimensions)));
        }
        Ok(Self {
            dimensions,
            samples,
        })
    }

    pub fn filled(dimensions: (u32, u32), value: f64) -> Self {
        Self {
            dimensions,
            samples: vec![value; pixel_count(dimensions)],
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.dimensions.0 || y >= self.dimensions.1 {
            return None;
        }
        self.samples
            .get(pixel_index(self.dimensions, x, y))
            .copied()
    }

    pub fn put(&mut self, x: u32, y: u32, value: f64) -> Result<(), RasterError> {
        if x >= self.dimensions.0 || y >= self.dimensions.1 {
            return Err(RasterError::NotSupported(format!(
                "Pixel ({x}, {y}) outside {}x{} band",
                self.dimensions.0, self.dimensions.1
            )));
        }
        self.samples[pixel_index(self.dimensions, x, y)] = value;
        Ok(())
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// One observation: a set of equally sized named bands.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterTile {
    pub id: Option<String>,
    pub acquired: Option<NaiveDate>,
    dimensions: (u32, u32),
    bands: BTreeMap<String, Band>,
}

impl RasterTile {
    pub fn new(dimensions: (u32, u32)) -> Self {
        Self {
            id: None,
            acquired: None,
            dimensions,
            bands: BTreeMap::new(),
        }
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_acquisition_date(mut self, date: NaiveDate) -> Self {
        self.acquired = Some(date);
        self
    }

    pub fn with_band<S: Into<String>>(mut self, name: S, band: Band) -> Result<Self, RasterError> {
        self.insert_band(name, band)?;
        Ok(self)
    }

    pub fn insert_band<S: Into<String>>(
        &mut self,
        name: S,
        band: Band,
    ) -> Result<Option<Band>, RasterError> {
        let name = name.into();
        if band.dimensions != self.dimensions {
            return Err(RasterError::DimensionMismatch {
                band: name,
                expected: self.dimensions,
                found: band.dimensions,
            });
        }
        Ok(self.bands.insert(name, band))
    }

    pub fn band(&self, name: &str) -> Option<&Band> {
        self.bands.get(name)
    }

    pub fn bands(&self) -> impl Iterator<Item = (&str, &Band)> {
        self.bands.iter().map(|(name, band)| (name.as_str(), band))
    }

    pub fn band_names(&self) -> Vec<&str> {
        self.bands.keys().map(|name| name.as_str()).collect()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    pub fn pixel_count(&self) -> usize {
        pixel_count(self.dimensions)
    }
}

impl Display for RasterTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "RasterTile({}x{}, {:?}",
            self.dimensions.0,
            self.dimensions.1,
            self.band_names()
        )?;
        if let Some(date) = self.acquired {
            write!(f, ", acquired {date}")?;
        }
        write!(f, ")")
    }
}

pub(crate) fn pixel_count(dimensions: (u32, u32)) -> usize {
    dimensions.0 as usize * dimensions.1 as usize
}

/// Row-major sample index, computed in `usize` so large rasters don't wrap.
pub(crate) fn pixel_index(dimensions: (u32, u32), x: u32, y: u32) -> usize {
    y as usize * dimensions.0 as usize + x as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_rejects_wrong_sample_count() {
        let result = Band::new((2, 2), vec![0.0; 3]);
        assert!(matches!(result, Err(RasterError::SampleCount((3, (2, 2))))));
    }

    #[test]
    fn band_indexing_is_row_major() {
        let band = Band::new((3, 2), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(band.get(0, 0), Some(0.0));
        assert_eq!(band.get(2, 0), Some(2.0));
        assert_eq!(band.get(0, 1), Some(3.0));
        assert_eq!(band.get(3, 0), None);
        assert_eq!(band.get(0, 2), None);
    }

    #[test]
    fn pixel_index_does_not_wrap_u32() {
        let dims = (u32::MAX, 4);
        assert_eq!(pixel_index(dims, 5, 3), 3 * u32::MAX as usize + 5);
        assert_eq!(pixel_count(dims), 4 * u32::MAX as usize);
    }

    #[test]
    fn put_writes_single_pixel() {
        let mut band = Band::filled((2, 2), 0.0);
        band.put(1, 1, 7.0).unwrap();
        assert_eq!(band.samples(), &[0.0, 0.0, 0.0, 7.0]);
        assert!(band.put(2, 0, 1.0).is_err());
    }

    #[test]
    fn tile_rejects_mismatched_band() {
        let tile = RasterTile::new((2, 2))
            .with_band("B4", Band::filled((2, 2), 1.0))
            .unwrap();
        let result = tile.with_band("QA60", Band::filled((3, 2), 0.0));
        match result {
            Err(RasterError::DimensionMismatch {
                band,
                expected,
                found,
            }) => {
                assert_eq!(band, "QA60");
                assert_eq!(expected, (2, 2));
                assert_eq!(found, (3, 2));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn band_names_are_sorted() {
        let tile = RasterTile::new((1, 1))
            .with_band("QA60", Band::filled((1, 1), 0.0))
            .unwrap()
            .with_band("B2", Band::filled((1, 1), 0.0))
            .unwrap()
            .with_band("B4", Band::filled((1, 1), 0.0))
            .unwrap();
        assert_eq!(tile.band_names(), vec!["B2", "B4", "QA60"]);
    }
}
