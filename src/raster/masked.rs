use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt::Display;

/// A band whose samples may be invalid (masked out).
#[derive(Clone, Debug, PartialEq)]
pub struct MaskedBand {
    pub dimensions: (u32, u32),
    samples: Vec<Option<f64>>,
}

impl MaskedBand {
    pub(crate) fn from_samples(dimensions: (u32, u32), samples: Vec<Option<f64>>) -> Self {
        Self {
            dimensions,
            samples,
        }
    }

    /// Sample at `(x, y)`, `None` when masked or out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<f64> {
        if x >= self.dimensions.0 || y >= self.dimensions.1 {
            return None;
        }
        self.samples
            .get(super::pixel_index(self.dimensions, x, y))
            .copied()
            .flatten()
    }

    pub fn is_valid(&self, x: u32, y: u32) -> bool {
        self.get(x, y).is_some()
    }

    pub fn samples(&self) -> &[Option<f64>] {
        &self.samples
    }

    pub fn valid_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MaskedTile {
    pub id: Option<String>,
    pub acquired: Option<NaiveDate>,
    pub(crate) dimensions: (u32, u32),
    pub(crate) bands: BTreeMap<String, MaskedBand>,
}

impl MaskedTile {
    pub fn band(&self, name: &str) -> Option<&MaskedBand> {
        self.bands.get(name)
    }

    pub fn bands(&self) -> impl Iterator<Item = (&str, &MaskedBand)> {
        self.bands.iter().map(|(name, band)| (name.as_str(), band))
    }

    pub fn band_names(&self) -> Vec<&str> {
        self.bands.keys().map(|name| name.as_str()).collect()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    /// Number of pixels that survived the mask.
    pub fn clear_pixel_count(&self) -> usize {
        self.bands
            .values()
            .next()
            .map(|band| band.valid_count())
            .unwrap_or(0)
    }
}

impl Display for MaskedTile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.dimensions.0 as usize * self.dimensions.1 as usize;
        write!(
            f,
            "MaskedTile({}x{}, {:?}, {}/{} clear)",
            self.dimensions.0,
            self.dimensions.1,
            self.band_names(),
            self.clear_pixel_count(),
            total
        )
    }
}
