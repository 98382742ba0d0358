// Sentinel-2 QA60 cloud mask
//   Bit 10: opaque clouds
//   Bit 11: cirrus clouds
//   A pixel is kept only when both flags are clear. Kept samples are
//   converted from digital numbers to reflectance by dividing by 10000.

use crate::error::{CloudMaskError, CloudMaskResult};
use crate::raster::{MaskedBand, MaskedTile, RasterTile};
use num_traits::ToPrimitive;
use std::collections::BTreeMap;
use tracing::*;

pub const DEFAULT_QUALITY_BAND: &str = "QA60";
pub const REFLECTANCE_SCALE: f64 = 10000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QualityBitfield(pub u32);

impl QualityBitfield {
    pub const CLOUD: u32 = 1 << 10;
    pub const CIRRUS: u32 = 1 << 11;

    pub fn is_cloud(self) -> bool {
        self.0 & Self::CLOUD != 0
    }

    pub fn is_cirrus(self) -> bool {
        self.0 & Self::CIRRUS != 0
    }

    pub fn is_clear(self) -> bool {
        self.0 & Self::CLOUD == 0 && self.0 & Self::CIRRUS == 0
    }
}

impl From<u32> for QualityBitfield {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CloudMaskFilter {
    quality_band: String,
}

impl Default for CloudMaskFilter {
    fn default() -> Self {
        Self {
            quality_band: DEFAULT_QUALITY_BAND.to_string(),
        }
    }
}

impl CloudMaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quality_band<S: Into<String>>(mut self, name: S) -> Self {
        self.quality_band = name.into();
        self
    }

    pub fn quality_band(&self) -> &str {
        &self.quality_band
    }

    /// Per-pixel clear-sky mask, `true` where the pixel is kept.
    pub fn clear_mask(&self, tile: &RasterTile) -> CloudMaskResult<Vec<bool>> {
        let qa = tile
            .band(&self.quality_band)
            .ok_or_else(|| CloudMaskError::MissingBand(self.quality_band.clone()))?;

        qa.samples()
            .iter()
            .enumerate()
            .map(|(index, &value)| match qa_bits(value) {
                Some(bits) => Ok(QualityBitfield(bits).is_clear()),
                None => Err(CloudMaskError::InvalidQualityValue { index, value }),
            })
            .collect()
    }

    pub fn apply(&self, tile: &RasterTile) -> CloudMaskResult<MaskedTile> {
        let mask = self.clear_mask(tile)?;

        let bands: BTreeMap<String, MaskedBand> = tile
            .bands()
            .map(|(name, band)| {
                let samples = band
                    .samples()
                    .iter()
                    .zip(mask.iter())
                    .map(|(&value, &clear)| clear.then(|| value / REFLECTANCE_SCALE))
                    .collect();
                (
                    name.to_string(),
                    MaskedBand::from_samples(band.dimensions, samples),
                )
            })
            .collect();

        let clear = mask.iter().filter(|c| **c).count();
        debug!(
            "Masked tile {}: {clear}/{} pixels clear",
            tile.id.as_deref().unwrap_or("<unnamed>"),
            mask.len()
        );

        Ok(MaskedTile {
            id: tile.id.clone(),
            acquired: tile.acquired,
            dimensions: tile.dimensions(),
            bands,
        })
    }

    /// Mask a batch of tiles. Results keep the input order.
    pub fn apply_all(&self, tiles: &[RasterTile]) -> Vec<CloudMaskResult<MaskedTile>> {
        #[cfg(feature = "async")]
        use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
        #[cfg(feature = "async")]
        let tiles = tiles.par_iter();
        #[cfg(not(feature = "async"))]
        let tiles = tiles.iter();

        tiles.map(|tile| self.apply(tile)).collect()
    }
}

fn qa_bits(value: f64) -> Option<u32> {
    if value.fract() != 0.0 {
        return None;
    }
    value.to_u32()
}
