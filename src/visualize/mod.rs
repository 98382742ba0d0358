use crate::error::{CloudMaskError, CloudMaskResult};
use crate::raster::{pixel_index, MaskedTile};
use serde::Serialize;
use std::fmt::Display;

#[cfg(feature = "image")]
mod image;

/// Three-band linear stretch to 8-bit RGBA.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Visualization {
    pub bands: [String; 3],
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Default for Visualization {
    fn default() -> Self {
        Self {
            bands: ["B4".to_string(), "B3".to_string(), "B2".to_string()],
            min: [0.0; 3],
            max: [0.3; 3],
        }
    }
}

impl Visualization {
    pub fn new<S: Into<String>>(bands: [S; 3], min: [f64; 3], max: [f64; 3]) -> Self {
        let [r, g, b] = bands;
        Self {
            bands: [r.into(), g.into(), b.into()],
            min,
            max,
        }
    }

    pub fn validate(&self) -> CloudMaskResult<()> {
        for i in 0..3 {
            let (min, max) = (self.min[i], self.max[i]);
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(CloudMaskError::InvalidVisualization(format!(
                    "band `{}` range [{min}, {max}]",
                    self.bands[i]
                )));
            }
        }
        Ok(())
    }

    pub fn render(&self, tile: &MaskedTile) -> CloudMaskResult<Preview> {
        self.validate()?;
        let channels = [
            self.channel(tile, 0)?,
            self.channel(tile, 1)?,
            self.channel(tile, 2)?,
        ];

        let (width, height) = tile.dimensions();
        let mut buffer = Vec::with_capacity(width as usize * height as usize * 4);
        for i in 0..(width as usize * height as usize) {
            match (channels[0][i], channels[1][i], channels[2][i]) {
                (Some(r), Some(g), Some(b)) => buffer.extend_from_slice(&[
                    self.stretch(0, r),
                    self.stretch(1, g),
                    self.stretch(2, b),
                    u8::MAX,
                ]),
                _ => buffer.extend_from_slice(&[0, 0, 0, 0]),
            }
        }

        Ok(Preview {
            dimensions: (width, height),
            buffer,
        })
    }

    fn channel<'t>(&self, tile: &'t MaskedTile, i: usize) -> CloudMaskResult<&'t [Option<f64>]> {
        tile.band(&self.bands[i])
            .map(|band| band.samples())
            .ok_or_else(|| CloudMaskError::MissingBand(self.bands[i].clone()))
    }

    fn stretch(&self, i: usize, value: f64) -> u8 {
        let unit = ((value - self.min[i]) / (self.max[i] - self.min[i])).clamp(0.0, 1.0);
        (unit * 255.0).round() as u8
    }
}

/// Interleaved 8-bit RGBA pixels, row-major. Masked pixels have zero alpha.
#[derive(Clone, Debug, PartialEq)]
pub struct Preview {
    pub dimensions: (u32, u32),
    pub buffer: Vec<u8>,
}

impl Preview {
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.dimensions.0 || y >= self.dimensions.1 {
            return None;
        }
        let start = pixel_index(self.dimensions, x, y) * 4;
        self.buffer
            .get(start..start + 4)
            .and_then(|p| p.try_into().ok())
    }
}

impl Display for Preview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Preview({}x{}, RGBA8, {}Bytes)",
            self.dimensions.0,
            self.dimensions.1,
            self.buffer.len()
        )
    }
}
