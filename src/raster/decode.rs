use super::{pixel_count, Band, Endian, RasterError, SampleFormat};

impl Band {
    /// Decode a packed, row-major buffer of single-sample pixels.
    ///
    /// Sentinel-2 L2A products ship reflectance and QA60 as 16-bit unsigned
    /// integers; 8/32/64-bit integer and 32/64-bit float buffers are
    /// accepted as well.
    pub fn from_bytes(
        dimensions: (u32, u32),
        bytes: &[u8],
        bits_per_sample: u16,
        sample_format: SampleFormat,
        endian: Endian,
    ) -> Result<Self, RasterError> {
        let required_bytes = pixel_count(dimensions) * bits_per_sample as usize / 8;
        if bits_per_sample % 8 != 0 || bytes.len() != required_bytes {
            return Err(RasterError::BufferSize((
                bytes.len(),
                dimensions,
                bits_per_sample,
            )));
        }

        use SampleFormat::*;
        let samples: Option<Vec<f64>> = match (bits_per_sample, sample_format) {
            (8, Unsigned) => Some(bytes.iter().map(|b| *b as f64).collect()),
            (8, Signed) => Some(bytes.iter().map(|b| *b as i8 as f64).collect()),
            (16, Unsigned) => endian.decode_all_to_primative::<2, u16, f64>(bytes),
            (16, Signed) => endian.decode_all_to_primative::<2, i16, f64>(bytes),
            (32, Unsigned) => endian.decode_all_to_primative::<4, u32, f64>(bytes),
            (32, Signed) => endian.decode_all_to_primative::<4, i32, f64>(bytes),
            (32, Float) => endian.decode_all_to_primative::<4, f32, f64>(bytes),
            (64, Unsigned) => endian.decode_all_to_primative::<8, u64, f64>(bytes),
            (64, Signed) => endian.decode_all_to_primative::<8, i64, f64>(bytes),
            (64, Float) => endian.decode_all::<8, f64>(bytes),
            (bits, format) => {
                return Err(RasterError::NotSupported(format!(
                    "{bits}-bit {format:?} samples"
                )))
            }
        };

        let samples = samples.ok_or(RasterError::NotSupported(format!(
            "Could not decode {bits_per_sample}-bit {sample_format:?} samples"
        )))?;
        Band::new(dimensions, samples)
    }
}
