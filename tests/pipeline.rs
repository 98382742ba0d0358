use cloudmask::mask::{QualityBitfield, REFLECTANCE_SCALE};
use cloudmask::{
    Band, CloudMaskError, CloudMaskFilter, Endian, RasterTile, SampleFormat, Visualization,
};

const DIMS: (u32, u32) = (4, 4);

fn u16_band(values: &[u16]) -> Band {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    Band::from_bytes(DIMS, &bytes, 16, SampleFormat::Unsigned, Endian::Little).unwrap()
}

// Every combination of the two flags plus unrelated bits, one per pixel.
fn qa_values() -> Vec<u16> {
    let others = [0_u16, 1, 1 << 9, 1 << 12];
    let flags = [0_u16, 1 << 10, 1 << 11, (1 << 10) | (1 << 11)];
    flags
        .iter()
        .flat_map(|f| others.iter().map(move |o| f | o))
        .collect()
}

fn scene() -> RasterTile {
    let red: Vec<u16> = (0..16).map(|i| 1000 + i * 100).collect();
    let green: Vec<u16> = (0..16).map(|i| 500 + i * 7).collect();
    let blue: Vec<u16> = (0..16).map(|i| 9000 - i * 3).collect();
    RasterTile::new(DIMS)
        .with_id("20170115T075221_20170115T075221_T39TVF")
        .with_band("QA60", u16_band(&qa_values()))
        .unwrap()
        .with_band("B4", u16_band(&red))
        .unwrap()
        .with_band("B3", u16_band(&green))
        .unwrap()
        .with_band("B2", u16_band(&blue))
        .unwrap()
}

#[test]
fn flagged_pixels_are_invalid_in_every_band() {
    let tile = scene();
    let masked = CloudMaskFilter::new().apply(&tile).unwrap();
    let qa = qa_values();

    for (name, band) in masked.bands() {
        let raw = tile.band(name).unwrap();
        for (i, sample) in band.samples().iter().enumerate() {
            if QualityBitfield(qa[i] as u32).is_clear() {
                assert_eq!(*sample, Some(raw.samples()[i] / REFLECTANCE_SCALE), "{name}[{i}]");
            } else {
                assert_eq!(*sample, None, "{name}[{i}]");
            }
        }
    }
    assert_eq!(masked.clear_pixel_count(), 4);
}

#[test]
fn masking_one_pixel_leaves_neighbours_alone() {
    let clear = scene();
    let mut qa = vec![0_u16; 16];
    qa[5] = 3072;
    let mut cloudy = clear.clone();
    cloudy.insert_band("QA60", u16_band(&qa)).unwrap();
    let mut all_clear = clear.clone();
    all_clear.insert_band("QA60", u16_band(&[0; 16])).unwrap();

    let filter = CloudMaskFilter::new();
    let a = filter.apply(&cloudy).unwrap();
    let b = filter.apply(&all_clear).unwrap();
    for (name, band) in a.bands() {
        let other = b.band(name).unwrap();
        for i in 0..16 {
            if i == 5 {
                assert_eq!(band.samples()[i], None);
            } else {
                assert_eq!(band.samples()[i], other.samples()[i]);
            }
        }
    }
}

#[test]
fn masked_scene_renders_with_transparent_clouds() {
    let masked = CloudMaskFilter::new().apply(&scene()).unwrap();
    let preview = Visualization::default().render(&masked).unwrap();
    let qa = qa_values();

    assert_eq!(preview.dimensions, DIMS);
    for y in 0..DIMS.1 {
        for x in 0..DIMS.0 {
            let i = (y * DIMS.0 + x) as usize;
            let pixel = preview.get_pixel(x, y).unwrap();
            if QualityBitfield(qa[i] as u32).is_clear() {
                assert_eq!(pixel[3], 255);
                // blue is far above 0.3 reflectance and saturates
                assert_eq!(pixel[2], 255);
            } else {
                assert_eq!(pixel, [0, 0, 0, 0]);
            }
        }
    }
}

#[test]
fn scene_without_quality_band_is_rejected() {
    let tile = RasterTile::new(DIMS)
        .with_band("B4", u16_band(&[0; 16]))
        .unwrap();
    let err = CloudMaskFilter::new().apply(&tile).unwrap_err();
    assert!(matches!(err, CloudMaskError::MissingBand(name) if name == "QA60"));
}

#[test]
fn batch_masking_matches_single_calls() {
    let tiles = vec![scene(), scene().with_id("second")];
    let filter = CloudMaskFilter::new();
    let batch = filter.apply_all(&tiles);
    for (tile, result) in tiles.iter().zip(batch) {
        assert_eq!(result.unwrap(), filter.apply(tile).unwrap());
    }
}
