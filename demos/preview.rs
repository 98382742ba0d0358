#[cfg(not(feature = "image"))]
compile_error!("This example requires the 'image' feature");

use cloudmask::{Band, CloudMaskFilter, RasterTile, Visualization};
use image::DynamicImage;
use std::time::Instant;

const OUTPUT_FILE: &str = "data/preview.png";
const SIZE: (u32, u32) = (256, 256);

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();
    println!("Example: cloudmask preview");

    // Synthetic scene: reflectance gradients under a diagonal cloud band
    let (w, h) = SIZE;
    let mut qa = Band::filled(SIZE, 0.0);
    let mut red = Band::filled(SIZE, 0.0);
    let mut green = Band::filled(SIZE, 0.0);
    let mut blue = Band::filled(SIZE, 0.0);
    for y in 0..h {
        for x in 0..w {
            red.put(x, y, (x * 3000 / w) as f64).unwrap();
            green.put(x, y, (y * 3000 / h) as f64).unwrap();
            blue.put(x, y, 800.0).unwrap();
            let d = x as i64 - y as i64;
            if d.abs() < 20 {
                qa.put(x, y, 1024.0).unwrap();
            } else if (d - 60).abs() < 10 {
                qa.put(x, y, 2048.0).unwrap();
            }
        }
    }
    let tile = RasterTile::new(SIZE)
        .with_id("synthetic")
        .with_band("QA60", qa)
        .unwrap()
        .with_band("B4", red)
        .unwrap()
        .with_band("B3", green)
        .unwrap()
        .with_band("B2", blue)
        .unwrap();
    println!("{tile}");

    let t_mask = Instant::now();
    let masked = CloudMaskFilter::new().apply(&tile).unwrap();
    println!("Masked in {:.3}ms", t_mask.elapsed().as_secs_f32() * 1e3);
    println!("{masked}");

    let preview = Visualization::default().render(&masked).unwrap();
    println!("{preview}");

    let img: DynamicImage = preview.try_into().unwrap();
    img.save(OUTPUT_FILE).unwrap();
    println!("Image saved to {OUTPUT_FILE}");
}
