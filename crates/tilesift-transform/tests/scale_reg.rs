//! Scale regression test
//!
//! Mask-style upscaling must reproduce the full-resolution labels exactly;
//! thumbnail-style reduction must keep geometry and flat colors.

use tilesift_core::{Rect, Rgb};
use tilesift_test::{RegParams, synth};
use tilesift_transform::{ScaleMethod, scale, scale_to_size};

#[test]
fn scale_reg() {
    let mut rp = RegParams::new("scale");

    // Block-constant mask reduced 8x then restored by sampling
    let full = synth::painted(
        256,
        128,
        Rgb::WHITE,
        &[
            (Rect::new(32, 16, 64, 48), synth::TISSUE),
            (Rect::new(160, 64, 32, 32), Rgb::new(0, 0, 255)),
        ],
    );
    let reduced = synth::reduce_mask(&full, 8);
    rp.compare_values(32.0, reduced.width() as f64, 0.0);
    rp.compare_values(16.0, reduced.height() as f64, 0.0);
    let restored = scale_to_size(&reduced, 256, 128, ScaleMethod::Sampling).expect("restore");
    rp.compare_raster(&full, &restored);

    // Linear upscaling of the same mask changes only pixels near edges
    let smooth = scale_to_size(&reduced, 256, 128, ScaleMethod::Linear).expect("linear");
    let inside = Rect::new(40, 24, 48, 32);
    rp.compare_values(
        inside.area() as f64,
        smooth.count_matching_in(&inside, synth::TISSUE).expect("count") as f64,
        0.0,
    );

    // Thumbnail reduction
    let slide = synth::textured_slide(1000, 600);
    let thumb = scale(&slide, 0.05, 0.05, ScaleMethod::AreaMap).expect("thumb");
    rp.compare_values(50.0, thumb.width() as f64, 0.0);
    rp.compare_values(30.0, thumb.height() as f64, 0.0);

    let flat = synth::solid(640, 480, Rgb::new(230, 200, 210));
    let flat_thumb = scale(&flat, 0.05, 0.05, ScaleMethod::AreaMap).expect("flat thumb");
    rp.compare_values(
        flat_thumb.total_pixels() as f64,
        flat_thumb.count_matching(Rgb::new(230, 200, 210)) as f64,
        0.0,
    );

    rp.write_artifact(&thumb, "thumb").expect("artifact");
    assert!(rp.cleanup(), "scale regression test failed");
}
