//! Raster regression test
//!
//! Clipping along slide edges, pasting into a canvas, color counting over
//! windows and copy-on-write sharing.

use tilesift_core::{Raster, Rect, Rgb};
use tilesift_test::{RegParams, synth};

#[test]
fn raster_reg_clip_paste() {
    let mut rp = RegParams::new("raster_clip");

    let slide = synth::textured_slide(130, 70);

    // Tiling the raster with clipped windows and pasting them back
    // reproduces it exactly
    let mut canvas = Raster::new(130, 70).unwrap().to_mut();
    let mut covered = 0u64;
    for y in (0..70).step_by(32) {
        for x in (0..130).step_by(32) {
            let tile = slide.clip_rectangle(&Rect::new(x, y, 32, 32)).unwrap();
            rp.compare_values(32.min(130 - x) as f64, tile.width() as f64, 0.0);
            rp.compare_values(32.min(70 - y) as f64, tile.height() as f64, 0.0);
            let written = canvas.paste(&tile, x, y).unwrap();
            covered += written.area();
        }
    }
    rp.compare_values(slide.total_pixels() as f64, covered as f64, 0.0);
    rp.compare_raster(&slide, &canvas.into());

    // Origin outside the raster is an error, not an empty result
    rp.compare_values(
        1.0,
        slide.clip_rectangle(&Rect::new(130, 0, 1, 1)).is_err() as u8 as f64,
        0.0,
    );

    assert!(rp.cleanup(), "raster_clip regression test failed");
}

#[test]
fn raster_reg_counting() {
    let mut rp = RegParams::new("raster_count");

    let shade = Rgb::new(250, 250, 250);
    let mask = synth::painted(
        50,
        40,
        Rgb::WHITE,
        &[
            (Rect::new(0, 0, 50, 3), shade),
            (Rect::new(10, 10, 20, 20), synth::TISSUE),
        ],
    );

    rp.compare_values(400.0, mask.count_matching(synth::TISSUE) as f64, 0.0);
    rp.compare_values(150.0, mask.count_matching(shade) as f64, 0.0);
    rp.compare_values(
        1450.0,
        mask.count_matching(Rgb::WHITE) as f64,
        0.0,
    );

    // window straddling the tissue edge
    let window = Rect::new(20, 20, 20, 20);
    rp.compare_values(
        100.0,
        mask.count_matching_in(&window, synth::TISSUE).unwrap() as f64,
        0.0,
    );
    rp.compare_values(
        300.0,
        mask.count_matching_in(&window, Rgb::WHITE).unwrap() as f64,
        0.0,
    );

    let top = mask.unique_colors_in(&Rect::new(0, 0, 50, 5)).unwrap();
    let top: Vec<Rgb> = top.into_iter().collect();
    rp.compare_values(2.0, top.len() as f64, 0.0);
    rp.compare_values(1.0, (top[0] == shade) as u8 as f64, 0.0);

    // folding the shade into white leaves only two colors
    let mut m = mask.to_mut();
    rp.compare_values(150.0, m.replace_color(shade, Rgb::WHITE) as f64, 0.0);
    let folded: Raster = m.into();
    rp.compare_values(1600.0, folded.count_matching(Rgb::WHITE) as f64, 0.0);
    rp.compare_values(
        2.0,
        folded.unique_colors_in(&folded.bounds()).unwrap().len() as f64,
        0.0,
    );

    assert!(rp.cleanup(), "raster_count regression test failed");
}

#[test]
fn raster_reg_sharing() {
    let mut rp = RegParams::new("raster_sharing");

    let a = synth::solid(8, 8, Rgb::WHITE);
    let b = a.clone();
    rp.compare_values(2.0, a.ref_count() as f64, 0.0);

    // a shared raster cannot be taken over without copying
    let b = match b.try_into_mut() {
        Ok(_) => panic!("shared raster was taken over"),
        Err(b) => b,
    };
    let mut m = b.to_mut();
    m.render_cross(1, Rgb::BLACK);
    let crossed: Raster = m.into();

    rp.compare_values(64.0, a.count_matching(Rgb::WHITE) as f64, 0.0);
    rp.compare_values(16.0, crossed.count_matching(Rgb::BLACK) as f64, 0.0);

    drop(b);
    rp.compare_values(1.0, a.ref_count() as f64, 0.0);
    rp.compare_values(1.0, a.try_into_mut().is_ok() as u8 as f64, 0.0);

    // RGB byte round trip
    let bytes = crossed.to_rgb_bytes();
    rp.compare_values(192.0, bytes.len() as f64, 0.0);
    let back = Raster::from_rgb_bytes(8, 8, &bytes).unwrap();
    rp.compare_raster(&crossed, &back);

    assert!(rp.cleanup(), "raster_sharing regression test failed");
}
