//! Color quantization regression test
//!
//! Runs median cut, octree and k-means over synthetic images and checks the
//! properties every quantizer must satisfy: palette size bound, valid
//! indices and nearest-color assignment.

use colorquant_core::{RgbImage, color};
use colorquant_quantize::{
    ColorQuantizer, KMeansOptions, MedianCutOptions, OctreeOptions, QuantizeMethod, Quantizer,
    count_colors, quantize_image,
};
use colorquant_test::{RegParams, make_color_gradient, make_few_colors, make_random_colors};

fn methods(max_colors: u32) -> Vec<(&'static str, QuantizeMethod)> {
    vec![
        (
            "median_cut",
            QuantizeMethod::MedianCut(MedianCutOptions { max_colors }),
        ),
        (
            "octree",
            QuantizeMethod::Octree(OctreeOptions {
                max_colors,
                ..Default::default()
            }),
        ),
        (
            "kmeans",
            QuantizeMethod::KMeans(KMeansOptions {
                max_colors,
                max_iterations: 50,
                ..Default::default()
            }),
        ),
    ]
}

/// Every pixel's palette entry is at least as close as any other entry.
fn check_nearest(image: &RgbImage, q: &Quantizer, rp: &mut RegParams) {
    let palette = q.color_map();
    let mut ok = true;
    for &p in image.pixels() {
        let Ok(idx) = q.find_color_index(p, palette) else {
            ok = false;
            break;
        };
        let Some(chosen) = palette.get(idx) else {
            ok = false;
            break;
        };
        let d = color::distance_sq(p, chosen);
        if palette.iter().any(|&c| color::distance_sq(p, c) < d) {
            ok = false;
            break;
        }
    }
    rp.check(ok, "pixel not assigned to nearest palette entry");
}

fn test_image(image: &RgbImage, name: &str, rp: &mut RegParams) {
    let w = image.width();
    let h = image.height();
    let n_colors = count_colors(image.pixels());
    eprintln!("  Testing image '{}': {}x{}, {} colors", name, w, h, n_colors);

    for &max_colors in &[2u32, 16, 128, 256] {
        for (method_name, method) in methods(max_colors) {
            let q = match Quantizer::from_image(image, &method) {
                Ok(q) => q,
                Err(e) => {
                    eprintln!("    {}(max_colors={}) FAILED: {}", method_name, max_colors, e);
                    rp.compare_values(1.0, 0.0, 0.0);
                    continue;
                }
            };
            let ncolors = q.color_count();
            rp.check(
                ncolors <= max_colors as usize,
                &format!("{} palette larger than {}", method_name, max_colors),
            );
            rp.check(
                ncolors <= n_colors,
                &format!("{} palette larger than the image's color set", method_name),
            );
            rp.check(ncolors >= 1, &format!("{} palette is empty", method_name));
            check_nearest(image, &q, rp);

            match q.quantize(image) {
                Ok(indexed) => {
                    rp.compare_values(w as f64, indexed.width() as f64, 0.0);
                    rp.compare_values(h as f64, indexed.height() as f64, 0.0);
                    rp.compare_values(ncolors as f64, indexed.colormap().len() as f64, 0.0);
                    let valid = indexed
                        .indices()
                        .iter()
                        .all(|&i| (i as usize) < indexed.colormap().len());
                    rp.check(valid, "index outside the colormap");
                }
                Err(e) => {
                    eprintln!("    {}.quantize FAILED: {}", method_name, e);
                    rp.compare_values(1.0, 0.0, 0.0);
                }
            }
        }
    }
}

#[test]
fn colorquant_reg() {
    let mut rp = RegParams::new("colorquant");

    let test_images = vec![
        ("synthetic_gradient", make_color_gradient(80, 60).unwrap()),
        ("few_colors", make_few_colors(40, 30).unwrap()),
        ("random_colors", make_random_colors(64, 64, 17).unwrap()),
    ];

    for (name, image) in &test_images {
        test_image(image, name, &mut rp);
    }

    // The dispatch function gives the same result as the strategy itself
    let image = make_color_gradient(60, 40).unwrap();
    for (name, method) in methods(32) {
        let direct = Quantizer::from_image(&image, &method)
            .unwrap()
            .quantize(&image)
            .unwrap();
        let via_dispatch = quantize_image(&image, &method).unwrap();
        eprintln!("  {}: {} colors", name, direct.colormap().len());
        rp.compare_indexed_images(&direct, &via_dispatch);
    }

    // Parameter validation happens before any work
    let image = make_color_gradient(10, 10).unwrap();
    for bad in [0u32, 257] {
        for (_, method) in methods(bad) {
            assert!(quantize_image(&image, &method).is_err());
        }
    }

    assert!(rp.cleanup(), "colorquant regression test failed");
}
