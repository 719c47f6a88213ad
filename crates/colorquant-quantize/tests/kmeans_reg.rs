//! K-means quantization regression test
//!
//! Checks reproducibility for a fixed seed, monotone convergence of the
//! assignment distance and both seeding strategies.

use colorquant_quantize::{
    ColorQuantizer, InitialClusterMethod, KMeansOptions, KMeansQuantizer, kmeans_quant,
};
use colorquant_test::{RegParams, make_color_gradient, make_few_colors, make_random_colors};

#[test]
fn kmeans_reg() {
    let mut rp = RegParams::new("kmeans");

    let image = make_random_colors(48, 48, 11).unwrap();
    for init in [InitialClusterMethod::Random, InitialClusterMethod::MostFrequent] {
        for &k in &[4u32, 16, 32] {
            let opts = KMeansOptions {
                max_colors: k,
                max_iterations: 100,
                init,
                ..Default::default()
            };
            let q = KMeansQuantizer::from_image(&image, &opts).unwrap();
            rp.check(q.color_count() <= k as usize, "palette exceeds max_colors");
            rp.check(q.iterations() >= 1, "no iteration performed");
            rp.check(q.iterations() <= 100, "iteration cap ignored");

            let history = q.distance_history();
            let monotone = history.windows(2).all(|w| w[1] <= w[0] * (1.0 + 1e-9));
            rp.check(monotone, "assignment distance increased");
            rp.compare_values(history[history.len() - 1], q.total_error(), 0.0);

            // Same seed, same result
            let again = KMeansQuantizer::from_image(&image, &opts).unwrap();
            rp.check(q.color_map() == again.color_map(), "not reproducible");
        }
    }

    // More clusters reduce the error
    let image = make_color_gradient(40, 40).unwrap();
    let err = |k: u32| {
        KMeansQuantizer::from_image(
            &image,
            &KMeansOptions {
                max_colors: k,
                init: InitialClusterMethod::MostFrequent,
                ..Default::default()
            },
        )
        .unwrap()
        .total_error()
    };
    rp.check(err(32) < err(2), "error did not shrink with more clusters");

    // Exactly as many clusters as colors: the image is reproduced
    let image = make_few_colors(12, 12).unwrap();
    let indexed = kmeans_quant(
        &image,
        &KMeansOptions {
            max_colors: 4,
            ..Default::default()
        },
    )
    .unwrap();
    rp.compare_values(4.0, indexed.colormap().len() as f64, 0.0);
    rp.compare_rgb_images(&image, &indexed.to_rgb());

    assert!(rp.cleanup(), "kmeans regression test failed");
}
