//! colorquant-test - Regression test framework for colorquant
//!
//! This crate provides the regression test harness shared by the
//! integration tests of the workspace, supporting two modes:
//!
//! - **Compare**: Record every mismatch as a failure
//! - **Display**: Also print each compared value for inspection
//!
//! It also generates the deterministic synthetic images the tests run on.
//!
//! # Usage
//!
//! ```ignore
//! use colorquant_test::{RegParams, make_few_colors};
//!
//! let mut rp = RegParams::new("mediancut");
//! let image = make_few_colors(32, 32)?;
//! rp.compare_values(4.0, palette_len as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

use colorquant_core::RgbImage;
use colorquant_core::color::compose_rgb;
use rand::SeedableRng;
use rand::distr::{Distribution, Uniform};
use rand::rngs::StdRng;

/// Colors of the four quadrants of [`make_few_colors`]
pub const FEW_COLORS: [u32; 4] = [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0x00ff_ff00];

/// Smooth gradient: red grows left to right, green top to bottom, blue
/// along the diagonal.
pub fn make_color_gradient(width: u32, height: u32) -> TestResult<RgbImage> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let r = (x * 255 / width.max(1)) as u8;
            let g = (y * 255 / height.max(1)) as u8;
            let b = ((x + y) * 255 / (width + height).max(1)) as u8;
            pixels.push(compose_rgb(r, g, b));
        }
    }
    Ok(RgbImage::from_pixels(width, height, pixels)?)
}

/// Image split into quadrants of red, green, blue and yellow
pub fn make_few_colors(width: u32, height: u32) -> TestResult<RgbImage> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let q = (x >= width / 2) as usize + 2 * (y >= height / 2) as usize;
            pixels.push(FEW_COLORS[q]);
        }
    }
    Ok(RgbImage::from_pixels(width, height, pixels)?)
}

/// Image of a single color
pub fn make_solid(width: u32, height: u32, rgb: u32) -> TestResult<RgbImage> {
    let mut image = RgbImage::new(width, height)?;
    for y in 0..height {
        for x in 0..width {
            image.set_pixel(x, y, rgb)?;
        }
    }
    Ok(image)
}

/// Uniformly random colors, reproducible for a given seed
pub fn make_random_colors(width: u32, height: u32, seed: u64) -> TestResult<RgbImage> {
    let dist = Uniform::new_inclusive(0u32, 0x00ff_ffff)
        .map_err(|e| TestError::Generator(e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let n = width as usize * height as usize;
    let pixels = (0..n).map(|_| dist.sample(&mut rng)).collect();
    Ok(RgbImage::from_pixels(width, height, pixels)?)
}
