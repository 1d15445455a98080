//! Zero-mean normalized cross correlation (correlation coefficient)
//!
//! Window means and variances come from summed-area tables, so only the
//! template-sized dot product is computed per position. Rows of the score
//! surface are filled in parallel.

use image::{GrayImage, ImageBuffer, Luma};
use rayon::prelude::*;

/// Score surface, one value per template position
pub type ScoreSurface = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Denominators below this are treated as a flat window or flat template
const FLAT_EPSILON: f64 = 1e-6;

/// Summed-area tables of pixel values and squared pixel values
struct IntegralImages {
    sum: Vec<u64>,
    squared: Vec<u64>,
    stride: usize,
}

impl IntegralImages {
    fn new(image: &GrayImage) -> Self {
        let (width, height) = image.dimensions();
        let stride = width as usize + 1;
        let mut sum = vec![0u64; stride * (height as usize + 1)];
        let mut squared = vec![0u64; stride * (height as usize + 1)];

        for (x, y, pixel) in image.enumerate_pixels() {
            let value = pixel[0] as u64;
            let i = (y as usize + 1) * stride + x as usize + 1;
            sum[i] = value + sum[i - stride] + sum[i - 1] - sum[i - stride - 1];
            squared[i] =
                value * value + squared[i - stride] + squared[i - 1] - squared[i - stride - 1];
        }

        Self {
            sum,
            squared,
            stride,
        }
    }

    fn window(&self, table: &[u64], x: usize, y: usize, width: usize, height: usize) -> u64 {
        let (x2, y2) = (x + width, y + height);
        table[y2 * self.stride + x2] + table[y * self.stride + x]
            - table[y * self.stride + x2]
            - table[y2 * self.stride + x]
    }
}

/// Correlation coefficient of `template` at every position of `scene`
///
/// Scores lie in `[-1, 1]`. A position whose window is flat, or a flat
/// template, scores 0. Callers must check the template fits in the scene.
pub fn match_template_ccoeff_normed(scene: &GrayImage, template: &GrayImage) -> ScoreSurface {
    let (scene_width, scene_height) = scene.dimensions();
    let (template_width, template_height) = template.dimensions();
    let out_width = scene_width - template_width + 1;
    let out_height = scene_height - template_height + 1;

    let n = (template_width * template_height) as f64;
    let template_mean = template.pixels().map(|p| p[0] as f64).sum::<f64>() / n;
    let zero_mean: Vec<f64> = template
        .pixels()
        .map(|p| p[0] as f64 - template_mean)
        .collect();
    let template_deviation: f64 = zero_mean.iter().map(|v| v * v).sum();

    let integrals = IntegralImages::new(scene);
    let (tw, th) = (template_width as usize, template_height as usize);
    let scene_stride = scene_width as usize;
    let pixels = scene.as_raw();

    let mut surface = ScoreSurface::new(out_width, out_height);
    surface
        .par_chunks_mut(out_width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.iter_mut().enumerate() {
                let window_sum = integrals.window(&integrals.sum, x, y, tw, th) as f64;
                let window_squared = integrals.window(&integrals.squared, x, y, tw, th) as f64;
                let window_deviation = (window_squared - window_sum * window_sum / n).max(0.0);

                let denominator = (template_deviation * window_deviation).sqrt();
                if denominator < FLAT_EPSILON {
                    *out = 0.0;
                    continue;
                }

                // the template is zero-mean, so the window mean drops out
                let mut numerator = 0.0f64;
                for (j, template_row) in zero_mean.chunks_exact(tw).enumerate() {
                    let start = (y + j) * scene_stride + x;
                    for (&s, &t) in pixels[start..start + tw].iter().zip(template_row) {
                        numerator += s as f64 * t;
                    }
                }

                *out = (numerator / denominator).clamp(-1.0, 1.0) as f32;
            }
        });
    surface
}
