use std::borrow::Borrow;

use image::{DynamicImage, GenericImageView};

/// An unset or empty variable is `None`.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

pub fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_owned())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stats {
    /// `[H, W, C]` when every image shares it.
    pub dim: Option<[usize; 3]>,
    pub count: usize,
    pub value_range: [f32; 2],
    pub mean: f32,
    pub var: f32,
    pub stddev: f32,
}

impl Stats {
    /// Channel statistics over RGB values scaled to `[0, 1]`, each image
    /// weighted equally regardless of its size.
    pub fn from_iter<I: Borrow<DynamicImage>>(iter: impl Iterator<Item = I>) -> Self {
        let mut s = 0.0;
        let mut s2 = 0.0;
        let mut count = 0;
        let mut value_range = [f32::INFINITY, f32::NEG_INFINITY];
        let mut dim = None;
        let mut uniform = true;

        for image in iter {
            let image = image.borrow();
            let (w, h) = image.dimensions();
            let image_dim = [h as usize, w as usize, 3];
            match dim {
                None if count == 0 => dim = Some(image_dim),
                Some(d) if d != image_dim => uniform = false,
                _ => {}
            }

            let rgb = image.to_rgb8();
            let values = rgb.as_raw().iter().map(|x| *x as f32 / 255.0);
            let d = rgb.as_raw().len().max(1) as f32;

            let (mut sum, mut sum2) = (0.0, 0.0);
            for x in values {
                value_range[0] = value_range[0].min(x);
                value_range[1] = value_range[1].max(x);
                sum += x;
                sum2 += x * x;
            }
            s += sum / d;
            s2 += sum2 / d;
            count += 1;
        }

        if count == 0 {
            value_range = [0.0, 0.0];
        }
        let count_f32 = count.max(1) as f32;
        let mean = s / count_f32;
        let var = ((s2 / count_f32) - mean * mean).max(0.0);
        let stddev = var.sqrt();
        Self {
            dim: dim.filter(|_| uniform),
            count,
            value_range,
            mean,
            var,
            stddev,
        }
    }
}
