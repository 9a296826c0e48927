use std::str::FromStr;

use anyhow::anyhow;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

pub mod file;
pub mod terminal;

pub use self::{file::FileRenderer, terminal::TerminalRenderer};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub show_axes: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// 24-bit color half blocks, two pixel rows per line.
    #[default]
    Color,
    /// Brightness ramp for terminals without truecolor.
    Ascii,
}

impl FromStr for RenderStyle {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "color" | "colour" => Ok(Self::Color),
            "ascii" => Ok(Self::Ascii),
            other => Err(anyhow!("unknown render style `{other}`")),
        }
    }
}

/// Turns a decoded image into something a person can look at.
///
/// Implementations may block until the viewer is dismissed.
pub trait ImageRenderer {
    fn render(&mut self, image: &DynamicImage, options: &RenderOptions) -> Result<(), FlowError>;
}

impl<R: ImageRenderer + ?Sized> ImageRenderer for Box<R> {
    fn render(&mut self, image: &DynamicImage, options: &RenderOptions) -> Result<(), FlowError> {
        (**self).render(image, options)
    }
}
