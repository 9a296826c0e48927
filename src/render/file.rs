use std::path::PathBuf;

use derive_new::new;
use image::{DynamicImage, ImageFormat};

use super::{ImageRenderer, RenderOptions};
use crate::error::FlowError;

/// Saves the image as a PNG instead of showing it.
#[derive(Debug, Clone, new)]
pub struct FileRenderer {
    path: PathBuf,
}

impl ImageRenderer for FileRenderer {
    fn render(&mut self, image: &DynamicImage, options: &RenderOptions) -> Result<(), FlowError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|err| {
                FlowError::display_caused(format!("creating {}", parent.display()), err)
            })?;
        }
        if options.show_axes {
            log::warn!("axes are not drawn into image files");
        }

        image
            .save_with_format(&self.path, ImageFormat::Png)
            .map_err(|err| {
                FlowError::display_caused(format!("saving {}", self.path.display()), err)
            })?;
        log::info!("saved image to {}", self.path.display());
        Ok(())
    }
}
