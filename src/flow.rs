use std::{collections::BTreeMap, io::Write};

use burn::data::dataset::Dataset;
use image::{ColorType, DynamicImage, GenericImageView};
use itertools::Itertools;

use crate::{
    config::FlowConfig,
    data::{DatasetDict, DatasetLoader, Record},
    error::FlowError,
    render::{ImageRenderer, RenderOptions},
};

/// What a completed run saw.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowReport {
    pub num_rows: BTreeMap<String, usize>,
    pub split: String,
    pub index: usize,
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
}

/// Load → count → index → extract → render, stopping at the first failure.
pub struct ImageFlow<L, R> {
    loader: L,
    renderer: R,
}

impl<L: DatasetLoader, R: ImageRenderer> ImageFlow<L, R> {
    pub fn new(loader: L, renderer: R) -> Self {
        Self { loader, renderer }
    }

    pub fn into_renderer(self) -> R {
        self.renderer
    }

    pub fn load(&self, id: &str) -> Result<DatasetDict, FlowError> {
        log::info!("loading dataset `{id}`");
        self.loader.load(id)
    }

    pub fn run(&mut self, config: &FlowConfig, out: &mut impl Write) -> Result<FlowReport, FlowError> {
        let dataset = self.load(&config.dataset)?;

        let num_rows = count(&dataset, out)?;

        log::info!("fetching record {} of `{}`", config.index, config.split);
        let record = dataset.record(&config.split, config.index)?;

        let image = extract(&record, &config.field)?;
        let (width, height) = image.dimensions();
        log::debug!("decoded {width}x{height} {:?} image", image.color());

        let options = RenderOptions {
            show_axes: config.show_axes,
        };
        self.renderer.render(&image, &options)?;

        Ok(FlowReport {
            num_rows,
            split: config.split.clone(),
            index: config.index,
            width,
            height,
            color: image.color(),
        })
    }
}

/// Writes one `split: count` line per split.
pub fn count(dataset: &DatasetDict, out: &mut impl Write) -> Result<BTreeMap<String, usize>, FlowError> {
    let num_rows = dataset.num_rows();
    writeln!(
        out,
        "{}",
        num_rows
            .iter()
            .map(|(split, len)| format!("{split}: {len}"))
            .join("\n")
    )?;
    Ok(num_rows)
}

pub fn extract(record: &Record, field: &str) -> Result<DynamicImage, FlowError> {
    record.image(field)
}

/// Decoded images of the first `limit` records of `split`. Records that
/// cannot be read or decoded are logged and skipped.
pub fn readable_images<'a>(
    split: &'a dyn Dataset<Record>,
    field: &'a str,
    limit: usize,
) -> impl Iterator<Item = DynamicImage> + 'a {
    (0..split.len().min(limit))
        .filter_map(move |index| {
            let record = split.get(index);
            if record.is_none() {
                log::warn!("skipping unreadable record {index}");
            }
            record
        })
        .filter_map(move |record| match extract(&record, field) {
            Ok(image) => Some(image),
            Err(err) => {
                log::warn!("skipping record: {err}");
                None
            }
        })
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use image::{ImageOutputFormat, RgbImage};

    use super::*;
    use crate::data::FieldValue;

    /// Every second row is lost, as with a corrupt sqlite row.
    struct Holey(Vec<Record>);

    impl Dataset<Record> for Holey {
        fn get(&self, index: usize) -> Option<Record> {
            (index % 2 == 0).then(|| self.0.get(index).cloned()).flatten()
        }

        fn len(&self) -> usize {
            self.0.len()
        }
    }

    fn png(width: u32) -> FieldValue {
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(width, 1))
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        FieldValue::Bytes(bytes)
    }

    #[test]
    fn readable_images_skip_lost_and_undecodable_rows() {
        let split = Holey(vec![
            Record::new().with("image", png(1)),
            Record::new().with("image", png(2)),
            Record::new().with("image", FieldValue::Bytes(b"junk".to_vec())),
            Record::new().with("image", png(4)),
            Record::new().with("image", png(5)),
        ]);

        let widths = readable_images(&split, "image", usize::MAX)
            .map(|image| image.width())
            .collect::<Vec<_>>();
        assert_eq!(widths, [1, 5]);

        let widths = readable_images(&split, "image", 3)
            .map(|image| image.width())
            .collect::<Vec<_>>();
        assert_eq!(widths, [1]);
    }
}
