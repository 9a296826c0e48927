use std::path::Path;

use anyhow::{Context, Result};
use dataset_image_viewer as source;
use dotenv::dotenv;
use itertools::Itertools;
use source::{
    config::FlowConfig,
    data::{huggingface::HuggingfaceLoader, DatasetLoader, FieldValue},
    flow::{count, extract, readable_images},
    render::{FileRenderer, ImageRenderer, RenderOptions},
    utils::{env_opt, env_or, Stats},
};

fn main() -> Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = FlowConfig::from_env()?;

    // load the data
    let dataset = HuggingfaceLoader::from_config(&config).load(&config.dataset)?;
    count(&dataset, &mut std::io::stdout())?;

    // sample an image
    let record = dataset.record(&config.split, config.index)?;
    let fields = record
        .field_names()
        .map(|name| match record.get(name) {
            Some(FieldValue::Bytes(bytes)) => format!("{name} ({} bytes)", bytes.len()),
            Some(value) => format!("{name} = {value:?}"),
            None => name.to_owned(),
        })
        .join(", ");
    println!("record {}: {fields}", config.index);

    let out_dir = env_or("OUT_DIR", "./out");
    let path = Path::new(&out_dir).join("example-image.png");
    FileRenderer::new(path.clone()).render(
        &extract(&record, &config.field)?,
        &RenderOptions::default(),
    )?;
    println!("saved {}", path.display());

    // calculate stats
    let split = dataset.split(&config.split)?;
    let limit = match env_opt("INSPECT_LIMIT") {
        Some(limit) => limit.parse().context("parsing INSPECT_LIMIT")?,
        None => split.len(),
    };
    let images = readable_images(split, &config.field, limit);
    let stats = Stats::from_iter(images);
    println!("{:#?}", stats);

    Ok(())
}
