use anyhow::{Context, Result};
use dataset_image_viewer as source;
use dotenv::dotenv;
use source::{
    config::FlowConfig,
    data::huggingface::HuggingfaceLoader,
    flow::ImageFlow,
    render::{FileRenderer, ImageRenderer, TerminalRenderer},
};

fn main() -> Result<()> {
    let env_file = dotenv();
    env_logger::init();
    if let Err(err) = env_file {
        log::debug!("no .env loaded: {err}");
    }

    let config = FlowConfig::from_env().context("reading config")?;
    log::debug!("{config}");

    let renderer: Box<dyn ImageRenderer> = match &config.save_to {
        Some(path) => Box::new(FileRenderer::new(path.into())),
        None => Box::new(
            TerminalRenderer::stdout(config.style).with_wait_for_key(config.wait_for_key),
        ),
    };

    let mut flow = ImageFlow::new(HuggingfaceLoader::from_config(&config), renderer);
    let report = flow.run(&config, &mut std::io::stdout())?;
    log::info!(
        "showed record {} of `{}` ({}x{})",
        report.index,
        report.split,
        report.width,
        report.height
    );

    Ok(())
}
