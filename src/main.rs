use anyhow::Context;
use clap::Parser;

use cubelight::{logging, Config, Engine};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(config.verbose);

    tracing::info!(
        "starting {}x{} at {} fps, assets in {}",
        config.width,
        config.height,
        config.max_fps,
        config.assets.display()
    );

    Engine::run(config).context("cubelight stopped with an error")?;
    Ok(())
}
