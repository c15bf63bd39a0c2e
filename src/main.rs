use anyhow::Context;
use log::info;

use bakelight::{ViewerApp, ViewerConfig};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::from_env();
    info!(
        "Starting {:?} scene from {}",
        config.variant,
        config.asset_root.display()
    );

    let app = ViewerApp::new(config).context("failed to create the event loop")?;
    app.run().context("viewer stopped with an error")?;
    Ok(())
}
