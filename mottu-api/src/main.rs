use anyhow::Context;
use mottu_api::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config)?;

    let state = AppState::builder(config.clone())
        .build()
        .await
        .context("building application state")?;

    Server::new(config)
        .serve(build_router(state))
        .await
        .context("serving HTTP")?;

    Ok(())
}
