use std::error::Error;
use std::net::SocketAddr;

use heartrisk::artifacts::{Artifacts, FsArtifactRepo};
use heartrisk::common::config::AppCfg;
use heartrisk::common::log as logging;
use heartrisk::{router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cfg = AppCfg::load();
    logging::init(&cfg.log_level);

    let artifacts = Artifacts::load(&FsArtifactRepo::default());
    if !artifacts.is_ready() {
        log::warn!("starting without a complete artifact set, predictions will return 503");
    }

    let addr: SocketAddr = cfg.bind_addr.parse()?;
    let app = router(AppState::new(artifacts));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("{} v{} listening on http://{addr}", cfg.project_name, cfg.version);
    axum::serve(listener, app).await?;
    Ok(())
}
