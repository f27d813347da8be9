use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Initialize the Prometheus recorder. When `JOBWATCH_METRICS_ADDR` is set
/// (e.g. `127.0.0.1:9090`) the exporter also serves `/metrics` on that
/// address; otherwise the recorder runs without a listener and series are
/// still counted for tests and future scrapes.
pub fn init() -> Result<()> {
    let builder = PrometheusBuilder::new();
    match std::env::var("JOBWATCH_METRICS_ADDR") {
        Ok(addr) => {
            let addr: std::net::SocketAddr = addr
                .parse()
                .context("JOBWATCH_METRICS_ADDR is not a socket address")?;
            builder
                .with_http_listener(addr)
                .install()
                .context("prometheus: install recorder with listener")?;
        }
        Err(_) => {
            builder
                .install_recorder()
                .context("prometheus: install recorder")?;
        }
    }
    Ok(())
}
