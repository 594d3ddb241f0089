use constellation::{Constellation, RunError};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), RunError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("constellation=info,wgpu_core=warn")),
        )
        .init();

    Constellation::new().run()
}
