mod engine_tests;

use eqsolve::Engine;
use lazy_static::lazy_static;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[ctor::ctor]
fn init_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

lazy_static! {
    /// Shared engine with the default configuration; the engine is `Sync`.
    pub static ref ENGINE: Engine = Engine::default();
}
