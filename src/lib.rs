//! Kande-Pohe POS — order-lifecycle core.
//!
//! Tracks checks from creation through kitchen dispatch, in-session
//! editing, and payment/closure for a single-terminal restaurant POS.
//! The presentation layer drives the command surface on [`PosCore`] /
//! [`PosService`]; rendering, routing, and input widgets live outside
//! this crate, as does the order service reached over HTTP.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod api;
pub mod cart;
pub mod config;
pub mod core;
pub mod diff;
pub mod error;
pub mod ledger;
pub mod message;
pub mod money;
pub mod print;
pub mod service;
pub mod session;
pub mod types;

pub use crate::core::{DispatchAction, PosCore, SendOutcome};
pub use crate::error::PosError;
pub use crate::service::PosService;
pub use crate::types::{Check, CheckStatus, LineItem, MenuItem, PaymentMethod};

/// Initialize structured logging: console layer always, plus a daily
/// rolling file layer when a log directory is given. Call once at
/// process start.
pub fn init_tracing(log_dir: Option<&std::path::Path>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kande_pos=debug"));

    let console_layer = fmt::layer().with_target(true);
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).ok();
            let file_appender = tracing_appender::rolling::daily(dir, "pos");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let file_layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true);
            registry.with(file_layer).init();
            // Keep the guard alive for the process lifetime — dropping it
            // would flush and stop the writer thread.
            std::mem::forget(guard);
        }
        None => registry.init(),
    }
}
