use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global tracing subscriber.
///
/// Filter directives come from `CFR_TALLY_LOG`
/// (e.g. `CFR_TALLY_LOG=cfr_tally::cache=debug`), falling back to
/// `cfr_tally=info`. Safe to call more than once; only the first call does
/// anything, and an already-installed subscriber is left alone.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("CFR_TALLY_LOG")
            .unwrap_or_else(|_| EnvFilter::new("cfr_tally=info"));

        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_thread_ids(true))
            .with(filter)
            .try_init();
    });
}
