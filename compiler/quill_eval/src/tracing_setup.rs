use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Does nothing unless `QUILL_LOG` is set; its value is an `EnvFilter`
/// directive such as `quill_eval=trace`. With `QUILL_LOG_TREE=1` spans are
/// printed as an indented tree, which follows template expansion more
/// easily than flat lines. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        let Ok(directives) = std::env::var("QUILL_LOG") else {
            return;
        };
        let filter = EnvFilter::new(directives);
        let tree = std::env::var("QUILL_LOG_TREE").is_ok_and(|v| v == "1");

        // A subscriber installed by the host wins; ours is then dropped.
        let _ = if tree {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_target(true).with_level(true))
                .try_init()
        };
    });
}
