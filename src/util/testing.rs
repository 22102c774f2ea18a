use std::env;
use std::sync::Once;
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::domain::Department;

static TEST_SETUP: Once = Once::new();

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        if env::var("RUST_LOG").is_err() {
            env::set_var("RUST_LOG", "debug");
        }
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Sample organization used across tests:
///
/// ```text
/// HQ(1)
/// ├── Sales(2)
/// │   ├── Export(4)
/// │   └── Domestic(5)
/// └── Engineering(3)
///     └── Platform(6)
/// ```
///
/// Records are deliberately listed out of hierarchy order.
pub fn sample_departments() -> Vec<Department> {
    vec![
        Department::new(4, "Export", 2)
            .with_outer_department(true)
            .with_ext(r#"{"region":"emea"}"#),
        Department::new(3, "Engineering", 1).with_manager_user_ids("eng-lead|cto"),
        Department::new(1, "HQ", 0).with_manager_user_ids("ceo"),
        Department::new(6, "Platform", 3),
        Department::new(2, "Sales", 1).with_source_identifier("crm"),
        Department::new(5, "Domestic", 2),
    ]
}
