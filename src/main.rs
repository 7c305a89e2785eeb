//! Binary entry point: load configuration, open the clinic's SQLite store,
//! hydrate the roster and run the interactive menu until the user exits.
use std::io;

use anyhow::Context;
use clinic_roster::{Clinic, Config, ConsoleView, Session};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Returning a `Result` bubbles up fatal startup problems (no home directory,
/// an unwritable database location) to the terminal instead of crashing
/// silently. Exiting from the menu and interrupting both end with success.
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("clinic_roster=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let config = Config::from_env()?;
    let clinic = Clinic::open(&config.clinic_name, &config.db_path)
        .with_context(|| format!("failed to open clinic database {}", config.db_path.display()))?;

    let mut session = Session::new(clinic, ConsoleView::stdout());
    let end = session.run()?;
    tracing::info!(?end, "session finished");
    Ok(())
}
