//! # Canvas Editor CLI
//!
//! Replays an editor script and exports the canvas.

use clap::Parser;
use editor_cli::{load_script, CliArgs, CliConfig, ScriptRunner};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing.
///
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,editor_cli=debug,editor_core=info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_thread_ids(false);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let config = CliConfig::load(args)?;
    tracing::info!(
        "Canvas {}x{}, writing to {}",
        config.editor.canvas_width,
        config.editor.canvas_height,
        config.out_dir.display()
    );

    let steps = load_script(&config.script)?;
    tracing::info!("Loaded {} steps from {}", steps.len(), config.script.display());

    let mut runner = ScriptRunner::new(&config);
    let report = runner.run(steps).await;

    tracing::info!(
        steps = report.steps,
        uploads = report.uploads.len(),
        exports = report.exports.len(),
        "Script finished"
    );
    for path in &report.written {
        println!("{}", path.display());
    }
    Ok(())
}
