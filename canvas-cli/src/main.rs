//! # Canvas Composer CLI
//!
//! Runs editing operations in order and writes exports to `--out-dir`.

use anyhow::Context;
use canvas_app::{Editor, EditorConfig, ExportArtifact, TracingSink};
use canvas_cli::{run_op, CliArgs};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize structured tracing with optional JSON format.
///
/// Set `RUST_LOG` to control log levels (default: info,canvas_app=debug,canvas_renderer=debug).
/// Set `RUST_LOG_FORMAT=json` for JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,canvas_app=debug,canvas_renderer=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr);

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

// The editor is single-threaded, so everything runs on one thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = CliArgs::parse();
    let ops = args.ops.clone();
    let out_dir = args.out_dir.clone();
    let dump_scene = args.dump_scene;
    let config = EditorConfig::from(args);

    tracing::info!(
        "Starting canvas-cli: {}x{}, {} ops",
        config.width,
        config.height,
        ops.len()
    );

    let editor = Editor::new(config, TracingSink).context("Failed to start editing session")?;

    let mut failed = 0usize;
    for op in &ops {
        match run_op(&editor, op).await {
            Ok(Some(artifact)) => write_artifact(&out_dir, &artifact).await?,
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("{op:?} failed: {e}");
                failed += 1;
            }
        }
    }

    if dump_scene {
        println!("{}", editor.scene_json()?);
    }

    editor.dispose();

    if failed > 0 {
        anyhow::bail!("{failed} of {} operations failed", ops.len());
    }
    tracing::info!("canvas-cli finished");
    Ok(())
}

async fn write_artifact(out_dir: &std::path::Path, artifact: &ExportArtifact) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(out_dir)
        .await
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;
    let path = out_dir.join(&artifact.file_name);
    tokio::fs::write(&path, &artifact.bytes)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!("Wrote {} ({} bytes)", path.display(), artifact.len());
    Ok(())
}
