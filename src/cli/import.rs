use std::io::{self, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

use crate::cli::GlobalOptions;
use crate::config::Config;
use crate::emitter::DemoMetricEmitter;
use crate::import::{ImportOutcome, ImportSession};
use crate::inventory::HttpInventoryStore;
use crate::manifest::Manifest;
use crate::metrics::HttpMetricsSink;

/// Reconciles a topology manifest against the remote inventory workspace.
#[derive(Debug, Parser)]
pub struct ImportCommand {
    /// Path to the topology manifest to import.
    #[clap(default_value = "swarm.json")]
    pub manifest: PathBuf,

    /// Keep running after the import, periodically emitting a demo gauge
    /// metric for the imported service.
    #[clap(long)]
    pub demo_metrics: bool,

    /// Seconds between demo gauge points.
    #[clap(long, default_value = "10")]
    pub demo_interval: u64,
}

impl ImportCommand {
    pub fn run(self, global: GlobalOptions) -> Result<()> {
        let config = Config::from_env()?;

        let manifest = Manifest::load(&self.manifest)
            .with_context(|| format!("could not load manifest {}", self.manifest.display()))?;

        let store = HttpInventoryStore::new(&config.api_base_path, &config.token);
        let metrics = HttpMetricsSink::new(&config.metrics_base_path, &config.token);

        let outcome = ImportSession::new(&store, &manifest).run(&metrics, &config.workspace)?;

        let _ = show_summary(&outcome, global.color.into());

        if self.demo_metrics {
            let _emitter = DemoMetricEmitter::start(
                metrics,
                config.workspace.clone(),
                outcome.service.id.clone(),
                Duration::from_secs(self.demo_interval),
            );

            // The emitter runs until the process is terminated.
            loop {
                thread::park();
            }
        }

        Ok(())
    }
}

fn show_summary(outcome: &ImportOutcome, color: ColorChoice) -> io::Result<()> {
    let writer = BufferWriter::stdout(color);
    let mut buffer = writer.buffer();

    writeln!(&mut buffer, "Import finished:")?;

    write!(&mut buffer, "  Service:   ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(&mut buffer, "{}", outcome.service.name)?;

    buffer.set_color(&ColorSpec::new())?;
    write!(&mut buffer, "  Resources: ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(&mut buffer, "{}", outcome.resource_count)?;

    buffer.set_color(&ColorSpec::new())?;
    write!(&mut buffer, "  Duration:  ")?;
    buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))?;
    writeln!(&mut buffer, "{} ms", outcome.duration.as_millis())?;

    buffer.set_color(&ColorSpec::new())?;
    writer.print(&buffer)?;

    Ok(())
}
