use anyhow::Context;
use strata_overlay::{
    ContainerReader, ExtractOptions, ExtractReport, Extractor, RawDecoder, ZipReader, dump,
    mount_dir, write_dump,
};
use tracing::{info, warn};

use crate::config::Config;

/// Per-query reports of one run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<ExtractReport>,
}

impl RunSummary {
    /// At least one entry was written across all queries.
    pub fn is_success(&self) -> bool {
        self.reports.iter().any(ExtractReport::is_success)
    }
}

fn readers() -> Vec<Box<dyn ContainerReader>> {
    vec![Box::new(ZipReader)]
}

pub fn run(config: &Config) -> anyhow::Result<RunSummary> {
    let builder = mount_dir(&config.game_dir, &readers(), &config.mount)
        .with_context(|| format!("mounting {}", config.game_dir.display()))?;
    let (overlay, mut sources) = builder.finish();
    info!(
        "Successfully mounted {} files from {} archives",
        overlay.entry_count(),
        overlay.archives().len()
    );

    if config.dump_paths {
        write_dump(&dump(&overlay), &config.output).context("writing path dump")?;
    }

    let options = ExtractOptions::new(&config.output).output_mode(config.output_mode);
    let mut extractor = Extractor::new(&overlay, &mut sources, RawDecoder, options);

    let mut summary = RunSummary::default();
    for query in &config.queries {
        match extractor.extract(query) {
            Ok(report) => summary.reports.push(report),
            Err(e) => warn!(query = query.as_str(), error = %e, "skipping query"),
        }
    }

    if !config.queries.is_empty() {
        let extracted: usize = summary.reports.iter().map(|r| r.extracted.len()).sum();
        let skipped: usize = summary.reports.iter().map(|r| r.skipped.len()).sum();
        info!(queries = config.queries.len(), extracted, skipped, "done");
        if !summary.is_success() {
            warn!("no files were extracted");
        }
    }

    Ok(summary)
}
