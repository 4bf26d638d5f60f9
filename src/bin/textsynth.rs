use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::Parser;
use rayon::prelude::*;

use textsynth::assets::catalog::SynthContext;
use textsynth::{GenConfig, Pipeline, Sampler};

#[derive(Parser, Debug)]
#[command(name = "textsynth", version)]
struct Cli {
    /// Data directory: fonts/, bg.txt, words.txt, colors.txt.
    #[arg(long)]
    data_dir: PathBuf,

    /// Output directory root (one subdirectory per style).
    #[arg(long)]
    out: PathBuf,

    /// Number of style batches to render.
    #[arg(long, default_value_t = 64)]
    styles: u64,

    /// Base seed; each job derives an independent stream from it.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Override rayon worker threads.
    #[arg(long)]
    threads: Option<usize>,

    /// JSON file overriding distribution parameters.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("configure worker pool")?;
    }

    let cfg = match &cli.config {
        Some(path) => GenConfig::from_path(path)?,
        None => GenConfig::default(),
    };

    let ctx = Arc::new(SynthContext::load(&cli.data_dir)?);
    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("create output dir '{}'", cli.out.display()))?;
    let pipeline = Pipeline::new(ctx, cfg, &cli.out);

    tracing::info!(styles = cli.styles, seed = cli.seed, "starting generation");

    // Workers share only the read-only context; a fatal job error is logged
    // with its identity and the batch continues.
    let completed: u64 = (0..cli.styles)
        .into_par_iter()
        .map(|job| {
            let mut sampler = Sampler::from_seed(job_seed(cli.seed, job));
            match pipeline.run_style_job(job, &mut sampler) {
                Ok(summary) => {
                    tracing::debug!(
                        job,
                        style = %summary.style_name,
                        rendered = summary.rendered,
                        "style complete"
                    );
                    1
                }
                Err(err) => {
                    tracing::error!(job, %err, "abandoning style job");
                    0
                }
            }
        })
        .sum();

    tracing::info!(
        completed,
        failed = cli.styles - completed,
        "generation finished"
    );
    Ok(())
}

/// Decorrelates per-job seed streams from the sequential job index.
fn job_seed(base: u64, job: u64) -> u64 {
    let mut z = base ^ job.wrapping_mul(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}
