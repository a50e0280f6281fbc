use anyhow::Result;
use clap::Parser;

use repograph::cli::{Cli, Commands};
use repograph::config::RepographConfig;
use repograph::output::print_summary;
use repograph::parser::pool::WorkerPool;
use repograph::pipeline::{self, PipelineOptions};
use repograph::walker::collect_files;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Index {
            path,
            db,
            workers,
            verbose,
            json,
        } => {
            let config = RepographConfig::load(&path);
            let files = collect_files(&path, &config, verbose)?;

            let options = PipelineOptions {
                workers: workers
                    .or(config.workers)
                    .unwrap_or_else(WorkerPool::default_workers),
                sub_batch_size: config.sub_batch_size.unwrap_or(100),
                verbose,
            };
            let db_dir = db.unwrap_or_else(|| path.join(".repograph"));

            let (_graph, summary) = pipeline::run(&path, files, &db_dir, &options)?;
            print_summary(&summary, json);
        }
    }

    Ok(())
}
