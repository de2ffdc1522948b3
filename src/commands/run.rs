//! Pipeline run and relay commands.

use super::open_provider;
use leadflow::config::LeadflowConfig;
use leadflow::pipeline::{Pipeline, RunOutcome};
use leadflow::server::RelayServer;
use std::path::PathBuf;

/// Run command.
pub fn cmd_run(
    mut config: LeadflowConfig,
    out: Option<PathBuf>,
    sample: Option<usize>,
    top_n: Option<usize>,
) -> anyhow::Result<()> {
    if let Some(out) = out {
        config = config.with_run_log_path(out);
    }
    if let Some(sample) = sample {
        config = config.with_sample_size(sample);
    }
    if let Some(top_n) = top_n {
        config = config.with_top_n(top_n);
    }

    let provider = open_provider(&config)?;
    println!("Using data dir: {}", config.data_dir.display());
    println!("Available tables: {}", provider.list_tables().join(", "));

    let pipeline = Pipeline::new(provider, config);
    match pipeline.run()? {
        RunOutcome::NoLeads => println!("No leads table or it's empty."),
        RunOutcome::Completed(log) => {
            let leads = log.actions.iter().filter(|a| a.lead.is_some()).count() / 3;
            println!("Processed {leads} lead(s) in run {}", log.run_id);
            println!(
                "Demo complete. Log saved to {}",
                pipeline.config().run_log_path.display()
            );
        },
    }
    Ok(())
}

/// Serve command.
pub fn cmd_serve(config: LeadflowConfig) -> anyhow::Result<()> {
    let pipeline = Pipeline::new(open_provider(&config)?, config);
    pipeline.load_semantic()?;
    RelayServer::new(pipeline).run_stdio()?;
    Ok(())
}
