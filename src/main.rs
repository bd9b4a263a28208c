//! clfbench entry point

use clap::Parser;
use clfbench::cli::{cmd_info, cmd_train, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clfbench=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train {
            data,
            models,
            label_col,
            feature_col,
            test_size,
            seed,
            save_model,
            report_dir,
            model_dir,
        } => {
            cmd_train(
                &data,
                &models,
                &label_col,
                feature_col.as_deref(),
                test_size,
                seed,
                save_model.as_deref(),
                &report_dir,
                &model_dir,
            )?;
        }
        Commands::Info {
            data,
            label_col,
            feature_col,
        } => {
            cmd_info(&data, &label_col, feature_col.as_deref())?;
        }
    }

    Ok(())
}
