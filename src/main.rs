//! VoiceNotes CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voicenotes::cli::{
    run_config, run_delete, run_list, run_record, run_repolish, run_retry, run_show, Cli,
    Commands, RecordOptions, RepolishOptions,
};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Record {
            file,
            language,
            prompt,
            no_polish,
        } => {
            run_record(RecordOptions {
                db: cli.db,
                file,
                language,
                prompt,
                no_polish,
            })
            .await
        }
        Commands::List => run_list(cli.db).await,
        Commands::Show { id } => run_show(cli.db, id).await,
        Commands::Delete { id } => run_delete(cli.db, id).await,
        Commands::Repolish {
            id,
            language,
            prompt,
            regenerate_title,
        } => {
            run_repolish(RepolishOptions {
                db: cli.db,
                id,
                language,
                prompt,
                regenerate_title,
            })
            .await
        }
        Commands::Retry { id } => run_retry(cli.db, id).await,
        Commands::Config { action } => run_config(action).await,
    }
}
