use std::path::PathBuf;

use dotenvy::dotenv;
use secret_reconstruction::{
    Config,
    batch::reconstruct_files,
    sss::{Mode, Secret},
};
use tracing::{error, info, level_filters::LevelFilter, warn};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

// Reconstructs the secret of every share file given as argument, or of `SHARES_FILE`
// when none is given.
// ```
// cargo run -- shares_1.json shares_2.json
// ```
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    if let Err(err) = dotenv()
        && !err.not_found()
    {
        return Err(anyhow::anyhow!("Error while loading .env file: {err}"));
    }

    let config = match Config::parse_environment() {
        Ok(c) => c,
        Err(e) => {
            return Err(anyhow::anyhow!(
                "Failed to parse environment variables for configuration: {e}"
            ));
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(Into::<LevelFilter>::into(config.log_level)),
        )
        .init();

    let mut paths = std::env::args().skip(1).map(PathBuf::from).collect::<Vec<_>>();
    if paths.is_empty() {
        paths.push(config.shares_file.clone());
    }
    let total = paths.len();

    match config.mode {
        Mode::Modular => info!(
            "Reconstructing {total} secret(s) modulo {}",
            config.field.modulus()
        ),
        Mode::Float => info!(
            "Reconstructing {total} secret(s) in floating point, rounding: {:?}",
            config.rounding
        ),
    }

    let outcomes = reconstruct_files(paths, config.settings(), config.batch_concurrency).await;

    let mut failures = 0;
    for outcome in outcomes {
        let path = outcome.path.display();
        match outcome.result {
            Ok(reconstruction) => {
                if !reconstruction.dropped_shares.is_empty() {
                    warn!(
                        "{path}: {} share(s) dropped while decoding",
                        reconstruction.dropped_shares.len()
                    );
                }
                info!(
                    "{path}: secret reconstructed from shares {:?}",
                    reconstruction.selected
                );
                if let Secret::Exact(_) = reconstruction.secret {
                    info!(
                        "{path}: result is computed modulo {}",
                        config.field.modulus()
                    );
                }
                if total == 1 {
                    println!("{}", reconstruction.secret);
                } else {
                    println!("{path}: {}", reconstruction.secret);
                }
            }
            Err(e) => {
                error!("{path}: failed to reconstruct the secret: {e}");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(anyhow::anyhow!(
            "{failures} of {total} reconstruction(s) failed"
        ));
    }

    Ok(())
}
