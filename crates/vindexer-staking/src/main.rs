// crates/vindexer-staking/src/main.rs

use {
    anyhow::{Context, Result},
    clap::Parser,
    std::{path::PathBuf, sync::Arc},
    tracing::{error, info, warn},
    tracing_subscriber::EnvFilter,
    vindexer_common::IndexerConfig,
    vindexer_staking::{
        runner::spawn_reader, EventProcessor, MetadataFetcher, NoopMetadataFetcher,
        ProcessorMetrics, Runner, StaticMetadataFetcher,
    },
    vindexer_store::open_store,
};

#[derive(Parser, Debug)]
#[clap(
    version,
    about = "Validator staking indexer",
    long_about = "Folds a JSON-lines stream of staking contract events and block headers into queryable entities"
)]
struct Args {
    /// JSON configuration file
    #[clap(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines input stream
    #[clap(short, long)]
    events: PathBuf,

    #[clap(long)]
    data_dir: Option<PathBuf>,

    #[clap(long)]
    log_level: Option<String>,

    /// Metadata snapshot answering contract reads
    #[clap(long)]
    metadata: Option<PathBuf>,

    /// Skip inputs already applied to the store
    #[clap(long)]
    resume: bool,
}

fn load_config(args: &Args) -> Result<IndexerConfig> {
    let mut config = match &args.config {
        Some(path) => IndexerConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => IndexerConfig::default(),
    };

    if let Some(data_dir) = &args.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(log_level) = &args.log_level {
        config.log_level = log_level.clone();
    }
    if let Some(snapshot) = &args.metadata {
        config.metadata.snapshot_path = Some(snapshot.clone());
    }
    config.resume |= args.resume;

    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        "Starting vindexer ({:?} store at {})",
        config.store.backend,
        config.store_path().display()
    );

    let store = open_store(&config)?;
    let fetcher: Arc<dyn MetadataFetcher> = match &config.metadata.snapshot_path {
        Some(path) => Arc::new(StaticMetadataFetcher::from_file(path)?),
        None => {
            warn!("No metadata snapshot configured, validator metadata will stay empty");
            Arc::new(NoopMetadataFetcher)
        }
    };

    let metrics = ProcessorMetrics::new();
    let runner = Runner::new(
        EventProcessor::new(store.clone(), fetcher, metrics.clone()),
        config.resume,
    );

    let (inputs, reader) = spawn_reader(args.events.clone());
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    let outcome = runner.run(inputs, shutdown).await;

    match reader.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => error!("Input reader failed: {:#}", e),
        Err(e) => error!("Input reader task panicked: {}", e),
    }

    info!("{:?}", metrics);
    store.close()?;

    let summary = outcome?;
    info!(
        "Applied {} inputs, rejected {}, skipped {}",
        summary.applied, summary.rejected, summary.skipped
    );
    if let Some(position) = runner.processor().cursor()?.and_then(|c| c.position) {
        info!("Cursor at {}", position);
    }

    Ok(())
}
