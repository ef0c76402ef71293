mod config;
mod modules;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rcmsg_core::Message;
use rcmsg_core::app::{
    Enricher, PipelineBuilder, StateCounts, WorkerConfig, WorkerContext, WorkerGroup,
};
use rcmsg_core::domain::Properties;
use rcmsg_core::impls::LineParser;
use rcmsg_core::ports::{Module, Parser as _};

use crate::config::CliConfig;
use crate::modules::LogModule;

/// Enrich feed lines and hand them to the modules interested in them.
///
/// Every processed message is written to stdout as one JSON line; logs go
/// to stderr.
#[derive(Parser, Debug)]
#[command(name = "rcmsg", version)]
struct Args {
    /// Configuration file (JSON)
    #[arg(short, long, env = "RCMSG_CONFIG")]
    config: Option<PathBuf>,

    /// Input file with one raw line per message (stdin when omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Number of workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Immediate retries after a failed fetch
    #[arg(long)]
    max_retries: Option<u32>,

    /// Type tag of every line read
    #[arg(short = 't', long = "type")]
    message_type: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut CliConfig) {
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(max_retries) = self.max_retries {
            config.max_retries = max_retries;
        }
        if let Some(message_type) = &self.message_type {
            config.message_type = message_type.clone();
        }
        config.workers = config.workers.max(1);
    }
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => CliConfig::load_from_file(path)?,
        None => CliConfig::default(),
    };
    args.apply(&mut config);
    init_tracing(&config.log_level);
    debug!(?config, "configuration");

    let mut builder = PipelineBuilder::<Properties>::new();
    let mut log_modules = Vec::new();
    for id in &config.modules {
        let module = Arc::new(LogModule::new(id));
        builder = builder.register(module.clone())?;
        log_modules.push(module);
    }
    let pipeline = builder
        .expect_modules(config.interested.as_slice())
        .build()?;

    let context = Arc::new(WorkerContext {
        enricher: Enricher::new(Arc::new(config.client.build())),
        dispatcher: pipeline.dispatcher(),
        config: WorkerConfig {
            properties: config.properties.clone(),
            interested: config.interested.clone(),
            max_retries: config.max_retries,
        },
    });

    let (in_tx, in_rx) = mpsc::channel(config.workers * 4);
    let (out_tx, mut out_rx) = mpsc::channel(config.workers * 4);
    let group = WorkerGroup::spawn(config.workers, in_rx, out_tx, context);
    info!(workers = config.workers, client = %config.client.name, "workers started");

    let printer = tokio::spawn(async move {
        let mut counts = StateCounts::default();
        let mut stdout = tokio::io::stdout();
        while let Some(processed) = out_rx.recv().await {
            counts.record(processed.message.state());
            if let Err(err) = &processed.outcome {
                warn!(raw = processed.message.raw(), %err, "message given up");
            }
            let line = serde_json::to_string(&processed.message)?;
            stdout.write_all(line.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.flush().await?;
        anyhow::Ok(counts)
    });

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &args.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open input: {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };

    let parser = LineParser::new(&config.parser, config.message_type.as_str());
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let parsed: Option<Message<Properties>> = parser.parse(&line);
        let Some(message) = parsed else {
            continue;
        };
        if in_tx.send(message).await.is_err() {
            warn!("workers stopped before the input ended");
            break;
        }
    }
    drop(in_tx);

    group.join().await;
    let counts = printer.await??;
    info!(
        total = counts.total(),
        succeeded = counts.succeeded,
        failed = counts.failed,
        "input processed"
    );
    for module in &log_modules {
        debug!(module = module.id(), consumed = module.consumed(), "module summary");
    }
    Ok(())
}

