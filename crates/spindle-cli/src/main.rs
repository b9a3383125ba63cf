use std::collections::HashSet;
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::time::{Duration, sleep};
use tracing::info;

use spindle_core::{AddOptions, EngineConfig, Item, Queue, QueueRegistry, telemetry};

#[derive(Debug, Parser)]
#[command(name = "spindle", about = "Priority and delay queue engine driver")]
struct Cli {
    /// JSON engine configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Execute a JSON-lines script of queue commands, one result per line.
    Run {
        /// Script path, or `-` for stdin.
        script: String,
    },
    /// Drain a bulk-loaded queue with concurrent workers and check delivery.
    Demo {
        #[arg(long, default_value_t = 4)]
        workers: usize,
        #[arg(long, default_value_t = 1000)]
        items: usize,
    },
}

/// One script line.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Command {
    Add {
        queue: String,
        value: String,
        #[serde(default)]
        options: AddOptions,
    },
    AddBulk {
        queue: String,
        values: Vec<String>,
    },
    Remove {
        queue: String,
    },
    Peek {
        queue: String,
    },
    List {
        queue: String,
    },
    Size {
        queue: String,
    },
    Empty {
        queue: String,
    },
    ListQueues,
    RemoveQueue {
        queue: String,
    },
    RemoveQueues {
        #[serde(default)]
        queues: Vec<String>,
    },
    Sleep {
        millis: u64,
    },
}

fn item_json(item: &Item) -> Value {
    json!({
        "value": String::from_utf8_lossy(item.payload()),
        "metadata": item.metadata(),
    })
}

fn optional_item_json(item: Option<Item>) -> Value {
    item.as_ref().map_or(Value::Null, item_json)
}

async fn execute(registry: &QueueRegistry, command: Command) -> anyhow::Result<Value> {
    let queue = |name: &str| -> anyhow::Result<Queue> { Ok(registry.queue(name)?) };

    let result = match command {
        Command::Add {
            queue: name,
            value,
            options,
        } => {
            queue(&name)?.add(value, options).await?;
            json!("ok")
        }
        Command::AddBulk {
            queue: name,
            values,
        } => {
            queue(&name)?.add_bulk(values).await?;
            json!("ok")
        }
        Command::Remove { queue: name } => optional_item_json(queue(&name)?.remove().await?),
        Command::Peek { queue: name } => optional_item_json(queue(&name)?.peek().await?),
        Command::List { queue: name } => Value::Array(
            queue(&name)?
                .list()
                .await?
                .iter()
                .map(item_json)
                .collect(),
        ),
        Command::Size { queue: name } => json!(queue(&name)?.size().await?),
        Command::Empty { queue: name } => {
            queue(&name)?.empty().await?;
            json!("ok")
        }
        Command::ListQueues => json!(registry.list_queues().await?),
        Command::RemoveQueue { queue: name } => {
            registry.remove_queue(&name).await?;
            json!("ok")
        }
        Command::RemoveQueues { queues } => {
            registry.remove_queues(queues).await?;
            json!("ok")
        }
        Command::Sleep { millis } => {
            sleep(Duration::from_millis(millis)).await;
            json!("ok")
        }
    };
    Ok(result)
}

async fn run_script(registry: &QueueRegistry, script: &str) -> anyhow::Result<()> {
    let reader: Box<dyn BufRead> = if script == "-" {
        Box::new(BufReader::new(std::io::stdin()))
    } else {
        let file = std::fs::File::open(script).with_context(|| format!("opening {script}"))?;
        Box::new(BufReader::new(file))
    };

    let mut out = std::io::stdout().lock();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command: Command = serde_json::from_str(line)
            .with_context(|| format!("line {}: malformed command", index + 1))?;
        let result = execute(registry, command)
            .await
            .with_context(|| format!("line {}", index + 1))?;
        writeln!(out, "{result}")?;
    }
    Ok(())
}

/// Bulk-load `items` entries and drain them with `workers` concurrent tasks.
async fn run_demo(registry: QueueRegistry, workers: usize, items: usize) -> anyhow::Result<()> {
    if workers == 0 {
        bail!("--workers must be at least 1");
    }
    let queue = registry.queue("demo")?;
    queue
        .add_bulk((0..items).map(|i| format!("item-{i}")))
        .await?;
    info!(items, workers, "queue loaded");

    let mut handles = Vec::with_capacity(workers);
    for worker in 0..workers {
        let queue = registry.queue("demo")?;
        handles.push(tokio::spawn(async move {
            let mut taken = Vec::new();
            while let Some(item) = queue.remove().await? {
                taken.push(String::from_utf8_lossy(item.payload()).into_owned());
            }
            info!(worker, count = taken.len(), "worker drained");
            anyhow::Ok(taken)
        }));
    }

    let mut delivered = Vec::with_capacity(items);
    for handle in handles {
        delivered.extend(handle.await??);
    }
    let unique: HashSet<&String> = delivered.iter().collect();
    println!(
        "{}",
        json!({
            "items": items,
            "delivered": delivered.len(),
            "unique": unique.len(),
            "remaining": registry.queue("demo")?.size().await?,
        })
    );

    if delivered.len() != items || unique.len() != items {
        bail!(
            "delivery mismatch: {} delivered, {} unique, {} expected",
            delivered.len(),
            unique.len(),
            items
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)?,
        None => EngineConfig::default(),
    };
    let registry = QueueRegistry::builder().config(config).build()?;

    match cli.command {
        Mode::Run { script } => run_script(&registry, &script).await,
        Mode::Demo { workers, items } => run_demo(registry, workers, items).await,
    }
}
