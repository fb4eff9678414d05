//! # Example: Console host
//!
//! Drives a scheduler from stdin. Every line is split on whitespace and handed to
//! `Scheduler::dispatch`; `update <carbon|oxide|server> <version>` simulates an
//! update signal and `quit` unloads.
//!
//! ```text
//! RUST_LOG=rebootvisor=debug cargo run --example console
//! > restart 15
//! > status
//! > cancel
//! ```

use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use rebootvisor::{Component, Config, Host, LogWriter, Scheduler, Subscribe, UpdateSignal};

/// Prints broadcasts to stdout; "shutting down" flips a flag the main loop watches.
#[derive(Default)]
struct StdoutHost {
    stopped: AtomicBool,
}

impl Host for StdoutHost {
    fn broadcast(&self, message: &str, _avatar_id: u64) {
        println!("[broadcast] {message}");
    }

    fn kick_all(&self, reason: &str) {
        println!("[kick] {reason}");
    }

    fn shutdown(&self) {
        println!("[shutdown]");
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn hostname(&self) -> String {
        "console-demo".to_string()
    }
}

fn component(name: &str) -> Option<Component> {
    match name {
        "carbon" => Some(Component::Carbon),
        "oxide" => Some(Component::Oxide),
        "server" => Some(Component::Server),
        _ => None,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join("RebootScheduler.json"));
    let cfg = Config::load_or_default(&path);

    let host = Arc::new(StdoutHost::default());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let scheduler = Scheduler::builder(cfg, host.clone())
        .with_subscribers(subs)
        .with_config_path(&path)
        .build();
    scheduler.start().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if host.stopped.load(Ordering::SeqCst) {
            break;
        }
        let args: Vec<&str> = line.split_whitespace().collect();
        match args.as_slice() {
            ["quit"] => break,
            ["update", name, version] => match component(name) {
                Some(c) => {
                    let outcome = scheduler.on_update(UpdateSignal::new(c, *version)).await;
                    println!("{outcome:?}");
                }
                None => println!("unknown component {name}"),
            },
            _ => println!("{}", scheduler.dispatch(&args).await),
        }
    }

    scheduler.unload().await;
    Ok(())
}
