//! Streams a synchronized disassembly view to the terminal.
//!
//! Connects to a changeset server, mirrors one database and prints every
//! rendering call the sync loop makes, plus the applied revisions from the
//! event stream. Stop with ctrl-c.
//!
//! ```console
//! $ cargo run --example term_viewer -- --endpoint http://localhost:8080 --db demo
//! ```

use std::env::var;

use clap::Parser;
use disview_client::{HttpFeed, SyncClient, SyncConfig, SyncEvent, ViewBinding};
use disview_primitives::addr::{Addr, AddressRange};
use disview_primitives::area::AreaId;
use disview_primitives::line::Line;
use eyre::Result as EyreResult;
use tokio::signal;
use tracing_subscriber::fmt::layer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{registry, EnvFilter};
use url::Url;

#[derive(Debug, Parser)]
#[command(author, version, about = "Streams a disassembly view to the terminal")]
struct Args {
    /// Base URL of the changeset server
    #[arg(long, value_name = "URL", default_value = "http://localhost:8080")]
    endpoint: Url,

    /// Database to view
    #[arg(long, value_name = "NAME", default_value = "demo")]
    db: String,

    /// Lowest address of the window, in hex
    #[arg(long, value_name = "ADDR", default_value = "0")]
    minaddr: Addr,

    /// Highest address of the window, in hex
    #[arg(long, value_name = "ADDR", default_value = "3fff")]
    maxaddr: Addr,
}

/// Binding that renders by printing one line per call.
///
/// Row handles are the formatted address column, node handles the area id
/// text, so removals can name what they remove.
#[derive(Debug, Default)]
struct TermView {
    lists: u64,
}

impl ViewBinding for TermView {
    type RowHandle = String;
    type NodeHandle = String;
    type ListHandle = u64;

    fn root_list(&mut self) -> u64 {
        self.lists += 1;
        self.lists
    }

    fn render_row(&mut self, position: usize, line: &Line) -> String {
        let addr = line.range.min.to_fixed_hex(4);
        println!("+ {addr} {:4} {}  (row {position})", line.kind, line.text);
        addr
    }

    fn replace_row(&mut self, handle: &mut String, line: &Line) {
        println!("~ {handle} {:4} {}", line.kind, line.text);
    }

    fn remove_row(&mut self, handle: String) {
        println!("- {handle}");
    }

    fn render_node(
        &mut self,
        parent: &u64,
        position: usize,
        id: &AreaId,
        label: &str,
        is_internal: bool,
    ) -> String {
        let shape = if is_internal { "branch" } else { "leaf" };
        println!("# area {id} \"{label}\" ({shape}, list {parent}, slot {position})");
        id.to_string()
    }

    fn relabel_node(&mut self, handle: &mut String, label: &str) {
        println!("# area {handle} renamed to \"{label}\"");
    }

    fn attach_child_list(&mut self, handle: &mut String) -> u64 {
        self.lists += 1;
        println!("# area {handle} opened list {}", self.lists);
        self.lists
    }

    fn detach_child_list(&mut self, handle: &mut String, list: u64) {
        println!("# area {handle} closed list {list}");
    }

    fn remove_node(&mut self, handle: String) {
        println!("# area {handle} removed");
    }
}

#[tokio::main]
async fn main() -> EyreResult<()> {
    setup()?;

    let args = Args::parse();

    let config = SyncConfig::new(args.endpoint.clone(), args.db)
        .with_window(AddressRange::new(args.minaddr, args.maxaddr));
    let feed = HttpFeed::new(args.endpoint);

    let (client, handle, mut events) = SyncClient::new(config, feed, TermView::default());
    let runner = tokio::spawn(client.run());

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                handle.stop();
                break;
            }
            event = events.recv() => match event {
                Some(SyncEvent::Applied { rev }) => println!("== revision {rev} applied"),
                Some(SyncEvent::Failed { error }) => println!("== sync failed: {error}"),
                Some(SyncEvent::LineSelected { addr }) => println!("== selected {addr:x}"),
                Some(_) => {}
                None => break,
            },
        }
    }

    runner.await?;

    Ok(())
}

fn setup() -> EyreResult<()> {
    let directives = match var("RUST_LOG") {
        Ok(value) if !value.trim().is_empty() => value,
        _ => "term_viewer=info,disview_=info".to_owned(),
    };

    registry()
        .with(EnvFilter::builder().parse(directives)?)
        .with(layer())
        .init();

    color_eyre::install()?;

    Ok(())
}
