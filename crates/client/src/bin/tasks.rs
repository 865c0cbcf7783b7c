use std::sync::Arc;

use clap::Parser;
use client::{
    api::HttpTaskApi,
    store::TaskStore,
    views::{App, Command, HELP, Outcome, render},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use utils::logging::init_tracing;

/// Interactive terminal client for the task manager.
#[derive(Parser, Debug)]
#[command(name = "tasks", version)]
struct Args {
    /// Origin of the task API server
    #[arg(long, env = "TASKS_API_URL", default_value = "http://127.0.0.1:3000")]
    api_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("client=warn");
    let args = Args::parse();

    let api = HttpTaskApi::new(&args.api_url)?;
    let store = Arc::new(TaskStore::new(Arc::new(api)));
    let mut updates = store.subscribe();
    let mut app = App::new(store);

    let renderer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            println!("\n{}", render(&state));
        }
    });

    println!("Task Manager ({})\n{}", args.api_url, HELP);
    app.mount();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match app.dispatch(command) {
            Outcome::Dispatched => {}
            Outcome::Ignored(reason) => println!("{}", reason),
            Outcome::Help => println!("{}", HELP),
            Outcome::Quit => break,
        }
    }

    // Finish in-flight store operations, then let the renderer drain the
    // last updates; it exits once the store is dropped.
    app.settle().await;
    drop(app);
    renderer.await?;
    Ok(())
}
