//! Terminal entry point for the conversational chart client

use anyhow::Result;
use pv_agent::HttpAgentClient;
use pv_export::DirectoryDelivery;
use pv_session::ChatSession;
use std::env;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod console;

use console::ConsoleRenderer;

const HELP: &str = "commands:
  /years            load the publications-per-year chart
  /fields           load the field-distribution chart
  /export <fmt>     export the current chart (json | csv | spec | png)
  /sel              show the current selection as a follow-up request
  /clear            clear the current selection
  /history          print the conversation so far
  /quit             exit
anything else is sent to the agent as a chat message";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let base_url =
        env::var("PAPERVIZ_AGENT_URL").unwrap_or_else(|_| "http://localhost:8000".to_string());
    let download_dir =
        env::var("PAPERVIZ_DOWNLOAD_DIR").unwrap_or_else(|_| "downloads".to_string());
    info!(%base_url, %download_dir, "starting paperviz");

    let agent = Arc::new(HttpAgentClient::new(base_url));
    let session = ChatSession::new(agent, Arc::new(ConsoleRenderer));
    let delivery = DirectoryDelivery::new(download_dir);

    println!("paperviz - ask about publications in plain language");
    println!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line {
            "" => {}
            "/quit" => break,
            "/years" => report(session.load_by_year().await.map(|_| "year chart loaded")),
            "/fields" => report(session.load_by_field().await.map(|_| "field chart loaded")),
            "/clear" => {
                session.clear_selection();
                println!("selection cleared");
            }
            "/sel" => match session.use_selection_as_input() {
                Some(query) => println!("follow-up: {query}"),
                None => println!("nothing selected"),
            },
            "/history" => {
                for turn in session.history() {
                    println!("{:?}: {}", turn.role, turn.text);
                }
            }
            _ if line.starts_with("/export") => {
                let result = match line.trim_start_matches("/export").trim() {
                    "json" => session.export_data_json(&delivery),
                    "csv" => session.export_data_csv(&delivery),
                    "spec" => session.export_spec_json(&delivery),
                    "png" => session.export_image_png(&delivery).await,
                    other => {
                        println!("unknown export format '{other}' (json | csv | spec | png)");
                        continue;
                    }
                };
                report(result.map(|_| "export finished"));
            }
            _ if line.starts_with('/') => println!("{HELP}"),
            message => match session.submit(message).await {
                Ok(answer) => println!("agent: {answer}"),
                Err(err) => println!("error: {err}"),
            },
        }
    }

    session.close();
    Ok(())
}

fn report(result: Result<&str, pv_session::SessionError>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => println!("error: {err}"),
    }
}
