//! Queueboard CLI - operator console for the Queueboard daemon

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tabled::{Table, Tabled};
use tokio::io::{AsyncBufReadExt, BufReader};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9630";
const STATUS_POLL_INTERVAL: Duration = Duration::from_millis(250);
const STATUS_POLL_LIMIT: usize = 280;

#[derive(Parser)]
#[command(name = "queueboard")]
#[command(about = "Queueboard operator CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "QUEUEBOARD_RPC_URL", default_value = DEFAULT_RPC_URL)]
    rpc_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Call the next customer of a company
    Next {
        /// Company letter (A-D)
        company: String,
    },

    /// Step a company's queue back
    Prev {
        /// Company letter (A-D)
        company: String,
    },

    /// Zero every queue and ticket counter
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Issue a ticket without printing
    Issue {
        /// Company letter (A-D)
        company: String,
    },

    /// Press a station key (1-4)
    Press {
        key: String,
    },

    /// Interactive station: each key typed on stdin is a press
    Station,

    /// Show all counters and the station status
    Status,

    /// Printer address settings
    Printer {
        #[command(subcommand)]
        action: PrinterAction,
    },
}

#[derive(Subcommand)]
enum PrinterAction {
    /// Show the configured address
    Get,
    /// Replace the configured address
    Set {
        /// IPv4 address, e.g. 192.168.1.102
        address: String,
    },
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: serde_json::Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<serde_json::Value>,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct BoardEntry {
    company: String,
    kind: String,
    label: String,
}

#[derive(Deserialize)]
struct StationStatus {
    state: String,
    message: String,
}

#[derive(Tabled)]
struct BoardRow {
    #[tabled(rename = "Company")]
    company: String,
    #[tabled(rename = "Now serving")]
    queue: String,
    #[tabled(rename = "Last ticket")]
    ticket: String,
}

async fn call_rpc(url: &str, method: &str, params: serde_json::Value) -> Result<serde_json::Value> {
    let request = JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        method: method.to_string(),
        params,
        id: 1,
    };

    let client = reqwest::Client::new();
    let response: JsonRpcResponse = client
        .post(url)
        .json(&request)
        .send()
        .await
        .context("Failed to connect to daemon")?
        .json()
        .await
        .context("Failed to parse response")?;

    if let Some(error) = response.error {
        anyhow::bail!("RPC error ({}): {}", error.code, error.message);
    }

    response
        .result
        .ok_or_else(|| anyhow::anyhow!("No result in response"))
}

fn board_rows(entries: &[BoardEntry]) -> Vec<BoardRow> {
    let mut rows: Vec<BoardRow> = Vec::new();
    for entry in entries {
        let index = match rows.iter().position(|r| r.company == entry.company) {
            Some(index) => index,
            None => {
                rows.push(BoardRow {
                    company: entry.company.clone(),
                    queue: String::new(),
                    ticket: String::new(),
                });
                rows.len() - 1
            }
        };
        match entry.kind.as_str() {
            "queue" => rows[index].queue = entry.label.clone(),
            _ => rows[index].ticket = entry.label.clone(),
        }
    }
    rows
}

fn print_status(status: &StationStatus) {
    let line = match status.state.as_str() {
        "printed" => status.message.green(),
        "idle" => status.message.normal(),
        "printing" => status.message.cyan(),
        "cooling_down" => status.message.yellow(),
        _ => status.message.red(),
    };
    println!("  {} {}", "Station:".bold(), line);
}

async fn fetch_status(url: &str) -> Result<StationStatus> {
    let result = call_rpc(url, "station.status.v1", json!({})).await?;
    Ok(serde_json::from_value(result)?)
}

/// Press a key, then follow the station until the print settles
async fn press(url: &str, key: &str) -> Result<()> {
    let outcome = call_rpc(url, "station.press.v1", json!({ "key": key })).await?;

    match outcome["outcome"].as_str() {
        Some("issued") => {
            println!(
                "{}",
                format!("✓ Ticket {} issued", outcome["label"].as_str().unwrap_or("?"))
                    .green()
                    .bold()
            );
            for _ in 0..STATUS_POLL_LIMIT {
                let status = fetch_status(url).await?;
                if status.state != "printing" {
                    print_status(&status);
                    return Ok(());
                }
                tokio::time::sleep(STATUS_POLL_INTERVAL).await;
            }
            println!("  {} still printing", "⚠".yellow());
        }
        Some("cooling_down") => {
            let status = fetch_status(url).await?;
            print_status(&status);
        }
        _ => println!("  {} key {} is not bound", "○".dimmed(), key),
    }
    Ok(())
}

fn print_queue(result: &serde_json::Value) {
    println!(
        "{}",
        format!(
            "✓ Company {} now serving {}",
            result["company"].as_str().unwrap_or("?"),
            result["label"].as_str().unwrap_or("?")
        )
        .green()
        .bold()
    );
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Next { company } => {
            let result =
                call_rpc(&cli.rpc_url, "queue.increment.v1", json!({ "company": company })).await?;
            print_queue(&result);
        }

        Commands::Prev { company } => {
            let result =
                call_rpc(&cli.rpc_url, "queue.decrement.v1", json!({ "company": company })).await?;
            print_queue(&result);
        }

        Commands::Reset { yes } => {
            if !yes {
                println!("Reset all queue and ticket numbers? [y/N]");
                let mut answer = String::new();
                BufReader::new(tokio::io::stdin())
                    .read_line(&mut answer)
                    .await?;
                if !matches!(answer.trim(), "y" | "Y" | "yes") {
                    println!("{}", "Cancelled".yellow());
                    return Ok(());
                }
            }
            call_rpc(&cli.rpc_url, "queue.reset_all.v1", json!({})).await?;
            println!("{}", "✓ All counters reset".green().bold());
        }

        Commands::Issue { company } => {
            let result =
                call_rpc(&cli.rpc_url, "ticket.issue.v1", json!({ "company": company })).await?;
            println!(
                "{}",
                format!("✓ Ticket {} issued", result["label"].as_str().unwrap_or("?"))
                    .green()
                    .bold()
            );
        }

        Commands::Press { key } => {
            press(&cli.rpc_url, &key).await?;
        }

        Commands::Station => {
            println!("{}", "Station ready: keys 1-4 issue tickets, Ctrl+D exits".cyan().bold());
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                for key in line.chars().filter(|c| !c.is_whitespace()) {
                    if let Err(e) = press(&cli.rpc_url, &key.to_string()).await {
                        println!("  {} {}", "✗".red(), e);
                    }
                }
            }
        }

        Commands::Status => {
            println!("{}", "Queueboard Status".cyan().bold());
            println!();

            match call_rpc(&cli.rpc_url, "display.snapshot.v1", json!({})).await {
                Ok(board) => {
                    println!("  {} {}", "RPC URL:".bold(), cli.rpc_url);
                    println!("  {} {}", "Status:".bold(), "ONLINE".green());
                    println!();
                    let entries: Vec<BoardEntry> =
                        serde_json::from_value(board["entries"].clone())?;
                    println!("{}", Table::new(board_rows(&entries)));
                    println!();
                    print_status(&fetch_status(&cli.rpc_url).await?);
                }
                Err(e) => {
                    println!("  {} {}", "Status:".bold(), "ERROR".red());
                    println!("  {} {}", "Error:".bold(), e);
                }
            }
        }

        Commands::Printer { action } => {
            let result = match action {
                PrinterAction::Get => {
                    call_rpc(&cli.rpc_url, "printer.address.get.v1", json!({})).await?
                }
                PrinterAction::Set { address } => {
                    let result = call_rpc(
                        &cli.rpc_url,
                        "printer.address.set.v1",
                        json!({ "address": address }),
                    )
                    .await?;
                    println!("{}", "✓ Printer address saved".green().bold());
                    result
                }
            };
            println!("  {} {}", "Address:".bold(), result["address"].as_str().unwrap_or("?"));
            println!(
                "  {} {}",
                "Service URL:".bold(),
                result["service_url"].as_str().unwrap_or("?")
            );
        }
    }

    Ok(())
}
