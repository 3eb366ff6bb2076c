//! rendezvous-ctl — command-line interface for the Rendezvous daemon.

mod cmd;

use anyhow::{Context, Result};

use cmd::http::base_url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = rendezvous_core::config::DEFAULT_PORT;

fn print_usage() {
    println!("Usage: rendezvous-ctl [--host <host>] [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  status                                   Show daemon status");
    println!("  list                                     List registered communities");
    println!("  register <address> <name> [description]  Register or update a community");
    println!("  heartbeat <address>                      Refresh a community's last-seen time");
    println!();
    println!("Options:");
    println!("  --host <host>   Daemon host (default: {})", DEFAULT_HOST);
    println!("  --port <port>   Daemon port (default: {})", DEFAULT_PORT);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut host = DEFAULT_HOST.to_string();
    let mut port = DEFAULT_PORT;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                i += 1;
                port = args
                    .get(i)
                    .context("--port requires a value")?
                    .parse()
                    .context("--port must be a number")?;
            }
            "--host" => {
                i += 1;
                host = args.get(i).context("--host requires a value")?.clone();
            }
            _ => remaining.push(&args[i]),
        }
        i += 1;
    }

    let base = base_url(&host, port);

    match remaining.as_slice() {
        ["status"] | [] => cmd::status::cmd_status(&base).await,
        ["list"] => cmd::communities::cmd_list(&base).await,
        ["register", address, name] => {
            cmd::communities::cmd_register(&base, address, name, None).await
        }
        ["register", address, name, description] => {
            cmd::communities::cmd_register(&base, address, name, Some(*description)).await
        }
        ["heartbeat", address] => cmd::communities::cmd_heartbeat(&base, address).await,
        ["help"] | ["--help"] | ["-h"] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
