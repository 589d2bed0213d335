//! Notes console client.
//!
//! Signs in, loads the note list, fires the startup side call, then reads
//! form commands from stdin until the user signs out.

use notes_app::config::Config;
use notes_app::console::{self, Command, Reply};
use notes_app::error::SyncResult;
use notes_app::session::AppSession;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

type SideCallHandle = JoinHandle<SyncResult<serde_json::Value>>;

async fn side_call_done(handle: &mut Option<SideCallHandle>) -> Option<SyncResult<serde_json::Value>> {
    match handle {
        Some(h) => h.await.map_err(|e| log::error!("[SIDE_CALL] Task panicked: {}", e)).ok(),
        None => std::future::pending().await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (mut session, mut events) = match AppSession::start(&config).await {
        Ok(started) => started,
        Err(e) => {
            log::error!("Sign-in failed: {}", e);
            std::process::exit(1);
        }
    };

    let mut side_call = Some(session.spawn_side_call());
    let mut loading = true;

    if let Err(e) = session.sync.fetch_all().await {
        println!("! {}", e);
    }
    print!(
        "{}",
        console::render(session.username(), session.sync.notes(), session.sync.draft(), loading)
    );
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        log::error!("Failed to read stdin: {}", e);
                        break;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                let command = match Command::parse(&line) {
                    Ok(command) => command,
                    Err(e) => {
                        println!("! {}", e);
                        continue;
                    }
                };

                match console::apply(&mut session.sync, command).await {
                    Reply::Render => print!(
                        "{}",
                        console::render(session.username(), session.sync.notes(), session.sync.draft(), loading)
                    ),
                    Reply::Message(msg) => println!("{}", msg),
                    Reply::Submitted(msg, pending) => {
                        log::debug!("Write #{} ({}) in flight", pending.seq(), pending.op());
                        println!("{}", msg);
                        print!(
                            "{}",
                            console::render(session.username(), session.sync.notes(), session.sync.draft(), loading)
                        );
                    }
                    Reply::SignOut => break,
                }
            }
            Some(event) = events.recv() => {
                if let Some(msg) = console::describe_event(&event) {
                    println!("{}", msg);
                }
            }
            done = side_call_done(&mut side_call), if side_call.is_some() => {
                side_call = None;
                loading = false;
                match done {
                    Some(Ok(_)) => println!("Fully loaded"),
                    Some(Err(e)) => println!("! {}", e),
                    None => println!("! startup call did not finish"),
                }
            }
        }
    }

    session.sign_out().await;
    println!("Signed out.");
}
