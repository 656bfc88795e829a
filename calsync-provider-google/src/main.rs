//! calsync-provider-google - Google Calendar provider for calsync
//!
//! This binary implements the calsync provider protocol, communicating
//! with calsync via JSON over stdin/stdout.
//!
//! The provider manages its own credentials and tokens:
//!   ~/.config/calsync/providers/google/app_config.toml
//!   ~/.config/calsync/providers/google/session/{account}.toml

mod app_config;
mod commands;
mod google_event;
mod remote_config;
mod session;

use std::io::{self, BufRead, Write};

use calsync_core::remote::protocol::{Command, ErrorKind, Request, Response};
use serde::Serialize;

use crate::session::SessionError;

#[tokio::main]
async fn main() {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                eprintln!("Failed to read stdin: {}", e);
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Request>(&line) {
            Ok(request) => handle_request(request).await,
            Err(e) => Response::error(&format!("Failed to parse request: {}", e), ErrorKind::Remote),
        };

        if writeln!(stdout, "{}", response).and_then(|_| stdout.flush()).is_err() {
            break;
        }
    }
}

async fn handle_request(request: Request) -> String {
    let params = request.params;

    match request.command {
        Command::Authenticate => respond(commands::authenticate::handle(params).await),
        Command::ListEvents => respond(commands::list_events::handle(params).await),
        Command::InsertEvents => respond(commands::insert_events::handle(params).await),
        Command::DeleteEvents => respond(commands::delete_events::handle(params).await),
    }
}

fn respond<T: Serialize>(result: anyhow::Result<T>) -> String {
    match result {
        Ok(data) => Response::success(data),
        Err(e) => Response::error(&format!("{:#}", e), error_kind(&e)),
    }
}

/// Session problems need the user to run `calsync auth`; everything else is
/// reported as a remote failure.
fn error_kind(err: &anyhow::Error) -> ErrorKind {
    let is_session = err
        .chain()
        .any(|cause| cause.downcast_ref::<SessionError>().is_some());

    if is_session { ErrorKind::Auth } else { ErrorKind::Remote }
}
