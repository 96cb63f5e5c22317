// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use clap::Parser;
use log::{error, info};
use std::path::PathBuf;

use touchflow::config::{DEFAULT_SERVER_URL, DEFAULT_TIMEOUT_MS, DEFAULT_TOUCH_ENDPOINT};
use touchflow::{GestureScript, RemoteSession, SessionConfig};

#[derive(Parser, Debug)]
#[command(name = "touchflow")]
#[command(about = r#"Perform a scripted touch gesture on a remote automation session

Element selectors in the script are located through the session; the
gesture is sealed and sent as one request."#, long_about = None)]
struct Args {
    /// Path to the gesture script (JSON)
    script: PathBuf,

    /// Automation server base URL
    #[arg(short = 'u', long, default_value = DEFAULT_SERVER_URL)]
    server: String,

    /// Session id on the server
    #[arg(short, long)]
    session: String,

    /// Per-request timeout in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_MS)]
    timeout_ms: u64,

    /// Gesture endpoint relative to the session
    #[arg(short, long, default_value = DEFAULT_TOUCH_ENDPOINT)]
    endpoint: String,

    /// Print the sealed request instead of sending it
    #[arg(short, long)]
    dry_run: bool,

    /// Verbose mode - log every request
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let cfg = SessionConfig {
        server_url: args.server.clone(),
        session_id: args.session.clone(),
        request_timeout_ms: args.timeout_ms,
        touch_endpoint: args.endpoint.clone(),
    };

    if let Err(e) = run(&args, &cfg) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args, cfg: &SessionConfig) -> touchflow::Result<()> {
    let script = GestureScript::load(&args.script)?;
    info!("Script: {:?} ({} stream(s))", args.script, script.streams.len());

    let session = RemoteSession::connect(cfg);
    let mut gesture = script.compile(&session)?;

    if args.dry_run {
        let request = gesture.seal(&session)?;
        println!("{}", serde_json::to_string_pretty(&request)?);
        return Ok(());
    }

    let ack = gesture.perform(&session, &session.dispatcher())?;
    info!("Server answered: {}", ack.value);
    Ok(())
}
