//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `anka_core` linkage and print the crate version.
//! - Replay a short demo page over the in-process broker and print the
//!   rendered rows, so matching can be eyeballed without a UI.
//!
//! Page, host, viewer and rule come from `ANKA_*` env vars; `ANKA_HOST_ID`
//! defaults to `host` here. An optional absolute directory argument turns on
//! file logging.

use anka_core::{
    default_log_level, init_logging, parse_message_data, AnkaSession, LocalBroker, MessageData,
    PageView, SessionConfig,
};
use std::process::ExitCode;

const DEMO_HOST_ID: &str = "host";

fn main() -> ExitCode {
    println!("anka_core ping={}", anka_core::ping());
    println!("anka_core version={}", anka_core::core_version());

    if let Some(log_dir) = std::env::args().nth(1) {
        if let Err(err) = init_logging(default_log_level(), &log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    match run_demo() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_demo() -> Result<(), Box<dyn std::error::Error>> {
    let config = SessionConfig::from_lookup(|name: &str| {
        std::env::var(name)
            .ok()
            .or_else(|| (name == anka_core::config::ENV_HOST_ID).then(|| DEMO_HOST_ID.to_string()))
    })?;
    let host_id = config.host_id.clone();
    let channel = anka_core::channel_for_page(&config.page_id);

    let broker = LocalBroker::new();
    let seed = vec![demo_message("1", &host_id, "next reply rolls [[dice]]")];
    let mut session = AnkaSession::start(config, broker.client()?, seed)?;

    broker.deliver(&channel, &demo_message("2", "u2", "rolled [[dice:4]]"))?;
    broker.deliver(&channel, &demo_message("3", "u3", "I pick [[color:red]]"))?;
    session.pump();
    session.send("me too [[dice:6]]")?;

    print_view(&session.view());
    session.close()?;
    Ok(())
}

fn demo_message(id: &str, user_id: &str, content: &str) -> anka_core::Message {
    parse_message_data(MessageData {
        id: id.to_string(),
        user_id: user_id.to_string(),
        content: content.to_string(),
    })
}

fn print_view(view: &PageView) {
    let elements: Vec<&str> = view
        .header
        .latest_host_elements
        .iter()
        .map(|element| element.kind.as_str())
        .collect();
    println!(
        "host={} latest_elements=[{}] feed={}",
        view.header.host_id,
        elements.join(","),
        view.feed_status.as_str()
    );
    for row in &view.rows {
        let marker = match (row.is_host, row.is_matched) {
            (true, _) => "H",
            (false, true) => "*",
            (false, false) => " ",
        };
        println!("{marker} {:<10} {}", row.user_id, row.id);
    }
}
