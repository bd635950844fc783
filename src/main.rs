use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use meteo_core::{AppError, Config, ConfigError};
use meteo_ipma::{IpmaClient, TimeOfDay};
use meteo_session::{error_mapping, render_day, render_menu, WeatherSession};

const HELP: &str = "Commands: menu | select <region> | cancel | next | prev | show | help | quit";

fn main() -> Result<()> {
    let config = Config::load()?;
    meteo_core::init(&config.logging.level)?;

    let validation = config.validate();
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }
    if !validation.is_valid() {
        let err = AppError::from(ConfigError::Invalid(validation.error_summary()));
        println!("{}", err.user_message());
        return Err(err.into());
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("meteo-tokio")
        .build()
        .context("Failed to create tokio runtime")?;

    let client = IpmaClient::with_base_url(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )
    .map_err(error_mapping::from_client_error)?;

    let mut session = WeatherSession::new(Arc::new(client), runtime.handle().clone());

    tracing::info!("Meteo started against {}", config.api.base_url);

    session.fetch_locations();
    runtime.block_on(session.settle());
    report_notice(&session);

    match config.ui.default_location.as_deref() {
        Some(name) if session.select_location_by_name(Some(name)) => {
            runtime.block_on(session.settle());
            show(&session);
        }
        _ => print!("{}", render_menu(&session.menu_view())),
    }

    println!("{}", HELP);
    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else { break };
        let line = line?;
        let (command, arg) = match line.trim().split_once(' ') {
            Some((c, a)) => (c, a.trim()),
            None => (line.trim(), ""),
        };

        match command {
            "" => continue,
            "menu" => print!("{}", render_menu(&session.menu_view())),
            "select" if !arg.is_empty() => {
                if session.select_location_by_name(Some(arg)) {
                    runtime.block_on(session.settle());
                    show(&session);
                } else {
                    report_notice(&session);
                }
            }
            "select" => println!("Usage: select <region>"),
            "cancel" => {
                session.select_location_by_name(None);
            }
            "next" => {
                if session.can_go_forward(config.ui.max_day_index) {
                    session.next_day();
                    runtime.block_on(session.settle());
                }
                show(&session);
            }
            "prev" => {
                if session.can_go_back() {
                    session.previous_day();
                    runtime.block_on(session.settle());
                }
                show(&session);
            }
            "show" => show(&session),
            "help" => println!("{}", HELP),
            "quit" | "exit" => break,
            other => println!("Unknown command '{}'. {}", other, HELP),
        }
    }

    tracing::info!("Shutting down");
    Ok(())
}

fn show(session: &WeatherSession) {
    match session.day_view(TimeOfDay::now()) {
        Some(view) => print!("{}", render_day(&view)),
        None => print!("{}", render_menu(&session.menu_view())),
    }
    report_notice(session);
}

fn report_notice(session: &WeatherSession) {
    if let Some(notice) = session.last_notice() {
        println!("! {}", notice);
    }
}
