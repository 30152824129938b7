use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use dotenv::dotenv;
use pianoroom_page::{
    ReservationPageController,
    api::HttpReservationApi,
    clock::SystemClock,
    config::ClientConfig,
    controller::{ALERT_CONTAINER_ID, AVAILABILITY_CONTAINER_ID, COUNTDOWN_ID, LOADING_SPINNER_ID},
    dom::{Document, Element},
    widgets::{confirm::FixedAnswer, countdown::COUNTDOWN_TICK},
};
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "pianoroom")]
#[command(about = "Headless host for the piano room reservation page")]
#[command(version)]
struct Args {
    /// Log level (overrides LOG_LEVEL)
    #[arg(short, long)]
    log_level: Option<Level>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check a room's free slots for a day and print the rendered table
    Availability {
        #[arg(long)]
        room_id: String,

        /// Day to check, as YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Row to select after rendering (1-based)
        #[arg(long)]
        select: Option<usize>,
    },
    /// Print the backend clock, the local clock and the measured latency
    ServerTime,
    /// Count down to a target time
    Countdown {
        /// RFC 3339 or local `YYYY-MM-DD HH:MM:SS`
        target: String,

        /// Number of one-second ticks to print
        #[arg(long, default_value_t = 5)]
        ticks: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    let args = Args::parse();

    // Load configuration
    let mut config = ClientConfig::from_env()?;
    if let Some(level) = args.log_level {
        config.log_level = level;
    }

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(base_url = %config.base_url, "Starting pianoroom client");

    let countdown_target = match &args.command {
        Command::Countdown { target, .. } => Some(target.as_str()),
        _ => None,
    };
    let document = reservation_page(countdown_target);

    let api = HttpReservationApi::new(config.clone()).wrap_err("Failed to build HTTP client")?;
    let controller = ReservationPageController::new(
        document.clone(),
        Arc::new(api),
        Arc::new(FixedAnswer(false)),
        Arc::new(SystemClock),
        config.display_zone,
    );
    let bindings = controller.init();

    match args.command {
        Command::Availability {
            room_id,
            date,
            select,
        } => {
            let outcome = controller.check_room_availability(&room_id, &date).await;
            info!(?outcome, "Availability check finished");
            print_element(&document, AVAILABILITY_CONTAINER_ID);

            if let Some(row) = select {
                let buttons = document.query_all(|element| element.has_class("select-time-btn"));
                let button = row
                    .checked_sub(1)
                    .and_then(|index| buttons.get(index))
                    .ok_or_else(|| eyre!("No slot in row {row}"))?;
                button.click();
                for name in ["start_time", "end_time", "start_time_display", "end_time_display"] {
                    if let Some(field) = document.input_by_name(name) {
                        println!("{name} = {}", field.value());
                    }
                }
            }
        }
        Command::ServerTime => {
            if let Some(report) = controller.check_server_time().await {
                println!("Server time:           {}", report.server_time);
                println!("Local time:            {}", report.local_time);
                println!("Latency:               {}", report.latency_label());
                println!("Next reservation time: {}", report.next_reservation_time);
            }
        }
        Command::Countdown { target, ticks } => {
            if !bindings.countdown {
                return Err(eyre!("Unparseable countdown target: {target}"));
            }
            print_text(&document, COUNTDOWN_ID);
            for _ in 0..ticks {
                tokio::time::sleep(COUNTDOWN_TICK).await;
                print_text(&document, COUNTDOWN_ID);
            }
        }
    }

    print_alerts(&document);

    Ok(())
}

/// The element layout of the reservation and admin system pages.
fn reservation_page(countdown_target: Option<&str>) -> Document {
    let document = Document::new();
    document.append(Element::new("div").with_id(ALERT_CONTAINER_ID));

    if let Some(target) = countdown_target {
        document.append(
            Element::new("span")
                .with_id(COUNTDOWN_ID)
                .with_attribute("data-target-time", target),
        );
    }

    document.append(
        Element::new("div")
            .with_id(LOADING_SPINNER_ID)
            .with_class("spinner-border d-none"),
    );
    document.append(Element::new("div").with_id(AVAILABILITY_CONTAINER_ID));
    document.append(
        Element::new("form")
            .with_id("reservation-form")
            .with_child(input("hidden", "start_time"))
            .with_child(input("hidden", "end_time"))
            .with_child(input("text", "start_time_display"))
            .with_child(input("text", "end_time_display")),
    );

    for id in ["server-time", "local-time", "latency", "next-reservation-time"] {
        document.append(Element::new("span").with_id(id));
    }

    document
}

fn input(kind: &str, name: &str) -> Element {
    Element::new("input")
        .with_attribute("type", kind)
        .with_attribute("name", name)
}

fn print_element(document: &Document, id: &str) {
    if let Some(element) = document.get_element_by_id(id) {
        println!("{}", element.inner_html());
    }
}

fn print_text(document: &Document, id: &str) {
    if let Some(element) = document.get_element_by_id(id) {
        println!("{}", element.text_content());
    }
}

fn print_alerts(document: &Document) {
    let Some(container) = document.get_element_by_id(ALERT_CONTAINER_ID) else {
        return;
    };
    for alert in container.children() {
        eprintln!("{}", alert.text_content());
    }
}
