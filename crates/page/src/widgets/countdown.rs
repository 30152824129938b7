use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use pianoroom_core::time_format::{format_countdown, parse_target_time};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::dom::Element;

pub const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

/// Re-renders the time left until a target as `HH:MM:SS`, once per second.
#[derive(Clone)]
pub struct CountdownWidget {
    element: Element,
    target: DateTime<Utc>,
    clock: Arc<dyn Clock>,
}

impl CountdownWidget {
    pub fn new(element: Element, target: DateTime<Utc>, clock: Arc<dyn Clock>) -> Self {
        Self {
            element,
            target,
            clock,
        }
    }

    /// Builds the widget from the element's `data-target-time` attribute.
    ///
    /// Returns `None` when the attribute is missing or cannot be parsed.
    pub fn from_element(element: Element, clock: Arc<dyn Clock>) -> Option<Self> {
        let raw = element.data("target-time").filter(|raw| !raw.is_empty())?;
        match parse_target_time(&raw) {
            Some(target) => Some(Self::new(element, target, clock)),
            None => {
                warn!(target = %raw, "Unparseable countdown target, countdown disabled");
                None
            }
        }
    }

    pub fn target(&self) -> DateTime<Utc> {
        self.target
    }

    /// Renders the current remaining time and returns the rendered text.
    pub fn render(&self) -> String {
        let text = format_countdown(self.target - self.clock.now());
        self.element.set_text_content(&text);
        text
    }

    /// Renders immediately, then keeps rendering every [`COUNTDOWN_TICK`] until
    /// the returned task is aborted.
    ///
    /// Outside of a Tokio runtime only the immediate render happens.
    pub fn start(self) -> Option<JoinHandle<()>> {
        self.render();

        let runtime = match Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!("No async runtime available, countdown will not tick");
                return None;
            }
        };

        Some(runtime.spawn(async move {
            let mut ticks = interval_at(Instant::now() + COUNTDOWN_TICK, COUNTDOWN_TICK);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticks.tick().await;
                let text = self.render();
                debug!(countdown = %text, "Countdown tick");
            }
        }))
    }
}
