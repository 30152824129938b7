use pianoroom_core::time_format::to_compact_time;

use crate::dom::{Element, EventKind};

/// Mirrors a time picker (`HH:MM`) into a hidden field in compact `HHMM` form.
///
/// No range validation is done. An empty picker value leaves the hidden field
/// untouched.
#[derive(Debug, Clone)]
pub struct TimeInputSync {
    input: Element,
    hidden: Element,
}

impl TimeInputSync {
    pub fn new(input: Element, hidden: Element) -> Self {
        Self { input, hidden }
    }

    /// Copies the picker's current value, if any, into the hidden field.
    pub fn sync(&self) {
        sync(&self.input, &self.hidden);
    }

    /// Registers the change listener on the picker.
    pub fn bind(self) {
        let hidden = self.hidden;
        self.input
            .add_event_listener(EventKind::Change, move |input, _| sync(input, &hidden));
    }
}

fn sync(input: &Element, hidden: &Element) {
    let value = input.value();
    if !value.is_empty() {
        hidden.set_value(&to_compact_time(&value));
    }
}
