//! Checkbox bound to a [`FlagSync`].

use backoffice_business::{FlagKind, FlagSync};
use egui::{Response, Ui};
use log::debug;

pub fn flag_label(kind: FlagKind) -> &'static str {
    match kind {
        FlagKind::Checked => "Checked",
        FlagKind::Published => "Published",
        FlagKind::Paid => "Paid",
    }
}

/// Shows the displayed value and starts a toggle on click.
///
/// The checkbox is disabled while an update is in flight. Its value only changes once
/// the backend confirms.
pub fn flag_toggle(ui: &mut Ui, sync: &mut FlagSync) -> Response {
    if let Some(Err(err)) = sync.poll() {
        debug!("flag_toggle: {} rolled back: {err}", sync.flag().id);
    }

    let mut value = sync.displayed();
    let response = ui.add_enabled(
        !sync.is_pending(),
        egui::Checkbox::new(&mut value, flag_label(sync.kind())),
    );
    if let Some(Err(err)) = response.clicked().then(|| sync.toggle()) {
        debug!("flag_toggle: {err}");
    }

    if sync.is_pending() {
        ui.ctx().request_repaint();
    }
    response
}
