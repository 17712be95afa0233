mod credential_dialog;
mod flag_toggle;
mod toast;

pub use credential_dialog::credential_dialog;
pub use flag_toggle::{flag_label, flag_toggle};
pub use toast::{TOAST_SECONDS, toast_area};
