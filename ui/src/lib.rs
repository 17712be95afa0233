//! egui front end for the back office: invoice flag controls and the account
//! credential dialog.

pub mod app;
pub mod state;
pub mod utils;
pub mod widgets;

pub use app::BackofficeApp;
