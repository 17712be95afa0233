//! Email and password change dialog.
//!
//! Renders whichever step the controller is in. Validation and network outcomes are
//! reported through notifications, so the widget only logs refused submissions.

use backoffice_business::{CredentialChangeController, CredentialState, ReauthMode};
use egui::{Response, RichText, Ui};
use log::debug;

use crate::utils::colors::{COLOR_GREEN, COLOR_RED};

pub fn credential_dialog(ui: &mut Ui, controller: &mut CredentialChangeController) -> Response {
    controller.poll();
    if controller.is_loading() {
        ui.ctx().request_repaint();
    }

    ui.vertical(|ui| {
        ui.label(format!("Current email: {}", controller.current_email()));
        ui.add_space(8.0);

        match controller.state() {
            CredentialState::CollectingEmail => show_email_step(ui, controller),
            CredentialState::CollectingPassword => show_password_step(ui, controller),
            CredentialState::PasswordFailed => show_failed(ui, controller),
            CredentialState::Complete => show_complete(ui, controller),
        }
    })
    .response
}

fn show_email_step(ui: &mut Ui, controller: &mut CredentialChangeController) {
    let loading = controller.is_loading();

    ui.horizontal(|ui| {
        ui.label("New email:");
        ui.add_enabled(
            !loading,
            egui::TextEdit::singleline(&mut controller.input_mut().candidate_email),
        );
    });
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!loading, egui::Button::new("Register email"))
            .clicked()
        {
            let candidate = controller.input().candidate_email.clone();
            if let Err(err) = controller.submit_email(candidate) {
                debug!("credential_dialog: email submission refused: {err}");
            }
        }
        if loading {
            ui.spinner();
        }
    });
}

fn show_password_step(ui: &mut Ui, controller: &mut CredentialChangeController) {
    let loading = controller.is_loading();

    egui::Grid::new("credential_password_fields")
        .num_columns(2)
        .show(ui, |ui| {
            if controller.reauth_mode() == ReauthMode::CurrentPassword {
                ui.label("Current password:");
                ui.add_enabled(
                    !loading,
                    egui::TextEdit::singleline(&mut controller.input_mut().current_password)
                        .password(true),
                );
                ui.end_row();
            }

            ui.label("New password:");
            ui.add_enabled(
                !loading,
                egui::TextEdit::singleline(&mut controller.input_mut().candidate_password)
                    .password(true),
            );
            ui.end_row();

            ui.label("Confirm password:");
            ui.add_enabled(
                !loading,
                egui::TextEdit::singleline(
                    &mut controller.input_mut().candidate_password_confirm,
                )
                .password(true),
            );
            ui.end_row();
        });
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!loading, egui::Button::new("Update password"))
            .clicked()
        {
            let input = controller.input();
            let (password, confirm) = (
                input.candidate_password.clone(),
                input.candidate_password_confirm.clone(),
            );
            if let Err(err) = controller.submit_password(password, confirm) {
                debug!("credential_dialog: password submission refused: {err}");
            }
        }
        if loading {
            ui.spinner();
        }
    });
}

fn show_failed(ui: &mut Ui, controller: &CredentialChangeController) {
    if let Some(message) = controller.status_message() {
        ui.colored_label(COLOR_RED, message);
    }
    ui.add_space(8.0);
    ui.label(format!(
        "A password reset email has been sent to {}. Follow the link in it to set a new password.",
        controller.input().candidate_email
    ));
}

fn show_complete(ui: &mut Ui, controller: &CredentialChangeController) {
    if let Some(message) = controller.status_message() {
        ui.label(RichText::new(message).color(COLOR_GREEN));
    }
    ui.add_space(8.0);
    for link in controller.link_list().unwrap_or_default() {
        ui.hyperlink_to(link.text, link.link);
    }
}
