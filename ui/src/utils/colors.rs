//! Shared color constants for the UI.

use backoffice_business::NotificationStatus;
use egui::Color32;

/// Forest green color for success.
pub const COLOR_GREEN: Color32 = Color32::from_rgb(34, 139, 34);

/// Red color for errors and failed updates.
pub const COLOR_RED: Color32 = Color32::from_rgb(220, 53, 69);

/// Amber color for warnings.
pub const COLOR_AMBER: Color32 = Color32::from_rgb(255, 193, 7);

pub fn status_color(status: NotificationStatus) -> Color32 {
    match status {
        NotificationStatus::Success => COLOR_GREEN,
        NotificationStatus::Warning => COLOR_AMBER,
        NotificationStatus::Error => COLOR_RED,
    }
}
