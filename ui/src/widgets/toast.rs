//! Transient notifications.
//!
//! Notifications are drained from the [`NotificationCenter`] every frame and kept in
//! egui's temporary memory until they expire.

use std::time::Duration;

use backoffice_business::{Notification, NotificationCenter, NotificationPosition};
use egui::{Align2, Context, Id, Order, Vec2};

use crate::utils::colors::status_color;

/// How long a toast stays on screen.
pub const TOAST_SECONDS: f64 = 4.0;

#[derive(Clone)]
struct Toast {
    notification: Notification,
    expires_at: f64,
}

fn toasts_id() -> Id {
    Id::new("backoffice_toasts")
}

pub fn toast_area(ctx: &Context, center: &mut NotificationCenter) {
    let now = ctx.input(|i| i.time);
    let mut toasts: Vec<Toast> = ctx
        .data_mut(|d| d.get_temp(toasts_id()))
        .unwrap_or_default();

    toasts.extend(center.drain().into_iter().map(|notification| Toast {
        notification,
        expires_at: now + TOAST_SECONDS,
    }));
    toasts.retain(|toast| toast.expires_at > now);

    for (name, position, anchor, offset) in [
        (
            "bottom",
            NotificationPosition::Bottom,
            Align2::CENTER_BOTTOM,
            Vec2::new(0.0, -16.0),
        ),
        (
            "top_right",
            NotificationPosition::TopRight,
            Align2::RIGHT_TOP,
            Vec2::new(-16.0, 16.0),
        ),
    ] {
        let mut visible = toasts
            .iter()
            .filter(|toast| toast.notification.position.unwrap_or_default() == position)
            .peekable();
        if visible.peek().is_none() {
            continue;
        }

        egui::Area::new(toasts_id().with(name))
            .anchor(anchor, offset)
            .order(Order::Foreground)
            .show(ctx, |ui| {
                for toast in visible {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.colored_label(
                            status_color(toast.notification.status),
                            toast.notification.title.as_str(),
                        );
                    });
                }
            });
    }

    if !toasts.is_empty() {
        ctx.request_repaint_after(Duration::from_millis(250));
    }
    ctx.data_mut(|d| d.insert_temp(toasts_id(), toasts));
}

#[cfg(test)]
mod toast_tests {
    use super::*;

    fn frame_at(ctx: &Context, center: &mut NotificationCenter, time: f64) -> usize {
        let input = egui::RawInput {
            time: Some(time),
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| toast_area(ctx, &mut *center));
        ctx.data_mut(|d| d.get_temp::<Vec<Toast>>(toasts_id()))
            .map_or(0, |toasts| toasts.len())
    }

    #[test]
    fn test_toasts_expire() {
        let ctx = Context::default();
        let mut center = NotificationCenter::new();
        center.notifier().success("Saved");
        center.notifier().error("Failed");

        assert_eq!(frame_at(&ctx, &mut center, 0.0), 2);
        assert_eq!(frame_at(&ctx, &mut center, TOAST_SECONDS / 2.0), 2);
        assert_eq!(frame_at(&ctx, &mut center, TOAST_SECONDS + 1.0), 0);
    }

    #[test]
    fn test_new_toasts_join_visible_ones() {
        let ctx = Context::default();
        let mut center = NotificationCenter::new();
        center.notifier().warning("First");
        assert_eq!(frame_at(&ctx, &mut center, 0.0), 1);

        center.notifier().warning("Second");
        assert_eq!(frame_at(&ctx, &mut center, 1.0), 2);
        assert_eq!(frame_at(&ctx, &mut center, TOAST_SECONDS + 0.5), 1);
    }
}
