//! # Pad Editor
//!
//! The drag surface. Pointer drags on the square pad become [`PadEvent`]s
//! for the audio thread, and the same clamped position is written to the
//! Pad X / Pad Y params so the host sees the movement too.
//!
//! The editor never touches the engine. What it draws comes back from the
//! audio thread through [`PadDisplay`]: the puck position, the recording
//! flag and the two polarity lights.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use nih_plug::prelude::*;
use nih_plug_egui::egui::{self, Color32, Pos2, Rect};
use nih_plug_egui::{create_egui_editor, widgets};

use crate::pad::{PadEvent, PadEventSender, PadOutput, PadPoint};
use crate::params::PluginParams;

const PAD_SIZE: f32 = 230.0;
const PUCK_RADIUS: f32 = 8.0;

const PAD_BACKGROUND: Color32 = Color32::from_rgb(24, 24, 28);
const PUCK_COLOR: Color32 = Color32::from_rgb(247, 215, 62);
const LIGHT_ON: Color32 = Color32::from_rgb(240, 240, 240);
const LIGHT_OFF: Color32 = Color32::from_rgb(60, 60, 60);

/// State published by the audio thread once per block.
#[derive(Default)]
pub struct PadDisplay {
    x: AtomicU32,
    y: AtomicU32,
    recording: AtomicBool,
    x_bipolar: AtomicBool,
    y_bipolar: AtomicBool,
}

impl PadDisplay {
    pub fn publish(&self, output: &PadOutput, recording: bool) {
        self.x.store(output.point.x.to_bits(), Ordering::Relaxed);
        self.y.store(output.point.y.to_bits(), Ordering::Relaxed);
        self.recording.store(recording, Ordering::Relaxed);
        self.x_bipolar.store(output.x_bipolar_light, Ordering::Relaxed);
        self.y_bipolar.store(output.y_bipolar_light, Ordering::Relaxed);
    }

    pub fn puck(&self) -> PadPoint {
        PadPoint::clamped(
            f32::from_bits(self.x.load(Ordering::Relaxed)),
            f32::from_bits(self.y.load(Ordering::Relaxed)),
        )
    }

    pub fn is_recording(&self) -> bool {
        self.recording.load(Ordering::Relaxed)
    }

    pub fn lights(&self) -> (bool, bool) {
        (
            self.x_bipolar.load(Ordering::Relaxed),
            self.y_bipolar.load(Ordering::Relaxed),
        )
    }
}

/// Per-editor drag tracking.
///
/// A drag normally ends when the pointer is released. If the window closes
/// first, no release ever arrives, so the drag is ended when the window
/// opens again or when the editor itself is dropped.
struct DragState {
    sender: Arc<Mutex<PadEventSender>>,
    active: bool,
    /// Last pointer position sent, so a resting pointer adds no points.
    last_pos: Option<Pos2>,
    /// Clamped position of the current drag, drawn as the puck.
    point: PadPoint,
}

impl DragState {
    fn new(sender: Arc<Mutex<PadEventSender>>) -> Self {
        Self {
            sender,
            active: false,
            last_pos: None,
            point: PadPoint::default(),
        }
    }

    fn begin(&mut self) {
        send(&self.sender, PadEvent::BeginRecording);
        self.active = true;
        self.last_pos = None;
    }

    fn capture(&mut self, x: f32, y: f32) {
        self.point = PadPoint::clamped(x, y);
        send(&self.sender, PadEvent::Capture { x, y });
    }

    /// End the drag in progress. Returns false when there was none.
    fn end(&mut self) -> bool {
        if !self.active {
            return false;
        }
        send(&self.sender, PadEvent::EndRecording);
        self.active = false;
        true
    }
}

impl Drop for DragState {
    fn drop(&mut self) {
        self.end();
    }
}

pub(crate) fn create(
    params: Arc<PluginParams>,
    display: Arc<PadDisplay>,
    sender: Arc<Mutex<PadEventSender>>,
) -> Option<Box<dyn Editor>> {
    create_egui_editor(
        params.editor_state.clone(),
        DragState::new(sender),
        // The param gestures of a drag cut short by closing the window are
        // lost with its setter; the engine still gets its EndRecording.
        |_, drag| {
            drag.end();
        },
        move |egui_ctx, setter, drag| {
            egui::CentralPanel::default().show(egui_ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Direction");
                    ui.add(widgets::ParamSlider::for_param(&params.direction, setter));
                });
                ui.horizontal(|ui| {
                    ui.label("Speed");
                    ui.add(widgets::ParamSlider::for_param(&params.speed, setter));
                });

                trackpad(ui, &params, setter, &display, drag);

                let (x_light, y_light) = display.lights();
                ui.horizontal(|ui| {
                    light(ui, x_light);
                    ui.add(widgets::ParamSlider::for_param(&params.x_polarity, setter));
                    light(ui, y_light);
                    ui.add(widgets::ParamSlider::for_param(&params.y_polarity, setter));
                });
                ui.horizontal(|ui| {
                    ui.label("X");
                    ui.add(widgets::ParamSlider::for_param(&params.x_attenuation, setter));
                });
                ui.horizontal(|ui| {
                    ui.label("Y");
                    ui.add(widgets::ParamSlider::for_param(&params.y_attenuation, setter));
                });
            });

            // The puck moves during playback without any input events.
            egui_ctx.request_repaint();
        },
    )
}

fn trackpad(
    ui: &mut egui::Ui,
    params: &PluginParams,
    setter: &ParamSetter,
    display: &PadDisplay,
    drag: &mut DragState,
) {
    let side = ui.available_width().min(PAD_SIZE);
    let (response, painter) = ui.allocate_painter(egui::vec2(side, side), egui::Sense::drag());
    let rect = response.rect;

    if response.drag_started() {
        setter.begin_set_parameter(&params.pad_x);
        setter.begin_set_parameter(&params.pad_y);
        drag.begin();
    }

    if drag.active {
        if let Some(pos) = response.interact_pointer_pos() {
            if drag.last_pos != Some(pos) {
                drag.last_pos = Some(pos);
                let (x, y) = normalize(rect, pos);
                drag.capture(x, y);
                setter.set_parameter(&params.pad_x, drag.point.x);
                setter.set_parameter(&params.pad_y, drag.point.y);
            }
        }

        if !response.dragged() && drag.end() {
            setter.end_set_parameter(&params.pad_x);
            setter.end_set_parameter(&params.pad_y);
        }
    }

    let puck = if drag.active || display.is_recording() {
        drag.point
    } else {
        display.puck()
    };

    painter.rect_filled(rect, 4.0, PAD_BACKGROUND);
    painter.circle_filled(to_screen(rect, puck), PUCK_RADIUS, PUCK_COLOR);
}

fn light(ui: &mut egui::Ui, on: bool) {
    let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), egui::Sense::hover());
    let color = if on { LIGHT_ON } else { LIGHT_OFF };
    ui.painter().circle_filled(rect.center(), 5.0, color);
}

fn send(sender: &Mutex<PadEventSender>, event: PadEvent) {
    let Ok(mut sender) = sender.lock() else {
        return;
    };
    if let Err(err) = sender.send(event) {
        nih_log!("{err}");
    }
}

/// Pointer position to pad coordinates, y pointing up. Not clamped.
fn normalize(rect: Rect, pos: Pos2) -> (f32, f32) {
    (
        (pos.x - rect.left()) / rect.width(),
        (rect.bottom() - pos.y) / rect.height(),
    )
}

fn to_screen(rect: Rect, point: PadPoint) -> Pos2 {
    egui::pos2(
        rect.left() + point.x * rect.width(),
        rect.bottom() - point.y * rect.height(),
    )
}

// ─────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pad::{pad_event_queue, PadEventReceiver};

    fn drag_state() -> (DragState, PadEventReceiver) {
        let (tx, rx) = pad_event_queue(16);
        (DragState::new(Arc::new(Mutex::new(tx))), rx)
    }

    fn received(rx: &mut PadEventReceiver) -> Vec<PadEvent> {
        let mut events = Vec::new();
        rx.drain(|event| events.push(event));
        events
    }

    fn pad_rect() -> Rect {
        Rect::from_min_size(egui::pos2(10.0, 20.0), egui::vec2(100.0, 100.0))
    }

    #[test]
    fn test_normalize_flips_y() {
        let rect = pad_rect();
        assert_eq!(normalize(rect, egui::pos2(10.0, 120.0)), (0.0, 0.0));
        assert_eq!(normalize(rect, egui::pos2(110.0, 20.0)), (1.0, 1.0));
        assert_eq!(normalize(rect, egui::pos2(35.0, 95.0)), (0.25, 0.25));
    }

    /// Dragging off the pad yields out-of-range coordinates; clamping is
    /// left to the engine.
    #[test]
    fn test_normalize_outside_pad() {
        let (x, y) = normalize(pad_rect(), egui::pos2(-90.0, 220.0));
        assert_eq!((x, y), (-1.0, -1.0));
    }

    #[test]
    fn test_to_screen_inverts_normalize() {
        let rect = pad_rect();
        let pos = to_screen(rect, PadPoint::clamped(0.25, 0.75));
        assert_eq!(pos, egui::pos2(35.0, 45.0));
        assert_eq!(normalize(rect, pos), (0.25, 0.75));
    }

    #[test]
    fn test_display_publish() {
        let display = PadDisplay::default();
        let output = PadOutput {
            x_bipolar_light: true,
            point: PadPoint::clamped(0.3, 0.6),
            ..PadOutput::default()
        };

        display.publish(&output, false);

        assert_eq!(display.puck(), PadPoint::clamped(0.3, 0.6));
        assert_eq!(display.lights(), (true, false));
        assert!(!display.is_recording());
    }

    #[test]
    fn test_drag_sends_begin_capture_end() {
        let (mut drag, mut rx) = drag_state();

        drag.begin();
        drag.capture(1.5, 0.25);
        assert!(drag.end());

        assert_eq!(
            received(&mut rx),
            vec![
                PadEvent::BeginRecording,
                // The raw position goes out; the engine clamps it.
                PadEvent::Capture { x: 1.5, y: 0.25 },
                PadEvent::EndRecording,
            ]
        );
        // The puck is drawn from the clamped point.
        assert_eq!(drag.point, PadPoint { x: 1.0, y: 0.25 });
    }

    /// Only an active drag is ended, so a second end sends nothing.
    #[test]
    fn test_end_without_drag_sends_nothing() {
        let (mut drag, mut rx) = drag_state();
        assert!(!drag.end());

        drag.begin();
        assert!(drag.end());
        assert!(!drag.end());

        assert_eq!(
            received(&mut rx),
            vec![PadEvent::BeginRecording, PadEvent::EndRecording]
        );
    }

    /// Tearing down the editor mid-drag still finishes the recording.
    #[test]
    fn test_drop_mid_drag_ends_recording() {
        let (mut drag, mut rx) = drag_state();
        drag.begin();
        drag.capture(0.5, 0.5);

        drop(drag);

        let events = received(&mut rx);
        assert_eq!(events.last(), Some(&PadEvent::EndRecording));
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_drop_when_idle_sends_nothing() {
        let (drag, mut rx) = drag_state();
        drop(drag);
        assert!(rx.is_empty());
    }
}
