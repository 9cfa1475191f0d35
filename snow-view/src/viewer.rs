//! Snowflake viewer built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns the [`Simulation`] and
//! implements [`eframe::App`]. Each repaint acts as the frame clock: while
//! running, it ticks the simulation, repaints the lattice into a texture and
//! requests the next frame. Once the frame budget is spent the last picture
//! stays on screen and no more repaints are requested.

use std::time::Duration;

use eframe::App;
use rand::rngs::StdRng;
use snow_core::{Channel, Simulation, TickStatus};

use crate::osc::OscListener;

/// Repaint cadence while paused, so remote tint changes still show.
const RETINT_POLL: Duration = Duration::from_millis(100);

/// Main application state for the viewer.
///
/// ### Fields
/// - `sim` - The growth simulation and its shared tint.
/// - `pixels` - RGBA buffer the lattice is painted into.
/// - `texture` - GPU copy of `pixels`, created on first paint.
/// - `dirty` - `pixels` changed since the last texture upload.
/// - `painted_rgb` - Tint used for the current `pixels`.
/// - `osc` - Network color listener, if enabled.
///
/// - `running` - Whether the simulation auto-advances.
/// - `step_interval` - Target seconds between automatic ticks.
/// - `last_step_time` - egui time of the last tick.
pub struct Viewer {
    sim: Simulation<StdRng>,
    pixels: Vec<u8>,
    texture: Option<egui::TextureHandle>,
    dirty: bool,
    painted_rgb: [u8; 3],
    osc: Option<OscListener>,

    running: bool,
    step_interval: f64,
    last_step_time: f64,
}

impl Viewer {
    /// Creates a viewer around a freshly seeded simulation.
    ///
    /// The seed band is painted immediately so the first frame is not blank.
    pub fn new(sim: Simulation<StdRng>, osc: Option<OscListener>) -> Self {
        let lattice = sim.lattice();
        let mut pixels = vec![0u8; lattice.width() * lattice.height() * 4];
        sim.render_rgba(&mut pixels);
        let painted_rgb = sim.color().rgb();

        Self {
            sim,
            pixels,
            texture: None,
            dirty: true,
            painted_rgb,
            osc,
            running: true,
            step_interval: 1.0 / 60.0,
            last_step_time: 0.0,
        }
    }

    /// Advances the simulation by one frame and repaints the pixel buffer.
    ///
    /// The halting tick still grows, so its result is painted once. After
    /// that the buffer is left as it was and the last frame stays displayed.
    fn step_once(&mut self) -> TickStatus {
        if self.sim.is_halted() {
            return TickStatus::Stopped;
        }

        let status = self.sim.tick();
        self.repaint_pixels();
        if status == TickStatus::Stopped {
            self.running = false;
        }
        status
    }

    fn repaint_pixels(&mut self) {
        self.sim.render_rgba(&mut self.pixels);
        self.painted_rgb = self.sim.color().rgb();
        self.dirty = true;
    }

    /// Largest rect with the lattice's aspect ratio centered in `avail`.
    fn fit_rect(&self, avail: egui::Rect) -> egui::Rect {
        let lattice = self.sim.lattice();
        let (w, h) = (lattice.width() as f32, lattice.height() as f32);
        let scale = (avail.width() / w).min(avail.height() / h).max(0.0);
        egui::Rect::from_center_size(avail.center(), egui::vec2(w * scale, h * scale))
    }

    fn upload_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let lattice = self.sim.lattice();
        let size = [lattice.width(), lattice.height()];

        let texture = self.texture.get_or_insert_with(|| {
            ctx.load_texture(
                "snowflake",
                egui::ColorImage::from_rgba_unmultiplied(size, &self.pixels),
                egui::TextureOptions::NEAREST,
            )
        });
        if self.dirty {
            texture.set(
                egui::ColorImage::from_rgba_unmultiplied(size, &self.pixels),
                egui::TextureOptions::NEAREST,
            );
            self.dirty = false;
        }
        texture.id()
    }

    /// Builds the top panel UI (run controls, stepping, pacing).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let halted = self.sim.is_halted();

                ui.add_enabled_ui(!halted, |ui| {
                    if ui
                        .button(if self.running { "⏸ Pause" } else { "▶ Run" })
                        .clicked()
                    {
                        self.running = !self.running;
                    }

                    if ui.button("Step").clicked() {
                        self.step_once();
                        self.last_step_time = ctx.input(|i| i.time);
                    }
                });

                ui.add(
                    egui::DragValue::new(&mut self.step_interval)
                        .prefix("dt target = ")
                        .range(0.0..=1.0)
                        .speed(0.005),
                );

                if halted {
                    ui.separator();
                    ui.label("growth finished");
                }
            });
        });
    }

    /// Builds the bottom status bar (frame, crystal size, tint).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let [r, g, b] = self.sim.color().rgb();
                ui.label(format!("rgb = ({r}, {g}, {b})"));
                ui.separator();
                ui.label(format!(
                    "crystal cells = {}",
                    self.sim.lattice().occupied_count()
                ));
                ui.label(format!(
                    "frame = {} / {}",
                    self.sim.frame().min(self.sim.config().max_frames),
                    self.sim.config().max_frames
                ));
            });
        });
    }

    /// Builds the side panel with local color controls and OSC info.
    fn ui_color_panel(&self, ctx: &egui::Context) {
        egui::SidePanel::right("color_panel")
            .resizable(false)
            .default_width(200.0)
            .show(ctx, |ui| {
                ui.heading("Color");
                ui.separator();

                let color = self.sim.color();
                for (channel, label) in [
                    (Channel::Red, "red"),
                    (Channel::Green, "green"),
                    (Channel::Blue, "blue"),
                ] {
                    let mut value = color.channel(channel) as f32 / 255.0;
                    if ui
                        .add(egui::Slider::new(&mut value, 0.0..=1.0).text(label))
                        .changed()
                    {
                        color.set_channel(channel, value);
                    }
                }

                if let Some(osc) = &self.osc {
                    ui.separator();
                    ui.label("OSC input");
                    ui.label(format!("listening on {}", osc.local_addr()));
                    let mut show = osc.is_showing_messages();
                    if ui.checkbox(&mut show, "log messages").changed() {
                        if show {
                            osc.show_messages();
                        } else {
                            osc.hide_messages();
                        }
                    }
                }
            });
    }

    /// Builds the central panel showing the lattice and drives the frame clock.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        if self.running && !self.sim.is_halted() {
            let now = ctx.input(|i| i.time);
            if now - self.last_step_time >= self.step_interval {
                self.step_once();
                self.last_step_time = now;
            }
        }

        // Retint while paused; a halted run keeps its last picture.
        if !self.sim.is_halted() && self.sim.color().rgb() != self.painted_rgb {
            self.repaint_pixels();
        }

        let texture = self.upload_texture(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(egui::Color32::BLACK))
            .show(ctx, |ui| {
                let rect = self.fit_rect(ui.max_rect());
                let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
                ui.painter()
                    .image(texture, rect, uv, egui::Color32::WHITE);
            });

        if self.sim.is_halted() {
            return;
        }
        if self.running {
            ctx.request_repaint();
        } else {
            // Pick up network color changes while paused.
            ctx.request_repaint_after(RETINT_POLL);
        }
    }
}

impl App for Viewer {
    /// eframe callback, one call per displayed frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_color_panel(ctx);
        self.ui_central_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use snow_core::{ColorState, Config};

    fn test_viewer(max_frames: u32) -> Viewer {
        let cfg = Config {
            width: 48,
            height: 32,
            max_frames,
            seed_probability: 1.0,
            ..Config::default()
        };
        let sim = Simulation::with_color(
            cfg,
            StdRng::seed_from_u64(8),
            ColorState::from_rgb([255, 0, 0]),
        )
        .unwrap();
        Viewer::new(sim, None)
    }

    fn red_pixels(viewer: &Viewer) -> usize {
        viewer
            .pixels
            .chunks_exact(4)
            .filter(|px| *px == [255u8, 0, 0, 255])
            .count()
    }

    #[test]
    fn new_viewer_paints_the_seed_band() {
        let viewer = test_viewer(10);
        assert_eq!(viewer.pixels.len(), 48 * 32 * 4);
        assert!(viewer.dirty);
        assert!(viewer.running);
        assert_eq!(red_pixels(&viewer), viewer.sim.lattice().occupied_count());
        assert!(red_pixels(&viewer) > 0);
    }

    #[test]
    fn step_once_advances_and_repaints() {
        let mut viewer = test_viewer(10);
        viewer.dirty = false;

        assert_eq!(viewer.step_once(), TickStatus::Running);
        assert_eq!(viewer.sim.frame(), 1);
        assert!(viewer.dirty);
        assert_eq!(red_pixels(&viewer), viewer.sim.lattice().occupied_count());
    }

    #[test]
    fn halting_freezes_the_picture() {
        let mut viewer = test_viewer(2);
        assert_eq!(viewer.step_once(), TickStatus::Running);
        assert_eq!(viewer.step_once(), TickStatus::Running);

        viewer.dirty = false;

        // The halting tick grows and is painted one last time.
        assert_eq!(viewer.step_once(), TickStatus::Stopped);
        assert!(!viewer.running);
        assert!(viewer.dirty);
        assert_eq!(red_pixels(&viewer), viewer.sim.lattice().occupied_count());

        let frozen = viewer.pixels.clone();
        viewer.dirty = false;
        viewer.sim.color().set_green(1.0);

        assert_eq!(viewer.step_once(), TickStatus::Stopped);
        assert!(!viewer.dirty);
        assert_eq!(viewer.pixels, frozen);
        assert_eq!(viewer.sim.frame(), 3);
    }

    #[test]
    fn fit_rect_keeps_aspect_and_centers() {
        let viewer = test_viewer(1);
        let avail = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(480.0, 480.0));

        let rect = viewer.fit_rect(avail);

        assert!((rect.width() - 480.0).abs() < 1e-3);
        assert!((rect.height() - 320.0).abs() < 1e-3);
        assert_eq!(rect.center(), avail.center());
    }
}
