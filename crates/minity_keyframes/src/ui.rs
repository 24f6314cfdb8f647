// SPDX-License-Identifier: MIT OR Apache-2.0
//! Viewer UI panels.
//!
//! Features:
//! - Animation controls (explosion, key frames, timeline scrubbing, speed)
//! - Model settings (shading, lighting, reflection / refraction, parts)
//!
//! Buttons and the timeline slider queue [`ViewerCommand`]s on the session;
//! they take effect on the next [`AnimationSession::frame`].

use crate::explosion::MeshPart;
use crate::playback::MIN_AUTHORED_POSES;
use crate::session::{AnimationSession, ViewerCommand};
use crate::settings::{
    Medium, ResponseBlend, ShadingModel, SurfaceResponse, ViewerSettings, EXPLOSION_RANGE,
    LIGHT_OFFSET_RANGE, REFRACTIVE_INDEX_RANGE, STEP_RANGE,
};
use crate::timeline::PoseSequence;
use glam::Vec4;

/// Widget interactions gathered during one panel pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct PanelActions {
    cursor: Option<f32>,
    step: Option<f32>,
    add_pose: bool,
    remove_pose: bool,
    toggle_play: bool,
}

impl PanelActions {
    /// Commands in the order the widgets appear
    fn commands(&self) -> Vec<ViewerCommand> {
        let mut commands = Vec::new();
        if let Some(value) = self.cursor {
            commands.push(ViewerCommand::SetCursor(value));
        }
        if let Some(step) = self.step {
            commands.push(ViewerCommand::SetStep(step));
        }
        if self.add_pose {
            commands.push(ViewerCommand::AddPose);
        }
        if self.remove_pose {
            commands.push(ViewerCommand::RemovePose);
        }
        if self.toggle_play {
            commands.push(ViewerCommand::TogglePlay);
        }
        commands
    }
}

/// "Animations" panel
#[derive(Debug, Default)]
pub struct AnimationPanel;

impl AnimationPanel {
    /// Create a new animation panel
    pub fn new() -> Self {
        Self
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui, session: &mut AnimationSession) {
        let actions = self.controls(ui, session);
        for command in actions.commands() {
            session.queue(command);
        }
    }

    fn controls(&mut self, ui: &mut egui::Ui, session: &mut AnimationSession) -> PanelActions {
        let mut actions = PanelActions::default();
        ui.heading("Animations");

        let animation = &mut session.settings_mut().animation;
        ui.add(egui::Slider::new(&mut animation.explosion, EXPLOSION_RANGE).text("Explosion"));
        ui.checkbox(&mut animation.camera_explosion, "Camera explosion");

        ui.separator();

        // Timeline
        let segments = session.timeline().segment_count() as f32;
        let mut cursor = session.cursor();
        let response = ui.add_enabled(
            timeline_enabled(session),
            egui::Slider::new(&mut cursor, 0.0..=segments).text("Timeline"),
        );
        if response.changed() {
            actions.cursor = Some(cursor);
        }

        let mut step = session.settings().animation.step;
        if ui
            .add(egui::Slider::new(&mut step, STEP_RANGE).text("Speed"))
            .changed()
        {
            actions.step = Some(step);
        }

        ui.horizontal(|ui| {
            actions.add_pose = ui.button("Add").on_hover_text("Add key frame (A)").clicked();
            actions.remove_pose = ui
                .button("Remove")
                .on_hover_text("Remove last key frame (M)")
                .clicked();

            let play_label = if session.is_playing() { "Stop" } else { "Play" };
            actions.toggle_play = ui.button(play_label).on_hover_text("Play/Stop (P)").clicked();
        });

        ui.label(status_text(session));
        actions
    }
}

/// The timeline slider is live once at least one window exists
fn timeline_enabled(session: &AnimationSession) -> bool {
    session.timeline().segment_count() > 0
}

fn status_text(session: &AnimationSession) -> String {
    if session.is_playing() {
        "Animation is playing: press P to stop".to_string()
    } else if session.can_play() {
        format!("{} key frames stored: press P to play", session.len())
    } else {
        format!(
            "{} key frames stored: need at least {} key frames to play animation",
            session.len(),
            MIN_AUTHORED_POSES
        )
    }
}

/// Model settings panel
#[derive(Debug, Clone)]
pub struct ModelPanel {
    /// Medium the refracted ray leaves
    pub from_medium: Medium,
    /// Medium the refracted ray enters
    pub to_medium: Medium,
}

impl ModelPanel {
    /// Create a new model panel
    pub fn new() -> Self {
        Self {
            from_medium: Medium::Air,
            to_medium: Medium::Water,
        }
    }

    /// Render the panel
    pub fn ui(&mut self, ui: &mut egui::Ui, settings: &mut ViewerSettings, parts: &[MeshPart]) {
        ui.heading("Model");

        ui.collapsing("Shading", |ui| shading_ui(ui, settings));
        ui.collapsing("Lighting", |ui| lighting_ui(ui, settings));
        ui.collapsing("Reflection / Refraction", |ui| self.optics_ui(ui, settings));

        if !parts.is_empty() {
            settings.sync_part_count(parts.len());
            ui.collapsing("Parts", |ui| {
                for (part, visible) in parts.iter().zip(settings.part_visible.iter_mut()) {
                    ui.checkbox(visible, part.name.as_str());
                }
            });
        }
    }

    fn optics_ui(&mut self, ui: &mut egui::Ui, settings: &mut ViewerSettings) {
        let optics = &mut settings.optics;

        ui.horizontal(|ui| {
            ui.radio_value(&mut optics.response, SurfaceResponse::None, "None");
            ui.radio_value(&mut optics.response, SurfaceResponse::Reflection, "Reflection");
            ui.radio_value(&mut optics.response, SurfaceResponse::Refraction, "Refraction");
        });

        if optics.response == SurfaceResponse::None {
            return;
        }

        ui.horizontal(|ui| {
            ui.radio_value(&mut optics.blend, ResponseBlend::Shaded, "Shaded");
            ui.radio_value(&mut optics.blend, ResponseBlend::Only, "Only");
            ui.radio_value(&mut optics.blend, ResponseBlend::Ambient, "Ambient");
        });

        if optics.response == SurfaceResponse::Refraction {
            let mut media_changed = medium_combo(ui, "From", &mut self.from_medium);
            media_changed |= medium_combo(ui, "To", &mut self.to_medium);
            if media_changed {
                optics.set_media(self.from_medium, self.to_medium);
            }

            ui.add(egui::Slider::new(&mut optics.n1, REFRACTIVE_INDEX_RANGE).text("n1"));
            ui.add(egui::Slider::new(&mut optics.n2, REFRACTIVE_INDEX_RANGE).text("n2"));
            ui.label(format!("Ratio: {:.3}", optics.refraction_ratio()));
        }
    }
}

impl Default for ModelPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn shading_ui(ui: &mut egui::Ui, settings: &mut ViewerSettings) {
    let shading = &mut settings.shading;

    ui.checkbox(&mut shading.wireframe, "Wireframe");
    if shading.wireframe {
        color_edit(ui, "Line color", &mut shading.wireframe_color);
    }
    ui.checkbox(&mut shading.light_source, "Light source");

    for model in [ShadingModel::BlinnPhong, ShadingModel::Toon] {
        ui.radio_value(&mut shading.model, model, model.display_name());
    }

    ui.checkbox(&mut shading.bump_mapping, "Procedural bump mapping");
    if shading.bump_mapping {
        ui.add(egui::Slider::new(&mut shading.bump_amplitude, 0.0..=0.01).text("Amplitude"));
        ui.add(egui::Slider::new(&mut shading.bump_frequency, 1.0..=500.0).text("Frequency"));
    }
}

fn lighting_ui(ui: &mut egui::Ui, settings: &mut ViewerSettings) {
    let lighting = &mut settings.lighting;

    color_edit(ui, "Ambient", &mut lighting.ambient_color);
    ui.add(egui::Slider::new(&mut lighting.ambient_intensity, 0.0..=1.0).text("Ambient intensity"));
    color_edit(ui, "Diffuse", &mut lighting.diffuse_color);
    ui.add(egui::Slider::new(&mut lighting.diffuse_intensity, 0.0..=1.0).text("Diffuse intensity"));
    color_edit(ui, "Specular", &mut lighting.specular_color);
    ui.add(egui::Slider::new(&mut lighting.specular_intensity, 0.0..=1.0).text("Specular intensity"));
    ui.add(egui::Slider::new(&mut lighting.shininess, 1.0..=256.0).text("Shininess"));

    ui.checkbox(&mut lighting.manual_light, "Manual light position");
    if lighting.manual_light {
        ui.add(egui::Slider::new(&mut lighting.light_offset.x, LIGHT_OFFSET_RANGE).text("x"));
        ui.add(egui::Slider::new(&mut lighting.light_offset.y, LIGHT_OFFSET_RANGE).text("y"));
        ui.add(egui::Slider::new(&mut lighting.light_offset.z, LIGHT_OFFSET_RANGE).text("z"));
    }
}

fn color_edit(ui: &mut egui::Ui, label: &str, color: &mut Vec4) {
    ui.horizontal(|ui| {
        let mut rgba = color.to_array();
        if ui.color_edit_button_rgba_unmultiplied(&mut rgba).changed() {
            *color = Vec4::from_array(rgba);
        }
        ui.label(label);
    });
}

fn medium_combo(ui: &mut egui::Ui, label: &str, medium: &mut Medium) -> bool {
    let before = *medium;
    egui::ComboBox::from_label(label)
        .selected_text(medium.display_name())
        .show_ui(ui, |ui| {
            for candidate in Medium::all() {
                ui.selectable_value(medium, *candidate, candidate.display_name());
            }
        });
    *medium != before
}
