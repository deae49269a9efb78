use eframe::egui::{self, Color32, CornerRadius, Frame, Margin, Stroke};

#[derive(Debug, Clone)]
pub struct Theme {
    pub surface_0: Color32,
    pub surface_1: Color32,
    pub surface_2: Color32,
    pub accent_primary: Color32,
    pub accent_soft: Color32,
    pub celebrate: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub text_on_accent: Color32,
    pub border_subtle: Color32,
    pub user_bubble: Color32,
    pub model_bubble: Color32,
    pub spacing_8: f32,
    pub spacing_12: f32,
    pub spacing_16: f32,
    pub spacing_24: f32,
    pub radius_12: u8,
    pub section_title_size: f32,
    pub button_height: f32,
    pub section_min_rows: usize,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            surface_0: Color32::WHITE,
            surface_1: Color32::from_rgb(0xF8, 0xFA, 0xFC),
            surface_2: Color32::from_rgb(0xF1, 0xF5, 0xF9),
            accent_primary: Color32::from_rgb(0x4F, 0x46, 0xE5),
            accent_soft: Color32::from_rgb(0xEE, 0xF2, 0xFF),
            celebrate: Color32::from_rgb(0xFB, 0xBF, 0x24),
            text_primary: Color32::from_rgb(0x1E, 0x29, 0x3B),
            text_muted: Color32::from_rgb(0x94, 0xA3, 0xB8),
            text_on_accent: Color32::WHITE,
            border_subtle: Color32::from_rgb(0xE2, 0xE8, 0xF0),
            user_bubble: Color32::from_rgb(0x4F, 0x46, 0xE5),
            model_bubble: Color32::from_rgb(0xF1, 0xF5, 0xF9),
            spacing_8: 8.0,
            spacing_12: 12.0,
            spacing_16: 16.0,
            spacing_24: 24.0,
            radius_12: 12,
            section_title_size: 16.0,
            button_height: 36.0,
            section_min_rows: 4,
        }
    }
}

impl Theme {
    /// Light palette over egui's stock light visuals; sizes and spacing stay default.
    pub fn apply_visuals(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::light();
        visuals.panel_fill = self.surface_0;
        visuals.window_fill = self.surface_0;
        visuals.extreme_bg_color = self.surface_0;
        visuals.override_text_color = Some(self.text_primary);
        visuals.widgets.inactive.weak_bg_fill = self.surface_2;
        visuals.widgets.hovered.weak_bg_fill = self.accent_soft;
        visuals.selection.bg_fill = self.accent_soft;
        visuals.selection.stroke = Stroke::new(1.0, self.accent_primary);
        visuals.window_corner_radius = CornerRadius::same(self.radius_12);
        ctx.set_visuals(visuals);
    }

    pub fn card_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_0)
            .inner_margin(Margin::same(self.spacing_12 as i8))
            .corner_radius(CornerRadius::same(self.radius_12))
            .stroke(Stroke::new(1.0, self.border_subtle))
    }

    pub fn sidebar_frame(&self) -> Frame {
        Frame::new()
            .fill(self.surface_1)
            .inner_margin(Margin::same(self.spacing_12 as i8))
    }

    pub fn bubble_frame(&self, fill: Color32) -> Frame {
        Frame::new()
            .fill(fill)
            .inner_margin(Margin::symmetric(self.spacing_12 as i8, 10))
            .corner_radius(CornerRadius::same(self.radius_12))
    }

    pub fn history_row_fill(&self, active: bool) -> Color32 {
        if active {
            self.accent_soft
        } else {
            Color32::TRANSPARENT
        }
    }
}
