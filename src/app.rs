use crate::controller::SessionController;
use crate::journal::store::FileStorage;
use crate::journal::{JournalLog, Role, SectionKey, ViewState};
use crate::theme::Theme;
use eframe::egui::{self, Align, Layout, RichText, ScrollArea};
use std::time::Duration;

const LOADING_REPAINT: Duration = Duration::from_millis(100);

pub struct JournalApp {
    controller: SessionController<FileStorage>,
    theme: Theme,
    composer_input: String,
    scroll_to_bottom: bool,
}

impl JournalApp {
    pub fn new(controller: SessionController<FileStorage>) -> Self {
        Self {
            controller,
            theme: Theme::default(),
            composer_input: String::new(),
            scroll_to_bottom: true,
        }
    }

    pub fn install_theme(&self, ctx: &egui::Context) {
        self.theme.apply_visuals(ctx);
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Mindful Journal")
                        .strong()
                        .color(self.theme.accent_primary),
                );
                ui.separator();
                ui.label(self.controller.current_date().format("%A, %Y-%m-%d").to_string());
                ui.label(
                    RichText::new(format!("{} entries", self.controller.logs().len()))
                        .small()
                        .color(self.theme.text_muted),
                );
                if self.controller.is_loading() {
                    ui.separator();
                    ui.spinner();
                    ui.label(RichText::new("Waiting for the AI...").color(self.theme.text_muted));
                }
            });
        });
    }

    fn render_left_panel(&mut self, ctx: &egui::Context) {
        let mut clicked_date = None;
        egui::SidePanel::left("history_panel")
            .resizable(false)
            .exact_width(220.0)
            .frame(self.theme.sidebar_frame())
            .show(ctx, |ui| {
                ui.label(RichText::new("HISTORY").small().color(self.theme.text_muted));
                ui.add_space(self.theme.spacing_8);
                ScrollArea::vertical().id_salt("history_list").show(ui, |ui| {
                    for log in self.controller.history() {
                        let active = log.date == self.controller.current_date();
                        if self.history_row(ui, log, active).clicked() {
                            clicked_date = Some(log.date);
                        }
                    }
                });
            });

        if let Some(date) = clicked_date {
            self.controller.select_date(date);
            self.scroll_to_bottom = true;
        }
    }

    fn history_row(&self, ui: &mut egui::Ui, log: &JournalLog, active: bool) -> egui::Response {
        let label = format!("{}\n{}", log.date.format("%Y-%m-%d"), log.status().label());
        let color = if active {
            self.theme.accent_primary
        } else {
            self.theme.text_primary
        };

        ui.add(
            egui::Button::new(RichText::new(label).color(color))
                .fill(self.theme.history_row_fill(active))
                .stroke(egui::Stroke::NONE)
                .min_size(egui::vec2(ui.available_width(), self.theme.button_height + 8.0)),
        )
    }

    fn render_editor_actions(&mut self, ctx: &egui::Context) {
        if self.controller.current_log().is_none() {
            return;
        }
        let loading = self.controller.is_loading();
        let mut save = false;
        let mut analyze = false;

        egui::TopBottomPanel::bottom("editor_actions")
            .frame(
                egui::Frame::new()
                    .fill(self.theme.surface_0)
                    .inner_margin(egui::Margin::same(self.theme.spacing_16 as i8)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    save = ui
                        .add_enabled(!loading, egui::Button::new("Save entry"))
                        .clicked();

                    let analyze_label = RichText::new("Analyze with AI").color(self.theme.text_on_accent);
                    analyze = ui
                        .add_enabled(
                            !loading,
                            egui::Button::new(analyze_label).fill(self.theme.accent_primary),
                        )
                        .clicked();
                    if loading {
                        ui.spinner();
                    }
                });
            });

        if save {
            self.controller.save();
        }
        if analyze {
            self.controller.analyze();
        }
    }

    fn render_editor(&mut self, ui: &mut egui::Ui) {
        let Some(log) = self.controller.current_log() else {
            ui.label(
                RichText::new("Nothing was written on this day.").color(self.theme.text_muted),
            );
            return;
        };
        let mut sections = log.sections.clone();
        let mut edits = Vec::new();

        ScrollArea::vertical().id_salt("journal_editor").show(ui, |ui| {
            ui.heading("How was your day?");
            ui.label(
                RichText::new("Capture today's moments through these five prompts.")
                    .color(self.theme.text_muted),
            );

            for key in SectionKey::ALL {
                ui.add_space(self.theme.spacing_16);
                ui.label(
                    RichText::new(key.title())
                        .size(self.theme.section_title_size)
                        .strong(),
                );
                let response = ui.add(
                    egui::TextEdit::multiline(sections.get_mut(key))
                        .desired_rows(self.theme.section_min_rows)
                        .desired_width(f32::INFINITY)
                        .hint_text(key.placeholder()),
                );
                if response.changed() {
                    edits.push((key, sections.get(key).to_string()));
                }
            }
            ui.add_space(self.theme.spacing_24);
        });

        for (key, text) in edits {
            self.controller.change_section(key, &text);
        }
    }

    fn render_success(&mut self, ui: &mut egui::Ui) {
        let mut back = false;
        ui.vertical_centered(|ui| {
            ui.add_space(ui.available_height() / 4.0);
            ui.label(RichText::new("*").size(64.0).color(self.theme.celebrate));
            ui.heading("Today's journal is complete!");
            ui.label(
                RichText::new("Well done! Every entry is a footprint of your growth.")
                    .color(self.theme.text_muted),
            );
            ui.add_space(self.theme.spacing_24);
            back = ui.button("Back to entry").clicked();
        });

        if back {
            self.controller.back();
        }
    }

    fn render_chat(&mut self, ui: &mut egui::Ui) {
        let mut back = false;
        ui.horizontal(|ui| {
            back = ui.button("< Back to entry").clicked();
            ui.vertical(|ui| {
                ui.label(RichText::new("Reflection chat").strong());
                ui.label(
                    RichText::new("Talking through today's thoughts")
                        .small()
                        .color(self.theme.text_muted),
                );
            });
        });
        ui.separator();

        let loading = self.controller.is_loading();
        let transcript_height = (ui.available_height() - 70.0).max(120.0);
        let history = self
            .controller
            .current_log()
            .map(|log| log.chat_history.clone())
            .unwrap_or_default();

        ScrollArea::vertical()
            .id_salt("chat_transcript")
            .max_height(transcript_height)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in &history {
                    let (layout, fill, color) = match message.role {
                        Role::User => (
                            Layout::right_to_left(Align::TOP),
                            self.theme.user_bubble,
                            self.theme.text_on_accent,
                        ),
                        Role::Model => (
                            Layout::left_to_right(Align::TOP),
                            self.theme.model_bubble,
                            self.theme.text_primary,
                        ),
                    };
                    ui.with_layout(layout, |ui| {
                        self.theme.bubble_frame(fill).show(ui, |ui| {
                            ui.set_max_width(ui.available_width() * 0.8);
                            ui.label(RichText::new(&message.text).color(color));
                        });
                    });
                }

                if loading {
                    self.theme.bubble_frame(self.theme.model_bubble).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("...").color(self.theme.text_muted));
                        });
                    });
                }

                if self.scroll_to_bottom {
                    ui.scroll_to_cursor(Some(Align::BOTTOM));
                }
            });
        self.scroll_to_bottom = false;

        ui.separator();
        let mut send_now = false;
        self.theme.card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                let response = ui.add_enabled(
                    !loading,
                    egui::TextEdit::singleline(&mut self.composer_input)
                        .desired_width(ui.available_width() - 80.0)
                        .hint_text("Tell me more about how you feel..."),
                );
                if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    send_now = true;
                }

                send_now |= ui
                    .add_enabled(
                        !loading && !self.composer_input.trim().is_empty(),
                        egui::Button::new("Send"),
                    )
                    .clicked();
            });
        });

        if send_now && !loading && !self.composer_input.trim().is_empty() {
            let message = std::mem::take(&mut self.composer_input);
            self.controller.send_message(&message);
            self.scroll_to_bottom = true;
        }
        if back {
            self.controller.back();
        }
    }

    fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.controller.alert() else {
            return;
        };
        let message = alert.message().to_string();
        let mut dismiss = false;

        let response = egui::Modal::new(egui::Id::new("analysis_alert")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.heading("Analysis failed");
            ui.label(message);
            ui.add_space(self.theme.spacing_8);
            dismiss = ui.button("OK").clicked();
        });

        if dismiss || response.should_close() {
            self.controller.dismiss_alert();
        }
    }
}

impl eframe::App for JournalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.controller.drain_events() > 0 {
            self.scroll_to_bottom = true;
        }

        self.render_top_bar(ctx);
        self.render_left_panel(ctx);
        let view = self.controller.view();
        if view == ViewState::Editing {
            self.render_editor_actions(ctx);
        }
        egui::CentralPanel::default().show(ctx, |ui| match view {
            ViewState::Editing => self.render_editor(ui),
            ViewState::Success => self.render_success(ui),
            ViewState::Chat => self.render_chat(ui),
        });
        self.render_alert(ctx);

        if self.controller.is_loading() {
            ctx.request_repaint_after(LOADING_REPAINT);
        }
    }
}
