//! Word entry overlay.
//!
//! A single-line text field pinned to the bottom of the window. Pressing
//! Enter or clicking "Add" submits the trimmed text and clears the field.

/// Word entry field state.
#[derive(Debug, Default, Clone)]
pub struct WordEntry {
    buffer: String,
}

impl WordEntry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current (unsubmitted) contents of the field.
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replace the field contents.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
    }

    /// Take the trimmed contents, clearing the field.
    ///
    /// Returns `None` for blank input, which also clears the field.
    pub fn submit(&mut self) -> Option<String> {
        let word = self.buffer.trim().to_string();
        self.buffer.clear();
        if word.is_empty() {
            None
        } else {
            Some(word)
        }
    }

    /// Draw the field. Returns a word when one was submitted this frame.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<String> {
        let mut submitted = None;

        egui::Area::new(egui::Id::new("word_entry"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -24.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let response = ui.add(
                            egui::TextEdit::singleline(&mut self.buffer)
                                .hint_text("Add a word")
                                .desired_width(220.0),
                        );
                        let entered =
                            response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                        let clicked = ui.button("Add").clicked();

                        if entered || clicked {
                            submitted = self.submit();
                            // Keep typing without reaching for the mouse
                            response.request_focus();
                        }
                    });
                });
            });

        submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_trims_and_clears() {
        let mut entry = WordEntry::new();
        entry.set_text("  aurora ");
        assert_eq!(entry.submit(), Some("aurora".to_string()));
        assert_eq!(entry.text(), "");
    }

    #[test]
    fn test_blank_submit_ignored() {
        let mut entry = WordEntry::new();
        entry.set_text(" \t ");
        assert_eq!(entry.submit(), None);
        assert_eq!(entry.text(), "");
    }

    #[test]
    fn test_show_without_input_submits_nothing() {
        let ctx = egui::Context::default();
        let mut entry = WordEntry::new();
        entry.set_text("pending");
        ctx.begin_pass(egui::RawInput::default());
        let out = entry.show(&ctx);
        let _ = ctx.end_pass();
        assert_eq!(out, None);
        assert_eq!(entry.text(), "pending");
    }
}
