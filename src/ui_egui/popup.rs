//! Reusable modal dialog.
//!
//! Owners embed a [`ModalPopup`] and hand it their contents each frame;
//! show/hide hooks are registered as callbacks.

use egui::{Align2, Color32, Context, Id, Key, Order, Sense};

/// What closing the popup does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CloseAction {
    /// Hide and keep state, ready to be shown again
    #[default]
    Hide,
    /// Hide permanently; later `show` calls are ignored
    Destroy,
}

type Callback = Box<dyn FnMut()>;

pub struct ModalPopup {
    id: Id,
    title: String,
    width: f32,
    height: f32,
    close_action: CloseAction,
    visible: bool,
    destroyed: bool,
    on_show: Vec<Callback>,
    on_hide: Vec<Callback>,
}

impl ModalPopup {
    pub fn new(id_source: impl std::hash::Hash, title: impl Into<String>, width: f32, height: f32) -> Self {
        Self {
            id: Id::new(id_source),
            title: title.into(),
            width,
            height,
            close_action: CloseAction::Hide,
            visible: false,
            destroyed: false,
            on_show: Vec::new(),
            on_hide: Vec::new(),
        }
    }

    pub fn with_close_action(mut self, close_action: CloseAction) -> Self {
        self.close_action = close_action;
        self
    }

    pub fn on_show(&mut self, callback: impl FnMut() + 'static) {
        self.on_show.push(Box::new(callback));
    }

    pub fn on_hide(&mut self, callback: impl FnMut() + 'static) {
        self.on_hide.push(Box::new(callback));
    }

    /// Make the popup visible. Returns false once destroyed.
    pub fn show(&mut self) -> bool {
        if self.destroyed {
            log::warn!("Ignoring show() on destroyed popup '{}'", self.title);
            return false;
        }

        self.visible = true;
        for callback in &mut self.on_show {
            callback();
        }
        true
    }

    pub fn hide(&mut self) {
        if !self.visible {
            return;
        }

        self.visible = false;
        for callback in &mut self.on_hide {
            callback();
        }
    }

    /// Apply the configured close action.
    pub fn close(&mut self) {
        self.hide();
        if self.close_action == CloseAction::Destroy {
            self.destroyed = true;
            self.on_show.clear();
            self.on_hide.clear();
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn close_action(&self) -> CloseAction {
        self.close_action
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn size(&self) -> (f32, f32) {
        (self.width, self.height)
    }

    /// Draw the popup with a dimmed backdrop when visible.
    ///
    /// Returns the contents' result; `None` when hidden. The close button and
    /// Escape both apply the close action.
    pub fn render<R>(&mut self, ctx: &Context, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> Option<R> {
        if !self.visible {
            return None;
        }

        // Sits above panels and below windows, swallowing clicks meant for the calendar.
        egui::Area::new(self.id.with("backdrop"))
            .order(Order::PanelResizeLine)
            .fixed_pos(egui::Pos2::ZERO)
            .show(ctx, |ui| {
                let screen = ctx.screen_rect();
                ui.painter()
                    .rect_filled(screen, 0.0, Color32::from_black_alpha(96));
                ui.allocate_rect(screen, Sense::click());
            });

        let mut open = true;
        let response = egui::Window::new(self.title.as_str())
            .id(self.id)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_size([self.width, self.height])
            .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, add_contents);

        let escape = ctx.input(|i| i.key_pressed(Key::Escape));
        if !open || escape {
            self.close();
        }

        response.and_then(|inner| inner.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn popup() -> ModalPopup {
        ModalPopup::new("test_popup", "Test", 200.0, 100.0)
    }

    #[test]
    fn test_show_and_hide_run_callbacks() {
        let shown = Rc::new(Cell::new(0));
        let hidden = Rc::new(Cell::new(0));
        let mut popup = popup();
        {
            let shown = Rc::clone(&shown);
            popup.on_show(move || shown.set(shown.get() + 1));
        }
        {
            let hidden = Rc::clone(&hidden);
            popup.on_hide(move || hidden.set(hidden.get() + 1));
        }

        assert!(popup.show());
        assert!(popup.is_visible());
        popup.hide();
        popup.hide();

        assert!(!popup.is_visible());
        assert_eq!(shown.get(), 1);
        assert_eq!(hidden.get(), 1, "hiding twice fires once");
    }

    #[test]
    fn test_close_with_hide_allows_reopen() {
        let mut popup = popup();
        popup.show();
        popup.close();

        assert!(!popup.is_visible());
        assert!(!popup.is_destroyed());
        assert!(popup.show());
    }

    #[test]
    fn test_close_with_destroy_blocks_reopen() {
        let mut popup = popup().with_close_action(CloseAction::Destroy);
        popup.show();
        popup.close();

        assert!(popup.is_destroyed());
        assert!(!popup.show());
        assert!(!popup.is_visible());
    }

    #[test]
    fn test_render_hidden_draws_nothing() {
        let ctx = Context::default();
        let mut popup = popup();
        let mut ran = false;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            ran = popup.render(ctx, |_| ()).is_some();
        });
        assert!(!ran);
    }

    #[test]
    fn test_render_visible_runs_contents() {
        let ctx = Context::default();
        let mut popup = popup();
        popup.show();
        let mut result = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            result = popup.render(ctx, |ui| {
                ui.label("body");
                7
            });
        });
        assert_eq!(result, Some(7));
        assert!(popup.is_visible());
    }
}
