use leptos::prelude::RwSignal;

/// Title and body of the floating detail panel. Both are trusted HTML.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelContent {
    pub title: String,
    pub content_html: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelState {
    pub visible: bool,
    pub content: PanelContent,
}

impl PanelState {
    pub fn show(&mut self, content: PanelContent) {
        self.content = content;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// Markup for `#info-content`.
    pub fn inner_html(&self) -> String {
        format!(
            "<h3 style=\"margin:0 0 8px 0\">{}</h3>{}",
            self.content.title, self.content.content_html
        )
    }
}

#[derive(Clone, Copy)]
pub(crate) struct DetailPanel(pub RwSignal<PanelState>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden() {
        assert!(!PanelState::default().visible);
    }

    #[test]
    fn show_then_hide() {
        let mut panel = PanelState::default();
        panel.show(PanelContent {
            title: "Telibandha, Raipur".into(),
            content_html: "<div>rows</div>".into(),
        });
        assert!(panel.visible);
        assert_eq!(
            panel.inner_html(),
            "<h3 style=\"margin:0 0 8px 0\">Telibandha, Raipur</h3><div>rows</div>"
        );

        panel.hide();
        assert!(!panel.visible);
        // Content survives hiding.
        assert_eq!(panel.content.title, "Telibandha, Raipur");
    }

    #[test]
    fn show_replaces_previous_content() {
        let mut panel = PanelState::default();
        panel.show(PanelContent {
            title: "A, D1".into(),
            content_html: String::new(),
        });
        panel.show(PanelContent {
            title: "B, D2".into(),
            content_html: String::new(),
        });
        assert_eq!(panel.content.title, "B, D2");
    }
}
