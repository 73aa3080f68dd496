//! UI module: View components for the TUI.

pub mod form;
pub mod importance;
pub mod result;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub const DISCLAIMER: &str =
    "DISCLAIMER: This tool is for educational and demonstration purposes only. It is not a medical device and does not replace professional medical advice.";

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(Line::from(Span::styled(DISCLAIMER, MedicalTheme::text_muted())))
        .block(block)
        .wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
