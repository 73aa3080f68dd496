//! Feature importance chart.

use ratatui::{
    layout::{Alignment, Direction, Rect},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::domain::FeatureImportance;
use crate::tui::styles::MedicalTheme;

/// Number of features charted.
pub const TOP_FEATURES: usize = 10;

pub const NOT_AVAILABLE: &str = "Feature importance not available for this model.";

/// Render the top features as horizontal bars, or a notice when the model
/// has no importances.
pub fn render_importance(f: &mut Frame, area: Rect, importances: Option<&[FeatureImportance]>) {
    let block = Block::default()
        .title(Span::styled(
            format!(" Top {TOP_FEATURES} Feature Importance "),
            MedicalTheme::subtitle(),
        ))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border());

    let Some(importances) = importances.filter(|i| !i.is_empty()) else {
        let notice = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(NOT_AVAILABLE, MedicalTheme::text_muted())),
        ])
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(notice, area);
        return;
    };

    // Bars take integer values; chart in thousandths.
    let bars: Vec<Bar> = importances
        .iter()
        .map(|i| {
            Bar::default()
                .value((i.importance.max(0.0) * 1000.0).round() as u64)
                .label(Line::from(i.feature.as_str()))
                .text_value(format!("{:.3}", i.importance))
                .style(MedicalTheme::bar())
                .value_style(MedicalTheme::bar_value())
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(importances: Option<&[FeatureImportance]>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 16)).expect("terminal");
        terminal
            .draw(|f| render_importance(f, f.area(), importances))
            .expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_notice_without_importances() {
        assert!(rendered(None).contains(NOT_AVAILABLE));
    }

    #[test]
    fn test_charts_feature_names() {
        let importances = vec![
            FeatureImportance {
                feature: "thalch".into(),
                importance: 0.31,
            },
            FeatureImportance {
                feature: "cp_asymptomatic".into(),
                importance: 0.12,
            },
        ];
        let screen = rendered(Some(&importances));
        assert!(screen.contains("thalch"));
        assert!(screen.contains("cp_asymptomatic"));
        assert!(!screen.contains(NOT_AVAILABLE));
    }
}
