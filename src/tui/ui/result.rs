//! Prediction result view.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{Assessment, RiskLabel};
use crate::tui::styles::MedicalTheme;

/// Outcome of the last submission.
#[derive(Debug, Clone, Default)]
pub enum ResultState {
    #[default]
    Empty,
    Complete(Assessment),
    /// Scoring failed; the message is shown and nothing is retried.
    Error(String),
}

/// Render the result screen.
pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState, show_importance: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Footer
        ])
        .split(area);

    render_result_header(f, chunks[0]);

    let content = chunks[1];
    match state {
        ResultState::Empty => render_empty(f, content),
        ResultState::Complete(assessment) => render_verdict(f, content, assessment),
        ResultState::Error(message) => render_error(f, content, message),
    }

    render_result_footer(f, chunks[2], show_importance);
}

fn render_result_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Prediction Result", MedicalTheme::title()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(Line::from(Span::styled(
        "No prediction yet",
        MedicalTheme::text_muted(),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(content, area);
}

fn render_verdict(f: &mut Frame, area: Rect, assessment: &Assessment) {
    let result = &assessment.result;
    let style = MedicalTheme::risk_label(result.label);

    let block = Block::default()
        .title(Span::styled(" Assessment ", MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(style);

    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Verdict
            Constraint::Length(3), // Probability
            Constraint::Length(2), // Timestamp
            Constraint::Min(0),
        ])
        .margin(1)
        .split(inner);

    let icon = match result.label {
        RiskLabel::HighRisk => "!",
        RiskLabel::LowRisk => "OK",
    };
    let verdict = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("{icon} {}", result.label.headline()),
            style.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(result.confidence_text(), MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    f.render_widget(verdict, chunks[0]);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Probability of Heart Disease ",
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(style)
        .ratio(result.probability.clamp(0.0, 1.0))
        .label(format!("{:.2}%", result.probability * 100.0));
    f.render_widget(gauge, chunks[1]);

    let timestamp = Paragraph::new(Line::from(vec![
        Span::styled("Assessed: ", MedicalTheme::text_secondary()),
        Span::styled(
            assessment
                .assessed_at
                .format("%Y-%m-%d %H:%M:%S UTC")
                .to_string(),
            MedicalTheme::text_muted(),
        ),
    ]))
    .alignment(Alignment::Center);
    f.render_widget(timestamp, chunks[2]);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("! Prediction failed", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );

    f.render_widget(content, area);
}

fn render_result_footer(f: &mut Frame, area: Rect, show_importance: bool) {
    let importance = if show_importance {
        "Hide Importance "
    } else {
        "Show Importance "
    };
    let content = Line::from(vec![
        Span::styled("[Enter/Esc] ", MedicalTheme::key_hint()),
        Span::styled("Back ", MedicalTheme::key_desc()),
        Span::styled("[N] ", MedicalTheme::key_hint()),
        Span::styled("New Assessment ", MedicalTheme::key_desc()),
        Span::styled("[I] ", MedicalTheme::key_hint()),
        Span::styled(importance, MedicalTheme::key_desc()),
        Span::styled("[Q] ", MedicalTheme::key_hint()),
        Span::styled("Quit", MedicalTheme::key_desc()),
    ]);

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PredictionResult;
    use ratatui::{backend::TestBackend, Terminal};

    fn rendered(state: &ResultState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).expect("terminal");
        terminal
            .draw(|f| render_result(f, f.area(), state, false))
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
    fn test_high_risk_verdict() {
        let state = ResultState::Complete(Assessment::new(PredictionResult::from_probability(0.725)));
        let screen = rendered(&state);
        assert!(screen.contains("High Risk of Heart Disease"));
        assert!(screen.contains("72.50% chance of heart disease."));
    }

    #[test]
    fn test_low_risk_verdict() {
        let state = ResultState::Complete(Assessment::new(PredictionResult::from_probability(0.2)));
        let screen = rendered(&state);
        assert!(screen.contains("Low Risk of Heart Disease"));
        assert!(screen.contains("80.00% chance of no heart disease."));
    }

    #[test]
    fn test_error_message() {
        let screen = rendered(&ResultState::Error("Feature count mismatch".into()));
        assert!(screen.contains("Prediction failed"));
        assert!(screen.contains("Feature count mismatch"));
    }
}
