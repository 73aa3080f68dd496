//! Clinical attribute input form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    Category, ChestPainType, ClinicalInput, RestingEcg, Sex, StSlope, Thalassemia, AGE_RANGE,
    CHOLESTEROL_RANGE, MAJOR_VESSELS_RANGE, MAX_HEART_RATE_RANGE, RESTING_BP_RANGE,
    ST_DEPRESSION_RANGE,
};
use crate::tui::styles::MedicalTheme;

/// One form field, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Age,
    Sex,
    ChestPain,
    RestingBp,
    Cholesterol,
    FastingBloodSugar,
    RestingEcg,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    StSlope,
    MajorVessels,
    Thalassemia,
}

impl FieldId {
    pub const ALL: [Self; 13] = [
        Self::Age,
        Self::Sex,
        Self::ChestPain,
        Self::RestingBp,
        Self::Cholesterol,
        Self::FastingBloodSugar,
        Self::RestingEcg,
        Self::MaxHeartRate,
        Self::ExerciseAngina,
        Self::StDepression,
        Self::StSlope,
        Self::MajorVessels,
        Self::Thalassemia,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Age => "Age",
            Self::Sex => "Sex",
            Self::ChestPain => "Chest Pain Type",
            Self::RestingBp => "Resting Blood Pressure",
            Self::Cholesterol => "Cholesterol",
            Self::FastingBloodSugar => "Fasting Blood Sugar > 120 mg/dl",
            Self::RestingEcg => "Resting ECG",
            Self::MaxHeartRate => "Max Heart Rate",
            Self::ExerciseAngina => "Exercise Induced Angina",
            Self::StDepression => "ST Depression",
            Self::StSlope => "ST Slope",
            Self::MajorVessels => "Major Vessels (fluoroscopy)",
            Self::Thalassemia => "Thalassemia",
        }
    }
}

/// Editable value of a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// Free numeric text with its accepted range as a hint.
    Number { text: String, hint: String },
    /// One of a fixed list of options.
    Choice {
        index: usize,
        options: Vec<&'static str>,
    },
    Toggle(bool),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub id: FieldId,
    pub input: FieldInput,
}

/// Form state.
pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        Self::from_input(&ClinicalInput::default())
    }
}

fn number<T: std::fmt::Display>(value: T, min: T, max: T, unit: &str) -> FieldInput {
    FieldInput::Number {
        text: value.to_string(),
        hint: format!("{min}-{max}{unit}"),
    }
}

fn choice<C: Category>(value: C) -> FieldInput {
    FieldInput::Choice {
        index: value.ordinal(),
        options: C::ALL.iter().map(|c| c.label()).collect(),
    }
}

fn pick<C: Category>(index: usize) -> C {
    C::ALL[index.min(C::ALL.len() - 1)]
}

impl FormState {
    /// Form pre-filled with `input`.
    #[must_use]
    pub fn from_input(input: &ClinicalInput) -> Self {
        let fields = FieldId::ALL
            .iter()
            .map(|&id| {
                let value = match id {
                    FieldId::Age => number(input.age, *AGE_RANGE.start(), *AGE_RANGE.end(), " years"),
                    FieldId::Sex => FieldInput::Choice {
                        index: Sex::ALL.iter().position(|s| *s == input.sex).unwrap_or(0),
                        options: Sex::ALL.iter().map(|s| s.label()).collect(),
                    },
                    FieldId::ChestPain => choice(input.chest_pain_type),
                    FieldId::RestingBp => number(
                        input.resting_bp,
                        *RESTING_BP_RANGE.start(),
                        *RESTING_BP_RANGE.end(),
                        " mm Hg",
                    ),
                    FieldId::Cholesterol => number(
                        input.cholesterol,
                        *CHOLESTEROL_RANGE.start(),
                        *CHOLESTEROL_RANGE.end(),
                        " mg/dl",
                    ),
                    FieldId::FastingBloodSugar => FieldInput::Toggle(input.fasting_blood_sugar_high),
                    FieldId::RestingEcg => choice(input.resting_ecg),
                    FieldId::MaxHeartRate => number(
                        input.max_heart_rate,
                        *MAX_HEART_RATE_RANGE.start(),
                        *MAX_HEART_RATE_RANGE.end(),
                        " bpm",
                    ),
                    FieldId::ExerciseAngina => FieldInput::Toggle(input.exercise_angina),
                    FieldId::StDepression => FieldInput::Number {
                        text: format!("{:.1}", input.st_depression),
                        hint: format!(
                            "{:.1}-{:.1}, step 0.1",
                            ST_DEPRESSION_RANGE.start(),
                            ST_DEPRESSION_RANGE.end()
                        ),
                    },
                    FieldId::StSlope => choice(input.st_slope),
                    FieldId::MajorVessels => number(
                        input.major_vessel_count,
                        *MAJOR_VESSELS_RANGE.start(),
                        *MAJOR_VESSELS_RANGE.end(),
                        "",
                    ),
                    FieldId::Thalassemia => choice(input.thalassemia),
                };
                FormField { id, input: value }
            })
            .collect();

        Self {
            fields,
            selected_field: 0,
            error_message: None,
        }
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    fn current(&mut self) -> &mut FieldInput {
        &mut self.fields[self.selected_field].input
    }

    /// Type into the selected numeric field.
    pub fn input_char(&mut self, c: char) {
        if let FieldInput::Number { text, .. } = self.current() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.error_message = None;
            }
        }
    }

    pub fn delete_char(&mut self) {
        if let FieldInput::Number { text, .. } = self.current() {
            text.pop();
        }
    }

    /// Step the selected choice forward or backward; flips toggles.
    pub fn cycle(&mut self, forward: bool) {
        match self.current() {
            FieldInput::Choice { index, options } => {
                let len = options.len();
                *index = if forward {
                    (*index + 1) % len
                } else {
                    (*index + len - 1) % len
                };
            }
            FieldInput::Toggle(on) => *on = !*on,
            FieldInput::Number { .. } => {}
        }
        self.error_message = None;
    }

    /// Wipe the typed text and return to the defaults.
    pub fn clear_sensitive(&mut self) {
        for field in &mut self.fields {
            if let FieldInput::Number { text, .. } = &mut field.input {
                text.zeroize();
            }
        }
        *self = Self::default();
    }

    /// Parse the form into a `ClinicalInput`.
    ///
    /// Only syntax is checked here; ranges are enforced by the encoder.
    ///
    /// # Errors
    /// Returns a message naming the first field that is not a number.
    pub fn to_clinical_input(&self) -> Result<ClinicalInput, String> {
        let mut input = ClinicalInput::default();

        for field in &self.fields {
            match (&field.input, field.id) {
                (FieldInput::Number { text, .. }, id) => {
                    let invalid = || format!("{}: Invalid number", id.label());
                    let text = text.trim();
                    match id {
                        FieldId::Age => input.age = text.parse().map_err(|_| invalid())?,
                        FieldId::RestingBp => input.resting_bp = text.parse().map_err(|_| invalid())?,
                        FieldId::Cholesterol => {
                            input.cholesterol = text.parse().map_err(|_| invalid())?;
                        }
                        FieldId::MaxHeartRate => {
                            input.max_heart_rate = text.parse().map_err(|_| invalid())?;
                        }
                        FieldId::StDepression => {
                            input.st_depression = text.parse().map_err(|_| invalid())?;
                        }
                        FieldId::MajorVessels => {
                            input.major_vessel_count = text.parse().map_err(|_| invalid())?;
                        }
                        _ => {}
                    }
                }
                (FieldInput::Choice { index, .. }, id) => match id {
                    FieldId::Sex => input.sex = Sex::ALL[(*index).min(Sex::ALL.len() - 1)],
                    FieldId::ChestPain => input.chest_pain_type = pick::<ChestPainType>(*index),
                    FieldId::RestingEcg => input.resting_ecg = pick::<RestingEcg>(*index),
                    FieldId::StSlope => input.st_slope = pick::<StSlope>(*index),
                    FieldId::Thalassemia => input.thalassemia = pick::<Thalassemia>(*index),
                    _ => {}
                },
                (FieldInput::Toggle(on), id) => match id {
                    FieldId::FastingBloodSugar => input.fasting_blood_sugar_high = *on,
                    FieldId::ExerciseAngina => input.exercise_angina = *on,
                    _ => {}
                },
            }
        }

        Ok(input)
    }
}

/// Render the clinical input form
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Form
            Constraint::Length(3), // Footer/error
        ])
        .split(area);

    render_form_header(f, chunks[0]);
    render_form_fields(f, chunks[1], state);
    render_form_footer(f, chunks[2], state);
}

fn render_form_header(f: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(" ", MedicalTheme::text()),
        Span::styled("Heart Disease Risk Assessment", MedicalTheme::title()),
        Span::styled(" │ Clinical Attributes", MedicalTheme::text_secondary()),
    ]))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(header, area);
}

fn render_form_fields(f: &mut Frame, area: Rect, state: &FormState) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .margin(1)
        .split(area);

    let mid = (state.fields.len() + 1) / 2;

    render_field_column(f, columns[0], &state.fields[..mid], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[mid..],
        mid,
        state.selected_field,
    );
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.id.label()), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.input {
            FieldInput::Number { text, hint } => {
                if text.is_empty() {
                    spans.push(Span::styled(hint.as_str(), MedicalTheme::text_muted()));
                } else {
                    spans.push(Span::styled(text.as_str(), MedicalTheme::text()));
                    spans.push(Span::styled(format!("  ({hint})"), MedicalTheme::text_muted()));
                }
                if is_selected {
                    spans.push(Span::styled("▌", MedicalTheme::cursor()));
                }
            }
            FieldInput::Choice { index, options } => {
                let arrows = if is_selected {
                    MedicalTheme::key_hint()
                } else {
                    MedicalTheme::text_muted()
                };
                spans.push(Span::styled("◀ ", arrows));
                spans.push(Span::styled(options[*index], MedicalTheme::text()));
                spans.push(Span::styled(" ▶", arrows));
            }
            FieldInput::Toggle(on) => {
                let (mark, text) = if *on { ("[x] ", "Yes") } else { ("[ ] ", "No") };
                spans.push(Span::styled(mark, MedicalTheme::key_hint()));
                spans.push(Span::styled(text, MedicalTheme::text()));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.clone(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→/Space] ", MedicalTheme::key_hint()),
            Span::styled("Change ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("Predict ", MedicalTheme::key_desc()),
            Span::styled("[I] ", MedicalTheme::key_hint()),
            Span::styled("Importance ", MedicalTheme::key_desc()),
            Span::styled("[R] ", MedicalTheme::key_hint()),
            Span::styled("Reset ", MedicalTheme::key_desc()),
            Span::styled("[Q] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );

    f.render_widget(footer, area);
}
