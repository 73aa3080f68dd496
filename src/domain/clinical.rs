//! Clinical attributes collected for heart disease risk assessment.
//!
//! Based on the UCI Cleveland heart disease attributes. Categorical values
//! serialize as the literal category strings used when the model was trained.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Accepted age in years.
pub const AGE_RANGE: RangeInclusive<u32> = 20..=100;
/// Accepted resting blood pressure in mm Hg.
pub const RESTING_BP_RANGE: RangeInclusive<u32> = 80..=200;
/// Accepted serum cholesterol in mg/dl.
pub const CHOLESTEROL_RANGE: RangeInclusive<u32> = 100..=600;
/// Accepted maximum heart rate achieved.
pub const MAX_HEART_RATE_RANGE: RangeInclusive<u32> = 60..=220;
/// Accepted ST depression induced by exercise relative to rest.
pub const ST_DEPRESSION_RANGE: RangeInclusive<f64> = 0.0..=6.0;
/// ST depression is recorded in tenths.
pub const ST_DEPRESSION_STEP: f64 = 0.1;
/// Accepted number of major vessels colored by fluoroscopy.
pub const MAJOR_VESSELS_RANGE: RangeInclusive<u8> = 0..=3;

/// Biological sex as recorded in the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const ALL: [Self; 2] = [Self::Male, Self::Female];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

/// Chest pain type (`cp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChestPainType {
    #[serde(rename = "typical angina")]
    TypicalAngina,
    #[serde(rename = "atypical angina")]
    AtypicalAngina,
    #[serde(rename = "non-anginal")]
    NonAnginal,
    #[serde(rename = "asymptomatic")]
    Asymptomatic,
}

/// Resting electrocardiographic result (`restecg`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestingEcg {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "lv hypertrophy")]
    LvHypertrophy,
    #[serde(rename = "st-t abnormality")]
    StTAbnormality,
}

/// Slope of the peak exercise ST segment (`slope`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StSlope {
    #[serde(rename = "upsloping")]
    Upsloping,
    #[serde(rename = "flat")]
    Flat,
    #[serde(rename = "downsloping")]
    Downsloping,
}

/// Thalassemia finding (`thal`).
///
/// "reversable" is the spelling used by the training data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Thalassemia {
    #[serde(rename = "normal")]
    Normal,
    #[serde(rename = "fixed defect")]
    FixedDefect,
    #[serde(rename = "reversable defect")]
    ReversableDefect,
}

/// The four one-hot encoded attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    ChestPain,
    RestingEcg,
    StSlope,
    Thalassemia,
}

impl CategoricalField {
    pub const ALL: [Self; 4] = [
        Self::ChestPain,
        Self::RestingEcg,
        Self::StSlope,
        Self::Thalassemia,
    ];

    /// Column prefix used by the training pipeline.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::ChestPain => "cp",
            Self::RestingEcg => "restecg",
            Self::StSlope => "slope",
            Self::Thalassemia => "thal",
        }
    }
}

/// A categorical attribute whose values map onto fixed one-hot columns.
///
/// `column` is the explicit `(field, category) -> column` table; every
/// implementation is an exhaustive `match`, so adding a category without a
/// column does not compile.
pub trait Category: Copy + Eq + 'static {
    const FIELD: CategoricalField;
    const ALL: &'static [Self];

    /// Literal category string as it appears in the training data.
    fn label(self) -> &'static str;

    /// One-hot column produced when this category is selected.
    fn column(self) -> &'static str;

    /// Position of this category within [`Category::ALL`].
    fn ordinal(self) -> usize {
        Self::ALL
            .iter()
            .position(|c| *c == self)
            .unwrap_or_default()
    }
}

impl Category for ChestPainType {
    const FIELD: CategoricalField = CategoricalField::ChestPain;
    const ALL: &'static [Self] = &[
        Self::TypicalAngina,
        Self::AtypicalAngina,
        Self::NonAnginal,
        Self::Asymptomatic,
    ];

    fn label(self) -> &'static str {
        match self {
            Self::TypicalAngina => "typical angina",
            Self::AtypicalAngina => "atypical angina",
            Self::NonAnginal => "non-anginal",
            Self::Asymptomatic => "asymptomatic",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::TypicalAngina => "cp_typical angina",
            Self::AtypicalAngina => "cp_atypical angina",
            Self::NonAnginal => "cp_non-anginal",
            Self::Asymptomatic => "cp_asymptomatic",
        }
    }
}

impl Category for RestingEcg {
    const FIELD: CategoricalField = CategoricalField::RestingEcg;
    const ALL: &'static [Self] = &[Self::Normal, Self::LvHypertrophy, Self::StTAbnormality];

    fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LvHypertrophy => "lv hypertrophy",
            Self::StTAbnormality => "st-t abnormality",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Normal => "restecg_normal",
            Self::LvHypertrophy => "restecg_lv hypertrophy",
            Self::StTAbnormality => "restecg_st-t abnormality",
        }
    }
}

impl Category for StSlope {
    const FIELD: CategoricalField = CategoricalField::StSlope;
    const ALL: &'static [Self] = &[Self::Upsloping, Self::Flat, Self::Downsloping];

    fn label(self) -> &'static str {
        match self {
            Self::Upsloping => "upsloping",
            Self::Flat => "flat",
            Self::Downsloping => "downsloping",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Upsloping => "slope_upsloping",
            Self::Flat => "slope_flat",
            Self::Downsloping => "slope_downsloping",
        }
    }
}

impl Category for Thalassemia {
    const FIELD: CategoricalField = CategoricalField::Thalassemia;
    const ALL: &'static [Self] = &[Self::Normal, Self::FixedDefect, Self::ReversableDefect];

    fn label(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::FixedDefect => "fixed defect",
            Self::ReversableDefect => "reversable defect",
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Normal => "thal_normal",
            Self::FixedDefect => "thal_fixed defect",
            Self::ReversableDefect => "thal_reversable defect",
        }
    }
}

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldViolation {
    #[error("{field} {value} out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("{field} is not a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} {value} is not a multiple of {step}")]
    OffStep {
        field: &'static str,
        value: f64,
        step: f64,
    },
}

impl FieldViolation {
    /// Name of the offending field.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::OutOfRange { field, .. }
            | Self::NotFinite { field }
            | Self::OffStep { field, .. } => field,
        }
    }
}

/// Every field of a [`ClinicalInput`] that failed range validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Patient attributes for a single assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClinicalInput {
    /// Age in years
    pub age: u32,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    /// Resting blood pressure in mm Hg (`trestbps`)
    #[serde(rename = "restingBP")]
    pub resting_bp: u32,
    /// Serum cholesterol in mg/dl (`chol`)
    pub cholesterol: u32,
    /// Fasting blood sugar > 120 mg/dl (`fbs`)
    pub fasting_blood_sugar_high: bool,
    #[serde(rename = "restingECG")]
    pub resting_ecg: RestingEcg,
    /// Maximum heart rate achieved (`thalch`)
    pub max_heart_rate: u32,
    /// Exercise induced angina (`exang`)
    pub exercise_angina: bool,
    /// ST depression, a.k.a. oldpeak
    pub st_depression: f64,
    pub st_slope: StSlope,
    /// Major vessels colored by fluoroscopy (`ca`)
    pub major_vessel_count: u8,
    pub thalassemia: Thalassemia,
}

impl Default for ClinicalInput {
    /// The form's starting values.
    fn default() -> Self {
        Self {
            age: 50,
            sex: Sex::Male,
            chest_pain_type: ChestPainType::TypicalAngina,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar_high: false,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: false,
            st_depression: 1.0,
            st_slope: StSlope::Upsloping,
            major_vessel_count: 0,
            thalassemia: Thalassemia::Normal,
        }
    }
}

impl ClinicalInput {
    /// Check every numeric attribute against its accepted range.
    ///
    /// # Errors
    /// Returns a [`ValidationError`] naming every violated field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        check_range(&mut violations, "age", self.age, &AGE_RANGE);
        check_range(&mut violations, "resting BP", self.resting_bp, &RESTING_BP_RANGE);
        check_range(&mut violations, "cholesterol", self.cholesterol, &CHOLESTEROL_RANGE);
        check_range(
            &mut violations,
            "max heart rate",
            self.max_heart_rate,
            &MAX_HEART_RATE_RANGE,
        );
        check_range(
            &mut violations,
            "major vessels",
            self.major_vessel_count,
            &MAJOR_VESSELS_RANGE,
        );

        let st = self.st_depression;
        if !st.is_finite() {
            violations.push(FieldViolation::NotFinite {
                field: "ST depression",
            });
        } else if !ST_DEPRESSION_RANGE.contains(&st) {
            violations.push(FieldViolation::OutOfRange {
                field: "ST depression",
                value: st,
                min: *ST_DEPRESSION_RANGE.start(),
                max: *ST_DEPRESSION_RANGE.end(),
            });
        } else if !is_on_step(st, ST_DEPRESSION_STEP) {
            violations.push(FieldViolation::OffStep {
                field: "ST depression",
                value: st,
                step: ST_DEPRESSION_STEP,
            });
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

fn check_range<T>(
    violations: &mut Vec<FieldViolation>,
    field: &'static str,
    value: T,
    range: &RangeInclusive<T>,
) where
    T: PartialOrd + Copy + Into<f64>,
{
    if !range.contains(&value) {
        violations.push(FieldViolation::OutOfRange {
            field,
            value: value.into(),
            min: (*range.start()).into(),
            max: (*range.end()).into(),
        });
    }
}

fn is_on_step(value: f64, step: f64) -> bool {
    let steps = value / step;
    (steps - steps.round()).abs() < 1e-6
}
