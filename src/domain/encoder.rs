//! Feature encoder: clinical input to model feature vector.
//!
//! Column placement is resolved once against the schema when the encoder is
//! built. Encoding a request then writes each produced column straight into its
//! schema position; produced columns the schema lacks are dropped and schema
//! columns nothing produced stay at zero.

use std::marker::PhantomData;

use super::clinical::{
    Category, ChestPainType, ClinicalInput, RestingEcg, Sex, StSlope, Thalassemia,
};
use super::features::{EncodingError, FeatureSchema, FeatureVector};

/// Non-categorical columns in the order the training pipeline emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericColumn {
    Age,
    Sex,
    RestingBp,
    Cholesterol,
    FastingBloodSugar,
    MaxHeartRate,
    ExerciseAngina,
    StDepression,
    MajorVessels,
}

impl NumericColumn {
    pub const ALL: [Self; 9] = [
        Self::Age,
        Self::Sex,
        Self::RestingBp,
        Self::Cholesterol,
        Self::FastingBloodSugar,
        Self::MaxHeartRate,
        Self::ExerciseAngina,
        Self::StDepression,
        Self::MajorVessels,
    ];

    /// Column name in the feature schema.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::RestingBp => "trestbps",
            Self::Cholesterol => "chol",
            Self::FastingBloodSugar => "fbs",
            Self::MaxHeartRate => "thalch",
            Self::ExerciseAngina => "exang",
            Self::StDepression => "oldpeak",
            Self::MajorVessels => "ca",
        }
    }

    /// Value this column takes for `input`.
    #[must_use]
    pub fn value(self, input: &ClinicalInput) -> f64 {
        match self {
            Self::Age => f64::from(input.age),
            Self::Sex => match input.sex {
                Sex::Male => 1.0,
                Sex::Female => 0.0,
            },
            Self::RestingBp => f64::from(input.resting_bp),
            Self::Cholesterol => f64::from(input.cholesterol),
            Self::FastingBloodSugar => flag(input.fasting_blood_sugar_high),
            Self::MaxHeartRate => f64::from(input.max_heart_rate),
            Self::ExerciseAngina => flag(input.exercise_angina),
            Self::StDepression => input.st_depression,
            Self::MajorVessels => f64::from(input.major_vessel_count),
        }
    }
}

fn flag(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}

/// Schema positions of every category of one one-hot group.
#[derive(Debug, Clone)]
struct OneHotSlots<C: Category> {
    positions: Vec<Option<usize>>,
    _category: PhantomData<C>,
}

impl<C: Category> OneHotSlots<C> {
    fn resolve(schema: &FeatureSchema) -> Self {
        let positions = C::ALL.iter().map(|c| schema.position(c.column())).collect();
        Self {
            positions,
            _category: PhantomData,
        }
    }

    fn write(&self, selected: C, vector: &mut FeatureVector) {
        match self.positions[selected.ordinal()] {
            Some(position) => vector.set(position, 1.0),
            None => tracing::debug!(
                column = selected.column(),
                "selected category has no schema column; group encodes as all zeros"
            ),
        }
    }

    fn resolved(&self) -> usize {
        self.positions.iter().flatten().count()
    }
}

/// Encodes [`ClinicalInput`] into the feature layout of a trained model.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: FeatureSchema,
    numeric: [Option<usize>; 9],
    chest_pain: OneHotSlots<ChestPainType>,
    resting_ecg: OneHotSlots<RestingEcg>,
    st_slope: OneHotSlots<StSlope>,
    thalassemia: OneHotSlots<Thalassemia>,
}

impl FeatureEncoder {
    /// Resolve every known column against `schema`.
    #[must_use]
    pub fn new(schema: FeatureSchema) -> Self {
        let numeric = NumericColumn::ALL.map(|c| schema.position(c.name()));

        let encoder = Self {
            chest_pain: OneHotSlots::resolve(&schema),
            resting_ecg: OneHotSlots::resolve(&schema),
            st_slope: OneHotSlots::resolve(&schema),
            thalassemia: OneHotSlots::resolve(&schema),
            numeric,
            schema,
        };

        let known = encoder.numeric.iter().flatten().count()
            + encoder.chest_pain.resolved()
            + encoder.resting_ecg.resolved()
            + encoder.st_slope.resolved()
            + encoder.thalassemia.resolved();
        tracing::debug!(
            "Feature encoder ready: {} schema columns, {} produced by the encoder",
            encoder.schema.len(),
            known
        );
        if known < encoder.schema.len() {
            tracing::warn!(
                "{} schema columns are never produced and will always be 0",
                encoder.schema.len() - known
            );
        }

        encoder
    }

    #[must_use]
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Validate `input` and encode it in schema order.
    ///
    /// # Errors
    /// Returns `EncodingError::InvalidInput` listing every out-of-range field.
    pub fn encode(&self, input: &ClinicalInput) -> Result<FeatureVector, EncodingError> {
        input.validate()?;

        let mut vector = FeatureVector::zeros(&self.schema);

        for (column, position) in NumericColumn::ALL.iter().zip(self.numeric) {
            if let Some(position) = position {
                vector.set(position, column.value(input));
            }
        }

        self.chest_pain.write(input.chest_pain_type, &mut vector);
        self.resting_ecg.write(input.resting_ecg, &mut vector);
        self.st_slope.write(input.st_slope, &mut vector);
        self.thalassemia.write(input.thalassemia, &mut vector);

        Ok(vector)
    }
}

/// Encode `input` against `schema` without keeping an encoder around.
///
/// # Errors
/// See [`FeatureEncoder::encode`].
pub fn encode(input: &ClinicalInput, schema: &FeatureSchema) -> Result<FeatureVector, EncodingError> {
    FeatureEncoder::new(schema.clone()).encode(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CategoricalField;

    const SCENARIO_SCHEMA: [&str; 13] = [
        "age",
        "sex",
        "trestbps",
        "chol",
        "fbs",
        "thalch",
        "exang",
        "oldpeak",
        "ca",
        "cp_typical angina",
        "restecg_normal",
        "slope_flat",
        "thal_normal",
    ];

    fn scenario_input() -> ClinicalInput {
        ClinicalInput {
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
            st_slope: StSlope::Flat,
            major_vessel_count: 0,
            thalassemia: Thalassemia::Normal,
        }
    }

    fn full_schema() -> FeatureSchema {
        let mut columns: Vec<String> = NumericColumn::ALL.iter().map(|c| c.name().into()).collect();
        columns.extend(ChestPainType::ALL.iter().map(|c| c.column().to_string()));
        columns.extend(RestingEcg::ALL.iter().map(|c| c.column().to_string()));
        columns.extend(StSlope::ALL.iter().map(|c| c.column().to_string()));
        columns.extend(Thalassemia::ALL.iter().map(|c| c.column().to_string()));
        FeatureSchema::new(columns).expect("valid schema")
    }

    #[test]
    fn test_scenario_full_match() {
        let schema = FeatureSchema::new(SCENARIO_SCHEMA).expect("valid schema");
        let vector = encode(&scenario_input(), &schema).expect("should encode");

        let expected = [
            50.0, 1.0, 120.0, 200.0, 0.0, 150.0, 0.0, 1.0, 0.0, 1.0, 1.0, 1.0, 1.0,
        ];
        assert_eq!(vector.names(), schema.columns());
        assert_eq!(vector.values(), &expected);
    }

    #[test]
    fn test_scenario_missing_category_column_is_dropped() {
        let columns: Vec<&str> = SCENARIO_SCHEMA
            .iter()
            .copied()
            .filter(|c| *c != "cp_typical angina")
            .collect();
        let schema = FeatureSchema::new(columns).expect("valid schema");
        let vector = encode(&scenario_input(), &schema).expect("should encode");

        assert_eq!(vector.len(), 12);
        assert!(vector.iter().all(|(name, _)| !name.starts_with("cp_")));
        assert_eq!(vector.get("slope_flat"), Some(1.0));
    }

    #[test]
    fn test_unselected_categories_are_zero() {
        let encoder = FeatureEncoder::new(full_schema());
        let input = ClinicalInput {
            chest_pain_type: ChestPainType::Asymptomatic,
            thalassemia: Thalassemia::ReversableDefect,
            ..scenario_input()
        };
        let vector = encoder.encode(&input).expect("should encode");

        assert_eq!(vector.get("cp_asymptomatic"), Some(1.0));
        assert_eq!(vector.get("cp_typical angina"), Some(0.0));
        assert_eq!(vector.get("thal_reversable defect"), Some(1.0));

        for field in CategoricalField::ALL {
            let ones = schema_group_sum(&vector, field.prefix());
            assert!((ones - 1.0).abs() < f64::EPSILON, "{}", field.prefix());
        }
    }

    #[test]
    fn test_unknown_schema_columns_fill_with_zero() {
        let schema = FeatureSchema::new(["age", "bmi", "cp_unknown", "sex"]).expect("valid");
        let vector = encode(&scenario_input(), &schema).expect("should encode");
        assert_eq!(vector.values(), &[50.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_female_and_flags() {
        let input = ClinicalInput {
            sex: Sex::Female,
            fasting_blood_sugar_high: true,
            exercise_angina: true,
            st_depression: 2.3,
            major_vessel_count: 3,
            ..scenario_input()
        };
        let vector = encode(&input, &full_schema()).expect("should encode");

        assert_eq!(vector.get("sex"), Some(0.0));
        assert_eq!(vector.get("fbs"), Some(1.0));
        assert_eq!(vector.get("exang"), Some(1.0));
        assert_eq!(vector.get("oldpeak"), Some(2.3));
        assert_eq!(vector.get("ca"), Some(3.0));
    }

    #[test]
    fn test_out_of_range_input_is_rejected() {
        let input = ClinicalInput {
            max_heart_rate: 300,
            ..scenario_input()
        };
        let err = encode(&input, &full_schema()).expect_err("should reject");
        assert!(matches!(err, EncodingError::InvalidInput(_)));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let encoder = FeatureEncoder::new(full_schema());
        let a = encoder.encode(&scenario_input()).expect("encode");
        let b = encoder.encode(&scenario_input()).expect("encode");
        assert_eq!(a, b);
    }

    fn schema_group_sum(vector: &FeatureVector, prefix: &str) -> f64 {
        vector
            .schema()
            .group(prefix)
            .filter_map(|c| vector.get(c))
            .sum()
    }
}
