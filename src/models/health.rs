// src/models/health.rs
//
// Prontuário médico, documentos, avaliações nutricionais e fisioterapia.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::format;

// =========================================================================
//  PRONTUÁRIO MÉDICO
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "medical_record_kind", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicalRecordKind {
    Consultation,
    Exam,
    Prescription,
    Occurrence,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    pub id: Uuid,
    pub resident_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-03-05")]
    pub record_date: NaiveDate,

    pub kind: MedicalRecordKind,

    #[schema(example = "Dra. Helena Costa (CRM 12345)")]
    pub professional: Option<String>,

    pub description: String,
    pub medications: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecordPayload {
    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "05/03/2025")]
    pub record_date: Option<NaiveDate>,

    #[validate(required(message = "O tipo do registro é obrigatório."))]
    pub kind: Option<MedicalRecordKind>,

    pub professional: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub description: String,

    pub medications: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalDocument {
    pub id: Uuid,
    pub resident_id: Uuid,

    #[schema(example = "hemograma-2025-03.pdf")]
    pub file_name: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub storage_key: String,

    pub size_bytes: i64,
    pub uploaded_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// Nome original do arquivo PDF
    pub file_name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignedLink {
    #[schema(example = "/api/files/eyJ0eXAiOiJKV1Qi...")]
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

// =========================================================================
//  NUTRIÇÃO
// =========================================================================

/// Classificação do IMC para idosos (Lipschitz).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BmiClass {
    Underweight, // < 22
    Adequate,    // 22 a 27
    Overweight,  // > 27
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionAssessment {
    pub id: Uuid,
    pub resident_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-03-01")]
    pub assessed_on: NaiveDate,

    #[schema(example = "61.5")]
    pub weight_kg: Decimal,
    #[schema(example = "1.58")]
    pub height_m: Decimal,
    #[schema(example = "24.64")]
    pub bmi: Decimal,

    pub diet: Option<String>,
    pub restrictions: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionAssessmentView {
    #[serde(flatten)]
    pub assessment: NutritionAssessment,
    pub bmi_class: BmiClass,
}

// Faixas em que o IMC cabe em NUMERIC(5,2): 400 / 0,80² = 625
pub const MAX_WEIGHT_KG: Decimal = Decimal::from_parts(400, 0, 0, false, 0);
pub const MIN_HEIGHT_M: Decimal = Decimal::from_parts(80, 0, 0, false, 2);
pub const MAX_HEIGHT_M: Decimal = Decimal::from_parts(250, 0, 0, false, 2);

fn validate_weight(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO || *value > MAX_WEIGHT_KG {
        let mut err = ValidationError::new("range");
        err.message = Some("Peso inválido (kg).".into());
        return Err(err);
    }
    Ok(())
}

fn validate_height(value: &Decimal) -> Result<(), ValidationError> {
    if *value < MIN_HEIGHT_M || *value > MAX_HEIGHT_M {
        let mut err = ValidationError::new("range");
        err.message = Some("Altura inválida (entre 0,80 e 2,50 m).".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionPayload {
    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data da avaliação é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "01/03/2025")]
    pub assessed_on: Option<NaiveDate>,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[validate(required(message = "O peso é obrigatório."), custom(function = "validate_weight"))]
    #[schema(value_type = String, example = "61,5")]
    pub weight_kg: Option<Decimal>,

    #[serde(default, deserialize_with = "format::brl_opt::deserialize")]
    #[validate(required(message = "A altura é obrigatória."), custom(function = "validate_height"))]
    #[schema(value_type = String, example = "1,58")]
    pub height_m: Option<Decimal>,

    pub diet: Option<String>,
    pub restrictions: Option<String>,
    pub notes: Option<String>,
}

// =========================================================================
//  FISIOTERAPIA
// =========================================================================

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhysioSession {
    pub id: Uuid,
    pub resident_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2025-03-03")]
    pub session_date: NaiveDate,

    pub professional: Option<String>,

    #[schema(example = "Fortalecimento de membros inferiores")]
    pub session_kind: String,

    pub evolution: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhysioPayload {
    #[serde(default, deserialize_with = "format::date_br_opt::deserialize")]
    #[validate(required(message = "A data da sessão é obrigatória."))]
    #[schema(value_type = String, format = Date, example = "03/03/2025")]
    pub session_date: Option<NaiveDate>,

    pub professional: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "O tipo de atendimento é obrigatório."))]
    pub session_kind: String,

    pub evolution: Option<String>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn payload(weight: &str, height: &str) -> NutritionPayload {
        NutritionPayload {
            assessed_on: NaiveDate::from_ymd_opt(2025, 3, 1),
            weight_kg: Some(Decimal::from_str(weight).unwrap()),
            height_m: Some(Decimal::from_str(height).unwrap()),
            diet: None,
            restrictions: None,
            notes: None,
        }
    }

    #[test]
    fn accepts_the_edges_of_the_ranges() {
        assert!(payload("400", "0.80").validate().is_ok());
        assert!(payload("35.2", "2.50").validate().is_ok());
    }

    #[test]
    fn rejects_measures_that_overflow_the_bmi() {
        let errors = payload("400", "0.01").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("height_m"));

        assert!(payload("400", "0.79").validate().is_err());
        assert!(payload("400.01", "1.60").validate().is_err());
        assert!(payload("60", "2.51").validate().is_err());
    }

    #[test]
    fn worst_case_bmi_fits_the_column() {
        let bmi = MAX_WEIGHT_KG / (MIN_HEIGHT_M * MIN_HEIGHT_M);
        assert!(bmi < Decimal::from(1000));
    }
}
