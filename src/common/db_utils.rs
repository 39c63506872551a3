use std::borrow::Cow;

use crate::common::error::AppError;

/// Converte violações de constraint do Postgres em erros amigáveis.
///
/// `unique_msg` vira 409 em caso de índice único; chaves estrangeiras em uso
/// (RESTRICT) viram 409 com `reference_msg`. O resto segue como erro de banco.
pub(crate) fn map_constraint_error(e: sqlx::Error, unique_msg: &str, reference_msg: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return AppError::UniqueConstraintViolation(unique_msg.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::ReferenceViolation(reference_msg.to_string());
        }
    }
    e.into()
}

/// Erro de validação de um único campo, no mesmo formato do `validator`.
pub(crate) fn field_error(field: &'static str, code: &'static str, message: &str) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    let mut err = validator::ValidationError::new(code);
    err.message = Some(Cow::Owned(message.to_string()));
    errors.add(field, err);
    AppError::ValidationError(errors)
}

/// Monta o padrão `%termo%` para buscas com ILIKE (`\` é o escape padrão).
pub(crate) fn like_pattern(term: Option<&str>) -> Option<String> {
    term.map(str::trim).filter(|t| !t.is_empty()).map(|t| {
        let escaped = t.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
        format!("%{}%", escaped)
    })
}

/// Busca por documento só com dígitos: `529982` ou `529.982` acham
/// `529.982.247-25`. `None` quando o termo tem letras.
pub(crate) fn digits_pattern(term: Option<&str>) -> Option<String> {
    let term = term?.trim();
    let only_document_chars = term
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '/' | ' '));
    let digits: String = term.chars().filter(char::is_ascii_digit).collect();
    (only_document_chars && !digits.is_empty()).then(|| format!("%{}%", digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(Some(" maria ")).as_deref(), Some("%maria%"));
        assert_eq!(like_pattern(Some("50%")).as_deref(), Some("%50\\%%"));
        assert_eq!(like_pattern(Some("   ")), None);
        assert_eq!(like_pattern(None), None);
        assert_eq!(like_pattern(Some("a\\b")).as_deref(), Some("%a\\\\b%"));
        assert_eq!(like_pattern(Some("\\%")).as_deref(), Some("%\\\\\\%%"));
    }

    #[test]
    fn digits_pattern_only_for_document_searches() {
        assert_eq!(digits_pattern(Some("529982")).as_deref(), Some("%529982%"));
        assert_eq!(digits_pattern(Some(" 529.982.247-25 ")).as_deref(), Some("%52998224725%"));
        assert_eq!(digits_pattern(Some("12.345.678/0001-95")).as_deref(), Some("%12345678000195%"));
        assert_eq!(digits_pattern(Some("Maria 2")), None);
        assert_eq!(digits_pattern(Some(".-")), None);
        assert_eq!(digits_pattern(None), None);
    }

    #[test]
    fn field_error_is_a_validation_error() {
        match field_error("amount", "positive", "O valor deve ser positivo.") {
            AppError::ValidationError(errors) => {
                assert!(errors.field_errors().contains_key("amount"));
            }
            other => panic!("esperava ValidationError, veio {:?}", other),
        }
    }
}
