// src/common/format.rs
//
// Formatação no padrão brasileiro: moeda (R$), datas, CPF, CNPJ, telefone e CEP.

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;
use validator::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("valor vazio")]
    Empty,

    #[error("valor monetário inválido: '{0}'")]
    InvalidCurrency(String),

    #[error("esperados {expected} dígitos, recebidos {found}")]
    Length { expected: &'static str, found: usize },

    #[error("data inválida: '{0}' (use AAAA-MM-DD ou DD/MM/AAAA)")]
    InvalidDate(String),
}

pub fn only_digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

// =========================================================================
//  MOEDA
// =========================================================================

/// Lê um valor em reais: "1.234,56", "R$ 1.234,56", "-10,00", "1234,5" ou "1234".
///
/// O ponto só é aceito como separador de milhar (grupos de 3 dígitos) e a
/// vírgula como separador decimal, com no máximo duas casas.
pub fn parse_brl(input: &str) -> Result<Decimal, FormatError> {
    let invalid = || FormatError::InvalidCurrency(input.to_string());

    let mut body = input.trim();
    let mut negative = false;
    if let Some(rest) = body.strip_prefix('-') {
        negative = true;
        body = rest.trim_start();
    }
    if let Some(rest) = body.strip_prefix("R$") {
        body = rest.trim_start();
    }
    if !negative {
        if let Some(rest) = body.strip_prefix('-') {
            negative = true;
            body = rest.trim_start();
        }
    }

    if body.is_empty() {
        return Err(FormatError::Empty);
    }
    if !body.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
        return Err(invalid());
    }

    let (integer_part, fraction) = match body.split_once(',') {
        Some((integer, fraction)) => (integer, fraction),
        None => (body, ""),
    };
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let integer_digits = if integer_part.contains('.') {
        let groups: Vec<&str> = integer_part.split('.').collect();
        let head = groups[0];
        if head.is_empty() || head.len() > 3 || groups[1..].iter().any(|g| g.len() != 3) {
            return Err(invalid());
        }
        groups.concat()
    } else {
        integer_part.to_string()
    };

    if integer_digits.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }

    let normalized = format!(
        "{}.{}",
        if integer_digits.is_empty() { "0" } else { &integer_digits },
        if fraction.is_empty() { "0" } else { fraction }
    );
    let value: Decimal = normalized.parse().map_err(|_| invalid())?;

    Ok(if negative { -value } else { value })
}

/// "1.234,56", sempre com duas casas decimais.
pub fn format_brl_plain(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (integer, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("{}{},{}", if negative { "-" } else { "" }, grouped, fraction)
}

/// "R$ 1.234,56" (ou "-R$ 10,00").
pub fn format_brl(value: Decimal) -> String {
    let plain = format_brl_plain(value);
    match plain.strip_prefix('-') {
        Some(abs) => format!("-R$ {}", abs),
        None => format!("R$ {}", plain),
    }
}

// =========================================================================
//  DOCUMENTOS E CONTATO
// =========================================================================

fn digits_of_len(input: &str, len: usize, expected: &'static str) -> Result<String, FormatError> {
    let digits = only_digits(input);
    if digits.is_empty() {
        return Err(FormatError::Empty);
    }
    if digits.len() != len {
        return Err(FormatError::Length { expected, found: digits.len() });
    }
    Ok(digits)
}

/// 11 dígitos → "000.000.000-00".
pub fn format_cpf(input: &str) -> Result<String, FormatError> {
    let d = digits_of_len(input, 11, "11")?;
    Ok(format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11]))
}

/// Confere tamanho e os dois dígitos verificadores.
pub fn is_valid_cpf(input: &str) -> bool {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 11 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    let check = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        (sum * 10 % 11) % 10
    };
    check(9) == digits[9] && check(10) == digits[10]
}

/// 14 dígitos → "00.000.000/0000-00".
pub fn format_cnpj(input: &str) -> Result<String, FormatError> {
    let d = digits_of_len(input, 14, "14")?;
    Ok(format!(
        "{}.{}.{}/{}-{}",
        &d[0..2],
        &d[2..5],
        &d[5..8],
        &d[8..12],
        &d[12..14]
    ))
}

pub fn is_valid_cnpj(input: &str) -> bool {
    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != 14 || digits.iter().all(|&d| d == digits[0]) {
        return false;
    }
    let check = |weights: &[u32]| -> u32 {
        let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
        match sum % 11 {
            r if r < 2 => 0,
            r => 11 - r,
        }
    };
    check(&FIRST) == digits[12] && check(&SECOND) == digits[13]
}

/// CPF ou CNPJ, de acordo com a quantidade de dígitos.
pub fn format_document(input: &str) -> Result<String, FormatError> {
    match only_digits(input).len() {
        14 => format_cnpj(input),
        _ => format_cpf(input),
    }
}

/// 10 dígitos → "(11) 3456-7890"; 11 dígitos → "(11) 98765-4321".
pub fn format_phone(input: &str) -> Result<String, FormatError> {
    let d = only_digits(input);
    match d.len() {
        0 => Err(FormatError::Empty),
        10 => Ok(format!("({}) {}-{}", &d[0..2], &d[2..6], &d[6..10])),
        11 => Ok(format!("({}) {}-{}", &d[0..2], &d[2..7], &d[7..11])),
        found => Err(FormatError::Length { expected: "10 ou 11", found }),
    }
}

/// 8 dígitos → "12345-678".
pub fn format_cep(input: &str) -> Result<String, FormatError> {
    let d = digits_of_len(input, 8, "8")?;
    Ok(format!("{}-{}", &d[0..5], &d[5..8]))
}

// =========================================================================
//  DATAS
// =========================================================================

pub fn format_date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Aceita "2024-03-15" ou "15/03/2024".
pub fn parse_date(input: &str) -> Result<NaiveDate, FormatError> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
        .map_err(|_| FormatError::InvalidDate(input.to_string()))
}

// =========================================================================
//  VALIDADORES (usados com #[validate(custom(...))])
// =========================================================================

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    if is_valid_cpf(value) {
        Ok(())
    } else {
        Err(invalid("cpf", "CPF inválido."))
    }
}

pub fn validate_document(value: &str) -> Result<(), ValidationError> {
    match only_digits(value).len() {
        11 if is_valid_cpf(value) => Ok(()),
        14 if is_valid_cnpj(value) => Ok(()),
        _ => Err(invalid("document", "CPF/CNPJ inválido.")),
    }
}

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    format_phone(value)
        .map(|_| ())
        .map_err(|_| invalid("phone", "Telefone deve ter 10 ou 11 dígitos (com DDD)."))
}

pub fn validate_cep(value: &str) -> Result<(), ValidationError> {
    format_cep(value)
        .map(|_| ())
        .map_err(|_| invalid("cep", "CEP deve ter 8 dígitos."))
}

/// Normaliza um telefone opcional vindo do formulário (vazio vira `None`).
pub fn normalize_phone(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(|v| format_phone(v).unwrap_or_else(|_| v.trim().to_string()))
}

// =========================================================================
//  ADAPTADORES SERDE
// =========================================================================

/// Valor monetário vindo como número JSON ou texto em reais.
pub mod brl {
    use std::fmt;

    use rust_decimal::Decimal;
    use serde::{de, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(BrlVisitor)
    }

    pub(super) struct BrlVisitor;

    impl<'de> de::Visitor<'de> for BrlVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("um número ou um valor em reais (ex: \"1.234,56\")")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            super::parse_brl(v).map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Decimal::try_from(v)
                .map(|d| d.round_dp(2))
                .map_err(E::custom)
        }
    }
}

/// Como `brl`, mas `null`, ausente ou "" viram `None`.
pub mod brl_opt {
    use std::fmt;

    use rust_decimal::Decimal;
    use serde::{de, de::Visitor, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OptBrlVisitor)
    }

    struct OptBrlVisitor;

    impl<'de> Visitor<'de> for OptBrlVisitor {
        type Value = Option<Decimal>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("um valor em reais, um número ou null")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: de::Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
            d.deserialize_any(self)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            if v.trim().is_empty() {
                return Ok(None);
            }
            super::brl::BrlVisitor.visit_str(v).map(Some)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            super::brl::BrlVisitor.visit_i64(v).map(Some)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            super::brl::BrlVisitor.visit_u64(v).map(Some)
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            super::brl::BrlVisitor.visit_f64(v).map(Some)
        }
    }
}

/// Data em "AAAA-MM-DD" ou "DD/MM/AAAA".
pub mod date_br {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw).map_err(serde::de::Error::custom)
    }
}

/// Data opcional; `null`, ausente ou "" viram `None`.
pub mod date_br_opt {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) if !raw.trim().is_empty() => super::parse_date(&raw)
                .map(Some)
                .map_err(serde::de::Error::custom),
            _ => Ok(None),
        }
    }
}

/// Texto opcional de formulário: "" ou só espaços viram `None`.
pub mod opt_text {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde::Deserialize;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn parses_brazilian_currency() {
        assert_eq!(parse_brl("1.234,56").unwrap(), dec("1234.56"));
        assert_eq!(parse_brl("R$ 1.234,56").unwrap(), dec("1234.56"));
        assert_eq!(parse_brl("  R$1.234.567,8 ").unwrap(), dec("1234567.8"));
        assert_eq!(parse_brl("1234").unwrap(), dec("1234"));
        assert_eq!(parse_brl(",50").unwrap(), dec("0.50"));
        assert_eq!(parse_brl("-R$ 10,00").unwrap(), dec("-10"));
        assert_eq!(parse_brl("R$ -10,00").unwrap(), dec("-10"));
    }

    #[test]
    fn rejects_malformed_currency() {
        assert_eq!(parse_brl(""), Err(FormatError::Empty));
        assert_eq!(parse_brl("R$ "), Err(FormatError::Empty));
        for bad in ["abc", "1,2,3", "12,345", "1234.56", "1.23,00", ".123,00", "1.2345"] {
            assert!(parse_brl(bad).is_err(), "deveria rejeitar {bad:?}");
        }
    }

    #[test]
    fn formats_brazilian_currency() {
        assert_eq!(format_brl(dec("1234.56")), "R$ 1.234,56");
        assert_eq!(format_brl(dec("0")), "R$ 0,00");
        assert_eq!(format_brl(dec("999.999")), "R$ 1.000,00");
        assert_eq!(format_brl(dec("-10.5")), "-R$ 10,50");
        assert_eq!(format_brl_plain(dec("1234567.891")), "1.234.567,89");
        assert_eq!(format_brl_plain(dec("100")), "100,00");
        assert_eq!(format_brl_plain(dec("0.005")), "0,01");
    }

    #[test]
    fn canonical_currency_strings_round_trip() {
        for s in ["0,00", "1,00", "12,34", "999,99", "1.000,00", "1.234,56", "12.345.678,90", "-1.234,56"] {
            assert_eq!(format_brl_plain(parse_brl(s).unwrap()), s);
        }
    }

    #[test]
    fn formats_cpf() {
        assert_eq!(format_cpf("52998224725").unwrap(), "529.982.247-25");
        assert_eq!(format_cpf("529.982.247-25").unwrap(), "529.982.247-25");
        assert_eq!(
            format_cpf("5299822472"),
            Err(FormatError::Length { expected: "11", found: 10 })
        );
        assert!(format_cpf("529982247251").is_err());
        assert_eq!(format_cpf(""), Err(FormatError::Empty));
    }

    #[test]
    fn every_eleven_digit_string_gets_the_cpf_mask() {
        for n in [0u64, 1, 12_345_678_901, 99_999_999_999] {
            let digits = format!("{:011}", n);
            let formatted = format_cpf(&digits).unwrap();
            assert_eq!(formatted.len(), 14);
            assert_eq!(only_digits(&formatted), digits);
            assert_eq!(&formatted[3..4], ".");
            assert_eq!(&formatted[11..12], "-");
        }
    }

    #[test]
    fn validates_cpf_check_digits() {
        assert!(is_valid_cpf("529.982.247-25"));
        assert!(is_valid_cpf("52998224725"));
        assert!(!is_valid_cpf("529.982.247-26"));
        assert!(!is_valid_cpf("111.111.111-11"));
        assert!(!is_valid_cpf("5299822472"));
    }

    #[test]
    fn validates_and_formats_cnpj() {
        assert!(is_valid_cnpj("11.222.333/0001-81"));
        assert!(!is_valid_cnpj("11.222.333/0001-82"));
        assert_eq!(format_cnpj("11222333000181").unwrap(), "11.222.333/0001-81");
        assert_eq!(format_document("11222333000181").unwrap(), "11.222.333/0001-81");
        assert_eq!(format_document("52998224725").unwrap(), "529.982.247-25");
        assert!(validate_document("11.222.333/0001-81").is_ok());
        assert!(validate_document("529.982.247-25").is_ok());
        assert!(validate_document("123").is_err());
    }

    #[test]
    fn formats_phones() {
        assert_eq!(format_phone("1134567890").unwrap(), "(11) 3456-7890");
        assert_eq!(format_phone("11987654321").unwrap(), "(11) 98765-4321");
        assert_eq!(format_phone("(11) 98765-4321").unwrap(), "(11) 98765-4321");
        assert_eq!(
            format_phone("987654321"),
            Err(FormatError::Length { expected: "10 ou 11", found: 9 })
        );
        assert!(validate_phone("119876543210").is_err());
        assert_eq!(normalize_phone(Some("")), None);
        assert_eq!(normalize_phone(Some("11987654321")).as_deref(), Some("(11) 98765-4321"));
    }

    #[test]
    fn formats_cep() {
        assert_eq!(format_cep("01310100").unwrap(), "01310-100");
        assert!(format_cep("0131010").is_err());
        assert!(validate_cep("01310-100").is_ok());
    }

    #[test]
    fn parses_both_date_notations() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_date("2024-03-15").unwrap(), expected);
        assert_eq!(parse_date("15/03/2024").unwrap(), expected);
        assert!(parse_date("31/02/2024").is_err());
        assert_eq!(format_date_br(expected), "15/03/2024");
    }

    #[derive(Deserialize)]
    struct Form {
        #[serde(deserialize_with = "brl::deserialize")]
        amount: Decimal,
        #[serde(default, deserialize_with = "brl_opt::deserialize")]
        salary: Option<Decimal>,
        #[serde(deserialize_with = "date_br::deserialize")]
        due: NaiveDate,
        #[serde(default, deserialize_with = "date_br_opt::deserialize")]
        paid: Option<NaiveDate>,
        #[serde(default, deserialize_with = "opt_text::deserialize")]
        phone: Option<String>,
    }

    #[test]
    fn serde_adapters_accept_form_values() {
        let form: Form = serde_json::from_str(
            r#"{"amount": "1.234,56", "salary": "", "due": "10/01/2025", "paid": null}"#,
        )
        .unwrap();
        assert_eq!(form.amount, dec("1234.56"));
        assert_eq!(form.salary, None);
        assert_eq!(form.due, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(form.paid, None);
        assert_eq!(form.phone, None);

        let form: Form =
            serde_json::from_str(r#"{"amount": 99.9, "salary": 1500, "due": "2025-01-10", "phone": "  "}"#).unwrap();
        assert_eq!(form.amount, dec("99.9"));
        assert_eq!(form.salary, Some(dec("1500")));
        assert_eq!(form.paid, None);
        assert_eq!(form.phone, None);

        assert!(serde_json::from_str::<Form>(r#"{"amount": "abc", "due": "2025-01-10"}"#).is_err());
    }
}
