//! Data-type property validation
//!
//! Independent of naming rules: this runs even when a project configures
//! none.

use schemalint_core::{DataType, RuleCode, ValidationResult, MAX_DECIMAL_PRECISION};

/// Check length/precision/scale against the data type
///
/// Length-bearing types need `0 < max_length <= ceiling` (4000 for N-types,
/// 8000 otherwise). DECIMAL/NUMERIC need `1 <= precision <= 38` and, when a
/// scale is given, `scale <= precision`.
pub fn validate_data_type_properties(
    data_type: DataType,
    max_length: Option<u32>,
    precision: Option<u8>,
    scale: Option<u8>,
) -> ValidationResult {
    if let Some(limit) = data_type.max_length_limit() {
        return match max_length {
            None => ValidationResult::fail(
                RuleCode::LengthRequired,
                format!("{} 타입은 길이를 지정해야 합니다", data_type),
            ),
            Some(0) => ValidationResult::fail(
                RuleCode::LengthOutOfRange,
                format!("{} 길이는 0보다 커야 합니다", data_type),
            ),
            Some(length) if length > limit => ValidationResult::fail(
                RuleCode::LengthOutOfRange,
                format!("{} 길이는 최대 {}입니다 (현재 {})", data_type, limit, length),
            )
            .with_suggestion(limit.to_string()),
            Some(_) => ValidationResult::ok(),
        };
    }

    if data_type.is_decimal() {
        let Some(precision) = precision else {
            return ValidationResult::fail(
                RuleCode::PrecisionRequired,
                format!("{} 타입은 정밀도(precision)를 지정해야 합니다", data_type),
            );
        };

        if !(1..=MAX_DECIMAL_PRECISION).contains(&precision) {
            return ValidationResult::fail(
                RuleCode::PrecisionOutOfRange,
                format!(
                    "정밀도는 1에서 {} 사이여야 합니다 (현재 {})",
                    MAX_DECIMAL_PRECISION, precision
                ),
            );
        }

        if let Some(scale) = scale {
            if scale > precision {
                return ValidationResult::fail(
                    RuleCode::ScaleOutOfRange,
                    format!(
                        "소수 자릿수(scale)는 0에서 {} 사이여야 합니다 (현재 {})",
                        precision, scale
                    ),
                )
                .with_suggestion(precision.to_string());
            }
        }
    }

    ValidationResult::ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn varchar_needs_a_length() {
        let result = validate_data_type_properties(DataType::VarChar, None, None, None);
        assert!(!result.is_valid);
        assert_eq!(result.rule, Some(RuleCode::LengthRequired));

        assert!(validate_data_type_properties(DataType::VarChar, Some(100), None, None).is_valid);
    }

    #[test]
    fn length_ceilings() {
        assert!(validate_data_type_properties(DataType::VarChar, Some(8000), None, None).is_valid);
        assert!(!validate_data_type_properties(DataType::VarChar, Some(8001), None, None).is_valid);
        assert!(validate_data_type_properties(DataType::NVarChar, Some(4000), None, None).is_valid);

        let result = validate_data_type_properties(DataType::NChar, Some(4001), None, None);
        assert_eq!(result.rule, Some(RuleCode::LengthOutOfRange));
        assert_eq!(result.suggestion.as_deref(), Some("4000"));

        let result = validate_data_type_properties(DataType::Binary, Some(0), None, None);
        assert_eq!(result.rule, Some(RuleCode::LengthOutOfRange));
    }

    #[test]
    fn decimal_precision_and_scale() {
        assert!(validate_data_type_properties(DataType::Decimal, None, Some(18), Some(2)).is_valid);
        assert!(validate_data_type_properties(DataType::Numeric, None, Some(10), None).is_valid);

        let result = validate_data_type_properties(DataType::Decimal, None, None, None);
        assert_eq!(result.rule, Some(RuleCode::PrecisionRequired));

        let result = validate_data_type_properties(DataType::Decimal, None, Some(40), Some(2));
        assert!(!result.is_valid);
        assert_eq!(result.rule, Some(RuleCode::PrecisionOutOfRange));

        let result = validate_data_type_properties(DataType::Decimal, None, Some(0), None);
        assert_eq!(result.rule, Some(RuleCode::PrecisionOutOfRange));

        let result = validate_data_type_properties(DataType::Decimal, None, Some(18), Some(20));
        assert!(!result.is_valid);
        assert_eq!(result.rule, Some(RuleCode::ScaleOutOfRange));
    }

    #[test]
    fn other_types_ignore_properties() {
        assert!(validate_data_type_properties(DataType::Int, None, None, None).is_valid);
        assert!(validate_data_type_properties(DataType::DateTime, Some(10), Some(3), None).is_valid);
    }
}
