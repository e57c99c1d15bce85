//! Declarative field rules shared by the HTTP handlers and the form controller.
//!
//! Each rule set is plain data: a field name plus an ordered list of checks,
//! every check carrying the message shown when it fails. The same constants
//! are evaluated at the server boundary, in [`crate::client::controller`] and
//! are published as JSON by `GET /validation_rules`, so the two sides cannot
//! drift apart.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

lazy_static! {
    static ref ALPHANUMERIC: Regex = Regex::new(r"^[A-Za-z0-9]+$").expect("valid regex");
}

/// A single predicate over a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    /// Non-empty text, or a non-empty id list
    Required,
    /// Character count within `[min, max]`
    Length { min: usize, max: usize },
    /// Only ASCII letters and digits
    Alphanumeric,
    ContainsLetter,
    ContainsDigit,
    /// Decimal number strictly greater than zero
    PositiveNumber,
    /// Plain `digits[.digits]` notation with at most `places` decimals
    MaxDecimals { places: u32 },
    /// Integer part of the number has at most `digits` digits
    MaxIntegerDigits { digits: u32 },
    /// Integer id in `1..=i32::MAX`; applies to every element of an id list
    PositiveInteger,
    /// At least `count` ids selected
    MinSelected { count: usize },
}

/// The value a [`FieldSource`] exposes for one field.
#[derive(Debug, Clone, Copy)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Ids(&'a [i64]),
}

impl Constraint {
    /// Evaluate this constraint. Constraints that do not apply to the value
    /// kind (e.g. `Length` on an id list) pass.
    pub fn holds(&self, value: FieldValue<'_>) -> bool {
        match (self, value) {
            (Constraint::Required, FieldValue::Text(text)) => !text.is_empty(),
            (Constraint::Required, FieldValue::Ids(ids)) => !ids.is_empty(),
            (Constraint::Length { min, max }, FieldValue::Text(text)) => {
                let len = text.chars().count();
                len >= *min && len <= *max
            }
            (Constraint::Alphanumeric, FieldValue::Text(text)) => ALPHANUMERIC.is_match(text),
            (Constraint::ContainsLetter, FieldValue::Text(text)) => {
                text.chars().any(|c| c.is_ascii_alphabetic())
            }
            (Constraint::ContainsDigit, FieldValue::Text(text)) => {
                text.chars().any(|c| c.is_ascii_digit())
            }
            (Constraint::PositiveNumber, FieldValue::Text(text)) => {
                parse_decimal(text).is_some_and(|d| d > Decimal::ZERO)
            }
            (Constraint::MaxDecimals { places }, FieldValue::Text(text)) => {
                has_max_decimals(text, *places)
            }
            (Constraint::MaxIntegerDigits { digits }, FieldValue::Text(text)) => {
                fits_integer_digits(text, *digits)
            }
            (Constraint::PositiveInteger, FieldValue::Text(text)) => parse_id(text).is_some(),
            (Constraint::PositiveInteger, FieldValue::Ids(ids)) => {
                ids.iter().all(|id| *id >= 1 && *id <= i32::MAX as i64)
            }
            (Constraint::MinSelected { count }, FieldValue::Ids(ids)) => ids.len() >= *count,
            _ => true,
        }
    }
}

/// A constraint and the message reported when it fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Check {
    #[serde(flatten)]
    pub constraint: Constraint,
    pub message: &'static str,
}

const fn check(constraint: Constraint, message: &'static str) -> Check {
    Check { constraint, message }
}

/// Ordered checks for one field. Evaluation stops at the first failure.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FieldRule {
    pub field: &'static str,
    pub checks: &'static [Check],
}

impl FieldRule {
    /// Message of the first failing check, if any.
    pub fn first_failure(&self, value: FieldValue<'_>) -> Option<&'static str> {
        self.checks
            .iter()
            .find(|c| !c.constraint.holds(value))
            .map(|c| c.message)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct RuleSet {
    pub name: &'static str,
    pub fields: &'static [FieldRule],
}

/// Anything that can hand field values to a [`RuleSet`].
pub trait FieldSource {
    fn field_value(&self, field: &str) -> FieldValue<'_>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: &'static str,
    pub message: &'static str,
}

/// All violations found in one pass, in rule order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<Violation>);

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(|v| v.message)
            .collect::<Vec<_>>()
            .join(". ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn single(field: &'static str, message: &'static str) -> Self {
        Self(vec![Violation { field, message }])
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }
}

impl RuleSet {
    pub fn rule(&self, field: &str) -> Option<&'static FieldRule> {
        self.fields.iter().find(|r| r.field == field)
    }

    /// Run every field rule and collect the first failure of each field.
    pub fn validate(&self, source: &impl FieldSource) -> Result<(), ValidationErrors> {
        let violations: Vec<Violation> = self
            .fields
            .iter()
            .filter_map(|rule| {
                rule.first_failure(source.field_value(rule.field))
                    .map(|message| Violation {
                        field: rule.field,
                        message,
                    })
            })
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors(violations))
        }
    }
}

/// Parse a decimal written in plain notation.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text.trim()).ok()
}

/// Parse an integer, also accepting integral decimals such as `"2.0"`.
pub fn parse_integral(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(n) = text.parse::<i64>() {
        return Some(n);
    }
    let d = Decimal::from_str(text).ok()?;
    if d.fract().is_zero() {
        i64::try_from(d).ok()
    } else {
        None
    }
}

/// Parse a positive id that fits a SERIAL column.
pub fn parse_id(text: &str) -> Option<i32> {
    parse_integral(text)
        .and_then(|id| i32::try_from(id).ok())
        .filter(|id| *id > 0)
}

fn fits_integer_digits(text: &str, digits: u32) -> bool {
    let Some(limit) = 10i64.checked_pow(digits) else {
        return true;
    };
    parse_decimal(text).is_some_and(|d| d.abs().trunc() < Decimal::from(limit))
}

fn has_max_decimals(text: &str, places: u32) -> bool {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text, None),
    };
    if int_part.is_empty() || !int_part.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }
    match frac_part {
        None => true,
        Some(f) => {
            !f.is_empty() && f.len() <= places as usize && f.chars().all(|c| c.is_ascii_digit())
        }
    }
}

// Field check lists. Rule sets below reference these, never copies of them.

const PRODUCT_CODE: &[Check] = &[
    check(Constraint::Required, "El código es obligatorio"),
    check(
        Constraint::Length { min: 5, max: 15 },
        "El código debe tener entre 5 y 15 caracteres",
    ),
    check(
        Constraint::Alphanumeric,
        "El código solo puede contener letras y números",
    ),
    check(
        Constraint::ContainsLetter,
        "El código debe contener al menos una letra",
    ),
    check(
        Constraint::ContainsDigit,
        "El código debe contener al menos un número",
    ),
];

const PRODUCT_NAME: &[Check] = &[
    check(Constraint::Required, "El nombre es obligatorio"),
    check(
        Constraint::Length { min: 2, max: 50 },
        "El nombre debe tener entre 2 y 50 caracteres",
    ),
];

const PRODUCT_PRICE: &[Check] = &[
    check(Constraint::Required, "El precio es obligatorio"),
    check(
        Constraint::PositiveNumber,
        "El precio debe ser un número positivo",
    ),
    check(
        Constraint::MaxDecimals { places: 2 },
        "El precio debe tener máximo 2 decimales",
    ),
    // NUMERIC(10,2) leaves eight integer digits
    check(
        Constraint::MaxIntegerDigits { digits: 8 },
        "El precio debe ser menor a 100000000",
    ),
];

const PRODUCT_DESCRIPTION: &[Check] = &[
    check(Constraint::Required, "La descripción es obligatoria"),
    check(
        Constraint::Length { min: 10, max: 1000 },
        "La descripción debe tener entre 10 y 1000 caracteres",
    ),
];

const CURRENCY: &[Check] = &[
    check(Constraint::Required, "Debe seleccionar una moneda"),
    check(Constraint::PositiveInteger, "Moneda inválida"),
];

const WAREHOUSE: &[Check] = &[
    check(Constraint::Required, "Debe seleccionar una bodega"),
    check(Constraint::PositiveInteger, "ID de bodega inválido"),
];

const BRANCH: &[Check] = &[
    check(Constraint::Required, "Debe seleccionar una sucursal"),
    check(Constraint::PositiveInteger, "ID de sucursal inválido"),
];

const FORM_MATERIALS: &[Check] = &[
    check(
        Constraint::MinSelected { count: 2 },
        "Debe seleccionar al menos 2 materiales",
    ),
    check(Constraint::PositiveInteger, "IDs de materiales inválidos"),
];

const MATERIAL_CODE: &[Check] = &[
    check(Constraint::Required, "El código de material es obligatorio"),
    check(
        Constraint::Length { min: 5, max: 15 },
        "El código de material debe tener entre 5 y 15 caracteres",
    ),
    check(
        Constraint::Alphanumeric,
        "El código de material solo puede contener letras y números",
    ),
];

const MATERIAL_DESCRIPTION: &[Check] = &[
    check(Constraint::Required, "La descripción es obligatoria"),
    check(
        Constraint::Length { min: 1, max: 20 },
        "La descripción debe tener entre 1 y 20 caracteres",
    ),
];

const ASSOCIATION_PRODUCT: &[Check] = &[check(
    Constraint::PositiveInteger,
    "ID de producto inválido",
)];

const ASSOCIATION_MATERIALS: &[Check] = &[
    check(Constraint::Required, "Debe proporcionar al menos un material"),
    check(Constraint::PositiveInteger, "IDs de materiales inválidos"),
];

/// `POST /insert_product`
pub const PRODUCT: RuleSet = RuleSet {
    name: "product",
    fields: &[
        FieldRule { field: "code", checks: PRODUCT_CODE },
        FieldRule { field: "name", checks: PRODUCT_NAME },
        FieldRule { field: "price", checks: PRODUCT_PRICE },
        FieldRule { field: "description", checks: PRODUCT_DESCRIPTION },
        FieldRule { field: "currency_id", checks: CURRENCY },
    ],
};

/// `POST /insert_material`
pub const MATERIAL: RuleSet = RuleSet {
    name: "material",
    fields: &[
        FieldRule { field: "code", checks: MATERIAL_CODE },
        FieldRule { field: "description", checks: MATERIAL_DESCRIPTION },
    ],
};

/// `POST /associate_materials`
pub const ASSOCIATION: RuleSet = RuleSet {
    name: "association",
    fields: &[
        FieldRule { field: "product_id", checks: ASSOCIATION_PRODUCT },
        FieldRule { field: "material_ids", checks: ASSOCIATION_MATERIALS },
    ],
};

const BRANCH_FILTER_WAREHOUSE: &[Check] = &[check(
    Constraint::PositiveInteger,
    "ID de bodega inválido",
)];

/// `GET /get_branches`
pub const BRANCH_FILTER: RuleSet = RuleSet {
    name: "branch_filter",
    fields: &[FieldRule { field: "warehouse_id", checks: BRANCH_FILTER_WAREHOUSE }],
};

/// The full registration form as the client sees it.
pub const PRODUCT_FORM: RuleSet = RuleSet {
    name: "product_form",
    fields: &[
        FieldRule { field: "code", checks: PRODUCT_CODE },
        FieldRule { field: "name", checks: PRODUCT_NAME },
        FieldRule { field: "warehouse", checks: WAREHOUSE },
        FieldRule { field: "branch", checks: BRANCH },
        FieldRule { field: "currency", checks: CURRENCY },
        FieldRule { field: "price", checks: PRODUCT_PRICE },
        FieldRule { field: "materials", checks: FORM_MATERIALS },
        FieldRule { field: "description", checks: PRODUCT_DESCRIPTION },
    ],
};

/// Every rule set, in the order `GET /validation_rules` lists them.
pub const ALL: &[RuleSet] = &[PRODUCT, MATERIAL, ASSOCIATION, BRANCH_FILTER, PRODUCT_FORM];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Fields(HashMap<&'static str, String>);

    impl FieldSource for Fields {
        fn field_value(&self, field: &str) -> FieldValue<'_> {
            FieldValue::Text(self.0.get(field).map(String::as_str).unwrap_or(""))
        }
    }

    fn product(code: &str, price: &str) -> Fields {
        Fields(HashMap::from([
            ("code", code.to_string()),
            ("name", "Widget".to_string()),
            ("price", price.to_string()),
            ("description", "A valid widget description.".to_string()),
            ("currency_id", "1".to_string()),
        ]))
    }

    fn code_rule() -> &'static FieldRule {
        PRODUCT.rule("code").unwrap()
    }

    #[test]
    fn test_valid_product_passes() {
        assert!(PRODUCT.validate(&product("ABC12", "9.99")).is_ok());
    }

    #[test]
    fn test_code_rejections() {
        for code in ["", "AB1", "ABCDEFGHIJ123456", "ABC-12", "ABCDEF", "123456", "ABC 12"] {
            assert!(
                code_rule().first_failure(FieldValue::Text(code)).is_some(),
                "code {:?} should be rejected",
                code
            );
        }
    }

    #[test]
    fn test_code_boundaries_accepted() {
        for code in ["ABC12", "A2345", "ABCDEFGHIJKLMN1"] {
            assert_eq!(code_rule().first_failure(FieldValue::Text(code)), None);
        }
    }

    #[test]
    fn test_code_reports_first_failure_only() {
        let failure = code_rule().first_failure(FieldValue::Text("a-b"));
        assert_eq!(failure, Some("El código debe tener entre 5 y 15 caracteres"));
    }

    #[test]
    fn test_price_rejections() {
        let rule = PRODUCT.rule("price").unwrap();
        for price in ["0", "-5", "abc", "19.999", "", "5.", "1e3"] {
            assert!(
                rule.first_failure(FieldValue::Text(price)).is_some(),
                "price {:?} should be rejected",
                price
            );
        }
    }

    #[test]
    fn test_price_acceptances() {
        let rule = PRODUCT.rule("price").unwrap();
        for price in ["19.99", "5", "0.5", "1000000", "99999999.99"] {
            assert_eq!(rule.first_failure(FieldValue::Text(price)), None);
        }
    }

    #[test]
    fn test_price_above_column_range() {
        let rule = PRODUCT.rule("price").unwrap();
        for price in ["100000000", "100000000.00", "123456789.5"] {
            assert_eq!(
                rule.first_failure(FieldValue::Text(price)),
                Some("El precio debe ser menor a 100000000"),
                "price {:?}",
                price
            );
        }
    }

    #[test]
    fn test_three_decimals_message() {
        let rule = PRODUCT.rule("price").unwrap();
        assert_eq!(
            rule.first_failure(FieldValue::Text("19.999")),
            Some("El precio debe tener máximo 2 decimales")
        );
    }

    #[test]
    fn test_errors_aggregate_in_rule_order() {
        let mut fields = product("AB", "0");
        fields.0.insert("name", "X".to_string());
        let err = PRODUCT.validate(&fields).unwrap_err();
        let names: Vec<_> = err.violations().iter().map(|v| v.field).collect();
        assert_eq!(names, vec!["code", "name", "price"]);
        assert_eq!(
            err.to_string(),
            "El código debe tener entre 5 y 15 caracteres. \
             El nombre debe tener entre 2 y 50 caracteres. \
             El precio debe ser un número positivo"
        );
    }

    #[test]
    fn test_name_length_counts_characters() {
        let rule = PRODUCT.rule("name").unwrap();
        assert_eq!(rule.first_failure(FieldValue::Text("Ñu")), None);
        assert!(rule.first_failure(FieldValue::Text(&"x".repeat(51))).is_some());
    }

    #[test]
    fn test_parse_id_accepts_integral_decimals() {
        assert_eq!(parse_id("1.0"), Some(1));
        assert_eq!(parse_id(" 7 "), Some(7));
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id("0.0"), None);
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("2147483648"), None);
    }

    #[test]
    fn test_id_list_constraints() {
        let rule = ASSOCIATION.rule("material_ids").unwrap();
        assert_eq!(rule.first_failure(FieldValue::Ids(&[1, 2])), None);
        assert_eq!(
            rule.first_failure(FieldValue::Ids(&[])),
            Some("Debe proporcionar al menos un material")
        );
        assert_eq!(
            rule.first_failure(FieldValue::Ids(&[1, 0])),
            Some("IDs de materiales inválidos")
        );
        assert!(rule.first_failure(FieldValue::Ids(&[i64::from(i32::MAX) + 1])).is_some());
    }

    #[test]
    fn test_form_requires_two_materials() {
        let rule = PRODUCT_FORM.rule("materials").unwrap();
        assert!(rule.first_failure(FieldValue::Ids(&[4])).is_some());
        assert_eq!(rule.first_failure(FieldValue::Ids(&[4, 7])), None);
    }

    #[test]
    fn test_form_and_server_share_checks() {
        for field in ["code", "name", "price", "description"] {
            let server = PRODUCT.rule(field).unwrap();
            let form = PRODUCT_FORM.rule(field).unwrap();
            assert_eq!(server.checks, form.checks, "{} drifted", field);
        }
    }

    #[test]
    fn test_material_rules() {
        let code = MATERIAL.rule("code").unwrap();
        assert_eq!(code.first_failure(FieldValue::Text("WOOD1")), None);
        assert_eq!(code.first_failure(FieldValue::Text("STEEL")), None);
        assert!(code.first_failure(FieldValue::Text("WOD")).is_some());
        let description = MATERIAL.rule("description").unwrap();
        assert!(description.first_failure(FieldValue::Text(&"d".repeat(21))).is_some());
    }

    #[test]
    fn test_rules_serialize_as_data() {
        let json = serde_json::to_value(PRODUCT).unwrap();
        assert_eq!(json["name"], "product");
        let checks = &json["fields"][0]["checks"];
        assert_eq!(checks[1]["type"], "length");
        assert_eq!(checks[1]["min"], 5);
        assert_eq!(checks[1]["max"], 15);
        assert_eq!(checks[1]["message"], "El código debe tener entre 5 y 15 caracteres");
    }
}
