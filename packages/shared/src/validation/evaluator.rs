//! # スキーマ評価器
//!
//! [`RequestSchema`] に対して [`RequestInput`] を評価し、正規化済みの JSON か
//! フィールドエラー一覧を返す。
//!
//! 正規化済み JSON は `{ "path": {...}, "query": {...}, "body": {...} }` の形で、
//! スキーマが定義したセクションだけを含む。

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use thiserror::Error;

use super::schema::{FieldRule, FieldType, ObjectSchema, RequestSchema, Section};

/// フィールド単位のエラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// ドット区切りのフィールドパス（例: `body.name`）
    pub field:   String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field:   field.into(),
            message: message.into(),
        }
    }
}

/// 収集されたバリデーションエラー（1 件以上）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation Error")]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

/// 評価対象のリクエスト
///
/// path と query はルーター・URL から取り出した文字列値、body は JSON。
#[derive(Debug, Clone, PartialEq)]
pub struct RequestInput {
    pub path:  Map<String, Value>,
    pub query: Map<String, Value>,
    pub body:  Value,
}

impl Default for RequestInput {
    fn default() -> Self {
        Self {
            path:  Map::new(),
            query: Map::new(),
            body:  Value::Object(Map::new()),
        }
    }
}

impl RequestInput {
    pub fn with_body(body: Value) -> Self {
        Self {
            body,
            ..Self::default()
        }
    }
}

impl RequestSchema {
    /// 入力を検証し、型変換・デフォルト補完済みの JSON を返す
    ///
    /// すべてのセクション・フィールドを評価してからエラーをまとめて返す。
    pub fn validate(&self, input: RequestInput) -> Result<Value, ValidationErrors> {
        let RequestInput { path, query, body } = input;
        let sections = [
            (Section::Path, Value::Object(path)),
            (Section::Query, Value::Object(query)),
            (Section::Body, body),
        ];

        let mut errors = Vec::new();
        let mut output = Map::new();

        for (section, value) in sections {
            let Some(schema) = self.section(section) else {
                continue;
            };
            if let Some(normalized) = validate_section(section, schema, value, &mut errors) {
                output.insert(section.as_str().to_string(), normalized);
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(ValidationErrors { errors })
        }
    }
}

fn validate_section(
    section: Section,
    schema: &ObjectSchema,
    value: Value,
    errors: &mut Vec<FieldError>,
) -> Option<Value> {
    let mut map = match value {
        Value::Object(map) => map,
        other => {
            errors.push(FieldError::new(
                section.as_str(),
                format!("Expected object, received {}", type_name(&other)),
            ));
            return None;
        }
    };

    let mut normalized = Map::new();
    for rule in schema.fields() {
        match validate_field(section, rule, map.remove(rule.name())) {
            Ok(Some(value)) => {
                normalized.insert(rule.name().to_string(), value);
            }
            Ok(None) => {}
            Err(message) => errors.push(FieldError::new(
                format!("{}.{}", section.as_str(), rule.name()),
                message,
            )),
        }
    }

    Some(Value::Object(normalized))
}

fn validate_field(
    section: Section,
    rule: &FieldRule,
    raw: Option<Value>,
) -> Result<Option<Value>, String> {
    let Some(raw) = raw else {
        // デフォルト値は検証しない
        if let Some(default) = rule.default_ref() {
            return Ok(Some(default.clone()));
        }
        if rule.is_required() {
            return Err("Required".to_string());
        }
        return Ok(None);
    };

    let value = if section.coerces_strings() {
        coerce(rule.field_type(), raw)?
    } else {
        raw
    };

    let value = check_type(rule.field_type(), value)?;

    if let Some(allowed) = rule.allowed() {
        check_allowed(allowed, &value)?;
    }
    if let Value::String(s) = &value {
        check_length(rule, s)?;
    }

    Ok(Some(value))
}

/// 文字列で届いた値を期待型に変換する
fn coerce(field_type: FieldType, raw: Value) -> Result<Value, String> {
    let s = match raw {
        Value::String(s) => s,
        other => return Ok(other),
    };

    match field_type {
        FieldType::String => Ok(Value::String(s)),
        FieldType::Integer => {
            if let Ok(n) = s.trim().parse::<i64>() {
                return Ok(Value::from(n));
            }
            // "1e3" や桁あふれは数値として渡し、整数判定は check_type に任せる
            parse_finite(&s)
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| "Expected number, received nan".to_string())
        }
        FieldType::Number => parse_finite(&s)
            .and_then(Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| "Expected number, received nan".to_string()),
        FieldType::Boolean => match s.as_str() {
            "true" => Ok(Value::Bool(true)),
            "false" => Ok(Value::Bool(false)),
            _ => Err("Expected boolean, received string".to_string()),
        },
    }
}

/// i64 に収まる浮動小数点の上限（2^63、この値自体は含まない）
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn check_type(field_type: FieldType, value: Value) -> Result<Value, String> {
    match (field_type, value) {
        (FieldType::String, value @ Value::String(_))
        | (FieldType::Number, value @ Value::Number(_))
        | (FieldType::Boolean, value @ Value::Bool(_)) => Ok(value),
        (FieldType::Integer, Value::Number(n)) => {
            if n.is_i64() {
                return Ok(Value::Number(n));
            }
            // 5.0 のような整数値の浮動小数点は整数として扱う
            match n.as_f64() {
                Some(f) if f.fract() != 0.0 => {
                    Err("Expected integer, received float".to_string())
                }
                Some(f) if (-I64_BOUND..I64_BOUND).contains(&f) => Ok(Value::from(f as i64)),
                _ => Err(format!(
                    "Number must be between {} and {}",
                    i64::MIN,
                    i64::MAX
                )),
            }
        }
        (expected, actual) => Err(format!(
            "Expected {}, received {}",
            expected_name(expected),
            type_name(&actual)
        )),
    }
}

fn check_allowed(allowed: &[&str], value: &Value) -> Result<(), String> {
    let options = allowed
        .iter()
        .map(|v| format!("'{v}'"))
        .collect::<Vec<_>>()
        .join(" | ");

    match value {
        Value::String(s) if allowed.contains(&s.as_str()) => Ok(()),
        Value::String(s) => Err(format!(
            "Invalid enum value. Expected {options}, received '{s}'"
        )),
        other => Err(format!("Expected {options}, received {}", type_name(other))),
    }
}

fn check_length(rule: &FieldRule, s: &str) -> Result<(), String> {
    let len = s.chars().count();
    match (rule.min(), rule.max()) {
        (Some(min), _) if len < min => Err(format!(
            "String must contain at least {min} character(s)"
        )),
        (_, Some(max)) if len > max => Err(format!(
            "String must contain at most {max} character(s)"
        )),
        _ => Ok(()),
    }
}

fn expected_name(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String => "string",
        FieldType::Integer | FieldType::Number => "number",
        FieldType::Boolean => "boolean",
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
