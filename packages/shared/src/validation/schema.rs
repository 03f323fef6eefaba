//! # バリデーションスキーマ
//!
//! スキーマはアプリケーション起動時に一度だけ構築し、以降は読み取り専用で共有する。

use serde_json::Value;

/// フィールドの期待型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Number,
    Boolean,
}

/// リクエストのセクション
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Path,
    Query,
    Body,
}

impl Section {
    /// エラーのフィールドパスと正規化後のキーに使う名前
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
        }
    }

    /// 文字列で届く値を型変換するセクションかどうか
    pub fn coerces_strings(self) -> bool {
        matches!(self, Self::Path | Self::Query)
    }
}

/// 1 フィールド分のルール
///
/// 既定では必須。[`optional`](Self::optional) または
/// [`default_value`](Self::default_value) で任意フィールドになる。
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    name:       &'static str,
    field_type: FieldType,
    required:   bool,
    min_length: Option<usize>,
    max_length: Option<usize>,
    allowed:    Option<&'static [&'static str]>,
    default:    Option<Value>,
}

impl FieldRule {
    fn new(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
            min_length: None,
            max_length: None,
            allowed: None,
            default: None,
        }
    }

    pub fn string(name: &'static str) -> Self {
        Self::new(name, FieldType::String)
    }

    pub fn integer(name: &'static str) -> Self {
        Self::new(name, FieldType::Integer)
    }

    pub fn number(name: &'static str) -> Self {
        Self::new(name, FieldType::Number)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldType::Boolean)
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// 文字数の下限（Unicode スカラー値単位）
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    /// 文字数の上限（Unicode スカラー値単位）
    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// 許可する値の列挙（文字列フィールドのみ）
    pub fn one_of(mut self, allowed: &'static [&'static str]) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// 欠落時のデフォルト値。フィールドは任意になる。
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn min(&self) -> Option<usize> {
        self.min_length
    }

    pub fn max(&self) -> Option<usize> {
        self.max_length
    }

    pub fn allowed(&self) -> Option<&'static [&'static str]> {
        self.allowed
    }

    pub fn default_ref(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// オブジェクト 1 つ分のスキーマ（フィールドルールの順序付き集合）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    fields: Vec<FieldRule>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }
}

/// 1 ルート分のリクエストスキーマ
///
/// 定義されていないセクションは検証も出力もしない。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestSchema {
    path:  Option<ObjectSchema>,
    query: Option<ObjectSchema>,
    body:  Option<ObjectSchema>,
}

impl RequestSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(mut self, schema: ObjectSchema) -> Self {
        self.path = Some(schema);
        self
    }

    pub fn query(mut self, schema: ObjectSchema) -> Self {
        self.query = Some(schema);
        self
    }

    pub fn body(mut self, schema: ObjectSchema) -> Self {
        self.body = Some(schema);
        self
    }

    pub fn section(&self, section: Section) -> Option<&ObjectSchema> {
        match section {
            Section::Path => self.path.as_ref(),
            Section::Query => self.query.as_ref(),
            Section::Body => self.body.as_ref(),
        }
    }
}
