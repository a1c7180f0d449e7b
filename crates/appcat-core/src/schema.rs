//! Declarative record schemas.
//!
//! One descriptor type covers both entity families; the historical
//! divergence between the two application-code length rules is preserved
//! as named presets rather than silently picking one. The descriptors are
//! pure data, consumed by the validation gate, the storage DDL generator
//! and filter field-name checking.

/// Primitive kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Int,
    Bool,
    DateTime,
}

/// Constraints for a single document field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub unique: bool,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    /// Regex the value must match (anchored pattern source).
    pub pattern: Option<&'static str>,
    /// DDL default literal, e.g. `"true"`.
    pub default: Option<&'static str>,
    /// Set exactly once at creation; a patch must not carry this field.
    pub immutable: bool,
}

impl FieldSpec {
    fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            required: false,
            unique: false,
            min_len: None,
            max_len: None,
            pattern: None,
            default: None,
            immutable: false,
        }
    }

    pub fn text(name: &'static str) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn int(name: &'static str) -> Self {
        Self::new(name, FieldKind::Int)
    }

    pub fn boolean(name: &'static str) -> Self {
        Self::new(name, FieldKind::Bool)
    }

    pub fn datetime(name: &'static str) -> Self {
        Self::new(name, FieldKind::DateTime)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_len = Some(min);
        self.max_len = Some(max);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: &'static str) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn default_literal(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    pub fn immutable(mut self) -> Self {
        self.immutable = true;
        self
    }
}

/// Which application-code length rule to enforce.
///
/// Two rules coexist in the platform; neither is authoritative, so the
/// caller picks one. [`RecordSchema::application`] documents the default
/// used by constructors further up the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePreset {
    /// 1–4 characters; application name restricted to alphabetic + space.
    Compact,
    /// 3–20 characters; no application-name pattern.
    Standard,
}

/// Alphabetic + space, the strictest historical name rule.
pub const NAME_PATTERN: &str = "^[A-Za-z ]*$";

/// Declarative schema for one entity family.
#[derive(Debug, Clone)]
pub struct RecordSchema {
    /// Entity label used in error messages, e.g. `"application"`.
    pub entity: &'static str,
    /// Storage table name.
    pub table: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Schema for the Application record family.
    pub fn application(preset: CodePreset) -> Self {
        let code = match preset {
            CodePreset::Compact => FieldSpec::text("application_code")
                .required()
                .unique()
                .length(1, 4),
            CodePreset::Standard => FieldSpec::text("application_code")
                .required()
                .unique()
                .length(3, 20),
        };
        let name = match preset {
            CodePreset::Compact => FieldSpec::text("application_name")
                .required()
                .length(1, 100)
                .pattern(NAME_PATTERN),
            CodePreset::Standard => FieldSpec::text("application_name").required().length(1, 100),
        };

        RecordSchema {
            entity: "application",
            table: "application",
            fields: vec![
                FieldSpec::text("tenant_id").required().length(1, 64),
                code,
                name,
                FieldSpec::boolean("enabled").default_literal("true"),
                FieldSpec::text("description").max_length(255),
                FieldSpec::text("logo"),
                FieldSpec::text("favicon"),
                FieldSpec::text("created_by").required().immutable(),
                FieldSpec::datetime("created_date").required().immutable(),
                FieldSpec::text("updated_by"),
                FieldSpec::datetime("updated_date"),
            ],
        }
    }

    /// Schema for the ApplicationEntity record family: keyed by an integer
    /// `code` plus an `application_id`, otherwise structurally identical
    /// to [`RecordSchema::application`].
    pub fn application_entity() -> Self {
        RecordSchema {
            entity: "application entity",
            table: "application_entity",
            fields: vec![
                FieldSpec::text("tenant_id").required().length(1, 64),
                FieldSpec::int("code").required().unique(),
                FieldSpec::int("application_id").required(),
                FieldSpec::text("application_name").required().length(1, 100),
                FieldSpec::boolean("enabled").default_literal("true"),
                FieldSpec::text("description").max_length(255),
                FieldSpec::text("logo"),
                FieldSpec::text("favicon"),
                FieldSpec::text("created_by").required().immutable(),
                FieldSpec::datetime("created_date").required().immutable(),
                FieldSpec::text("updated_by"),
                FieldSpec::datetime("updated_date"),
            ],
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
