//! Composable shape descriptions for configuration documents.
//!
//! A [`Schema`] describes the valid shape of one node: primitive constraints,
//! nested records with optional fields, homogeneous sequences, string-keyed
//! maps, and tagged unions (first matching variant wins). Schemas are built
//! once with the constructors below and never mutated afterwards.

// ============================================================================
// Schema Tree
// ============================================================================

/// Shape description for one document node.
#[derive(Clone, Debug)]
pub enum Schema {
    /// Boolean scalar.
    Bool,
    /// Integer scalar with optional inclusive bounds.
    Int(IntSchema),
    /// Floating-point scalar (integers accepted) with optional inclusive bounds.
    Float(FloatSchema),
    /// String scalar with length and enumeration constraints.
    Str(StrSchema),
    /// Record with a fixed field list.
    Record(RecordSchema),
    /// String-keyed map of homogeneous values.
    Map(Box<Schema>),
    /// Ordered sequence of homogeneous items.
    Seq(Box<Schema>),
    /// Tagged union: validated against each variant in order, first match wins.
    Union(Vec<Schema>),
    /// Accepts any value unchanged.
    Any,
}

#[derive(Clone, Debug, Default)]
pub struct IntSchema {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

#[derive(Clone, Debug, Default)]
pub struct FloatSchema {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Clone, Debug, Default)]
pub struct StrSchema {
    pub non_empty: bool,
    pub min_len: Option<usize>,
    pub max_len: Option<usize>,
    pub one_of: Option<Vec<String>>,
}

#[derive(Clone, Debug)]
pub struct RecordSchema {
    pub fields: Vec<FieldSchema>,
}

/// One record field: name, required flag, and value schema.
#[derive(Clone, Debug)]
pub struct FieldSchema {
    pub name: String,
    pub required: bool,
    pub schema: Schema,
}

/// Required record field.
pub fn field(name: impl Into<String>, schema: impl Into<Schema>) -> FieldSchema {
    FieldSchema {
        name: name.into(),
        required: true,
        schema: schema.into(),
    }
}

/// Optional record field.
pub fn optional(name: impl Into<String>, schema: impl Into<Schema>) -> FieldSchema {
    FieldSchema {
        name: name.into(),
        required: false,
        schema: schema.into(),
    }
}

// ============================================================================
// Builders
// ============================================================================

impl IntSchema {
    pub fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: i64) -> Self {
        self.max = Some(max);
        self
    }
}

impl FloatSchema {
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

impl StrSchema {
    pub fn non_empty(mut self) -> Self {
        self.non_empty = true;
        self
    }

    pub fn min_len(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    pub fn max_len(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Restricts the string to an enumerated set of allowed values.
    pub fn one_of<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

impl From<IntSchema> for Schema {
    fn from(s: IntSchema) -> Self {
        Schema::Int(s)
    }
}

impl From<FloatSchema> for Schema {
    fn from(s: FloatSchema) -> Self {
        Schema::Float(s)
    }
}

impl From<StrSchema> for Schema {
    fn from(s: StrSchema) -> Self {
        Schema::Str(s)
    }
}

impl Schema {
    pub fn bool() -> Schema {
        Schema::Bool
    }

    pub fn int() -> IntSchema {
        IntSchema::default()
    }

    pub fn float() -> FloatSchema {
        FloatSchema::default()
    }

    pub fn string() -> StrSchema {
        StrSchema::default()
    }

    pub fn record(fields: impl IntoIterator<Item = FieldSchema>) -> Schema {
        Schema::Record(RecordSchema {
            fields: fields.into_iter().collect(),
        })
    }

    pub fn map(value: impl Into<Schema>) -> Schema {
        Schema::Map(Box::new(value.into()))
    }

    pub fn seq(item: impl Into<Schema>) -> Schema {
        Schema::Seq(Box::new(item.into()))
    }

    pub fn union(variants: impl IntoIterator<Item = Schema>) -> Schema {
        Schema::Union(variants.into_iter().collect())
    }

    pub fn any() -> Schema {
        Schema::Any
    }

    /// Derives a variant where every top-level record field is optional.
    ///
    /// Non-record schemas are returned unchanged.
    pub fn partial(&self) -> Schema {
        match self {
            Schema::Record(record) => Schema::Record(RecordSchema {
                fields: record
                    .fields
                    .iter()
                    .map(|f| FieldSchema {
                        name: f.name.clone(),
                        required: false,
                        schema: f.schema.clone(),
                    })
                    .collect(),
            }),
            other => other.clone(),
        }
    }

    /// Derives a variant where every record field, recursively, is optional.
    pub fn deep_partial(&self) -> Schema {
        match self {
            Schema::Record(record) => Schema::Record(RecordSchema {
                fields: record
                    .fields
                    .iter()
                    .map(|f| FieldSchema {
                        name: f.name.clone(),
                        required: false,
                        schema: f.schema.deep_partial(),
                    })
                    .collect(),
            }),
            Schema::Map(value) => Schema::Map(Box::new(value.deep_partial())),
            Schema::Seq(item) => Schema::Seq(Box::new(item.deep_partial())),
            Schema::Union(variants) => {
                Schema::Union(variants.iter().map(Schema::deep_partial).collect())
            }
            other => other.clone(),
        }
    }
}
