//! Entity model: projects, tables, columns, indexes and relationships
//!
//! These are plain values handed to the engine by reference. Nothing in this
//! workspace mutates them in place; fixes are applied by building new values.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::rules::NamingRules;

/// Highest DECIMAL/NUMERIC precision SQL Server accepts
pub const MAX_DECIMAL_PRECISION: u8 = 38;

/// MSSQL column data types (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    TinyInt,
    SmallInt,
    Int,
    BigInt,
    Bit,
    Decimal,
    Numeric,
    Money,
    SmallMoney,
    Float,
    Real,
    Date,
    Time,
    DateTime,
    DateTime2,
    SmallDateTime,
    DateTimeOffset,
    Char,
    VarChar,
    Text,
    NChar,
    NVarChar,
    NText,
    Binary,
    VarBinary,
    Image,
    UniqueIdentifier,
    Xml,
}

impl DataType {
    /// Every supported type, in declaration order
    pub const ALL: [DataType; 28] = [
        Self::TinyInt,
        Self::SmallInt,
        Self::Int,
        Self::BigInt,
        Self::Bit,
        Self::Decimal,
        Self::Numeric,
        Self::Money,
        Self::SmallMoney,
        Self::Float,
        Self::Real,
        Self::Date,
        Self::Time,
        Self::DateTime,
        Self::DateTime2,
        Self::SmallDateTime,
        Self::DateTimeOffset,
        Self::Char,
        Self::VarChar,
        Self::Text,
        Self::NChar,
        Self::NVarChar,
        Self::NText,
        Self::Binary,
        Self::VarBinary,
        Self::Image,
        Self::UniqueIdentifier,
        Self::Xml,
    ];

    /// T-SQL keyword for this type
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TinyInt => "TINYINT",
            Self::SmallInt => "SMALLINT",
            Self::Int => "INT",
            Self::BigInt => "BIGINT",
            Self::Bit => "BIT",
            Self::Decimal => "DECIMAL",
            Self::Numeric => "NUMERIC",
            Self::Money => "MONEY",
            Self::SmallMoney => "SMALLMONEY",
            Self::Float => "FLOAT",
            Self::Real => "REAL",
            Self::Date => "DATE",
            Self::Time => "TIME",
            Self::DateTime => "DATETIME",
            Self::DateTime2 => "DATETIME2",
            Self::SmallDateTime => "SMALLDATETIME",
            Self::DateTimeOffset => "DATETIMEOFFSET",
            Self::Char => "CHAR",
            Self::VarChar => "VARCHAR",
            Self::Text => "TEXT",
            Self::NChar => "NCHAR",
            Self::NVarChar => "NVARCHAR",
            Self::NText => "NTEXT",
            Self::Binary => "BINARY",
            Self::VarBinary => "VARBINARY",
            Self::Image => "IMAGE",
            Self::UniqueIdentifier => "UNIQUEIDENTIFIER",
            Self::Xml => "XML",
        }
    }

    /// Types that require an explicit `max_length`
    pub fn is_length_bearing(&self) -> bool {
        matches!(
            self,
            Self::Char | Self::VarChar | Self::NChar | Self::NVarChar | Self::Binary | Self::VarBinary
        )
    }

    /// Upper bound for `max_length`, if the type carries one
    ///
    /// N-prefixed (two bytes per character) types top out at 4000.
    pub fn max_length_limit(&self) -> Option<u32> {
        match self {
            Self::NChar | Self::NVarChar => Some(4000),
            Self::Char | Self::VarChar | Self::Binary | Self::VarBinary => Some(8000),
            _ => None,
        }
    }

    /// DECIMAL and NUMERIC carry precision and scale
    pub fn is_decimal(&self) -> bool {
        matches!(self, Self::Decimal | Self::Numeric)
    }

    /// Integer types are the only ones allowed to be IDENTITY
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::TinyInt | Self::SmallInt | Self::Int | Self::BigInt)
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DataType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModelError::UnknownDataType(s.to_string()))
    }
}

impl TryFrom<String> for DataType {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.as_str().to_string()
    }
}

/// A column in a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Stable identifier assigned by the caller (may be empty)
    #[serde(default)]
    pub id: String,

    /// Column name
    pub name: String,

    /// Human-readable (Korean) description
    #[serde(default)]
    pub description: String,

    /// MSSQL data type
    pub data_type: DataType,

    /// Length for CHAR/VARCHAR/NCHAR/NVARCHAR/BINARY/VARBINARY
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Precision for DECIMAL/NUMERIC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u8>,

    /// Scale for DECIMAL/NUMERIC
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u8>,

    #[serde(default = "default_true")]
    pub nullable: bool,

    #[serde(default)]
    pub primary_key: bool,

    #[serde(default)]
    pub identity: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_seed: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_increment: Option<i64>,

    /// Default expression, rendered verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// 1-based physical/display position
    #[serde(default)]
    pub order_index: u32,
}

fn default_true() -> bool {
    true
}

impl Column {
    /// Create a nullable column with no other properties set
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: String::new(),
            data_type,
            max_length: None,
            precision: None,
            scale: None,
            nullable: true,
            primary_key: false,
            identity: false,
            identity_seed: None,
            identity_increment: None,
            default_value: None,
            order_index: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_precision(mut self, precision: u8, scale: Option<u8>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Mark as primary key (implies NOT NULL)
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    /// Mark as IDENTITY(seed, increment) (implies NOT NULL)
    pub fn with_identity(mut self, seed: i64, increment: i64) -> Self {
        self.identity = true;
        self.nullable = false;
        self.identity_seed = Some(seed);
        self.identity_increment = Some(increment);
        self
    }

    pub fn with_default(mut self, expression: impl Into<String>) -> Self {
        self.default_value = Some(expression.into());
        self
    }

    pub fn with_order(mut self, order_index: u32) -> Self {
        self.order_index = order_index;
        self
    }
}

/// Clustered or nonclustered index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexType {
    Clustered,
    Nonclustered,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clustered => "CLUSTERED",
            Self::Nonclustered => "NONCLUSTERED",
        }
    }
}

impl std::fmt::Display for IndexType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Naming prefix an index must carry, derived from its shape
pub fn index_prefix(index_type: IndexType, unique: bool) -> &'static str {
    match (index_type, unique) {
        (IndexType::Clustered, true) => "PK__",
        (IndexType::Clustered, false) => "CIDX__",
        (IndexType::Nonclustered, _) => "IDX__",
    }
}

/// Sort direction of an index key column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Reference from an index to one of the table's columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexColumn {
    pub column_name: String,

    #[serde(default)]
    pub order: SortOrder,
}

/// An index on a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    #[serde(default)]
    pub id: String,

    pub name: String,

    pub index_type: IndexType,

    #[serde(default)]
    pub unique: bool,

    /// Ordered key columns
    #[serde(default)]
    pub columns: Vec<IndexColumn>,
}

impl Index {
    pub fn new(name: impl Into<String>, index_type: IndexType, unique: bool) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            index_type,
            unique,
            columns: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Append an ascending key column
    pub fn with_column(self, column_name: impl Into<String>) -> Self {
        self.with_sorted_column(column_name, SortOrder::Asc)
    }

    pub fn with_sorted_column(mut self, column_name: impl Into<String>, order: SortOrder) -> Self {
        self.columns.push(IndexColumn {
            column_name: column_name.into(),
            order,
        });
        self
    }

    /// Key column names in key order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.column_name.as_str()).collect()
    }

    /// Prefix this index's name must carry
    pub fn required_prefix(&self) -> &'static str {
        index_prefix(self.index_type, self.unique)
    }
}

/// A table with its columns and indexes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub indexes: Vec<Index>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: String::new(),
            columns: Vec::new(),
            indexes: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Append a column; an unset `order_index` becomes the next position
    pub fn with_column(mut self, mut column: Column) -> Self {
        if column.order_index == 0 {
            column.order_index = self.columns.len() as u32 + 1;
        }
        self.columns.push(column);
        self
    }

    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// Columns sorted by `order_index` (stable for ties)
    pub fn ordered_columns(&self) -> Vec<&Column> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|c| c.order_index);
        columns
    }

    /// Primary key columns in `order_index` order
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        self.ordered_columns()
            .into_iter()
            .filter(|c| c.primary_key)
            .collect()
    }

    /// Find a column by name (case-insensitive, like SQL Server's default collation)
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Column names in `order_index` order
    pub fn column_names(&self) -> Vec<&str> {
        self.ordered_columns().into_iter().map(|c| c.name.as_str()).collect()
    }
}

/// Referential action for a foreign key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReferentialAction {
    NoAction,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

/// Foreign-key style relationship between two tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Constraint name; derived as `FK__{FROM}__{TO}` when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<ReferentialAction>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<ReferentialAction>,
}

impl Relationship {
    pub fn new(
        from_table: impl Into<String>,
        from_column: impl Into<String>,
        to_table: impl Into<String>,
        to_column: impl Into<String>,
    ) -> Self {
        Self {
            name: None,
            from_table: from_table.into(),
            from_column: from_column.into(),
            to_table: to_table.into(),
            to_column: to_column.into(),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn with_on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    /// Explicit name, or `FK__{FROM_TABLE}__{TO_TABLE}`
    pub fn constraint_name(&self) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.clone(),
            _ => format!("FK__{}__{}", self.from_table, self.to_table),
        }
    }
}

/// A modelling project: naming rules plus the entity graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Project-level naming rules; `None` means the default convention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub naming_rules: Option<NamingRules>,

    #[serde(default)]
    pub tables: Vec<Table>,

    #[serde(default)]
    pub relationships: Vec<Relationship>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            description: String::new(),
            naming_rules: None,
            tables: Vec::new(),
            relationships: Vec::new(),
        }
    }

    pub fn with_rules(mut self, rules: NamingRules) -> Self {
        self.naming_rules = Some(rules);
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    pub fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Find a table by name (case-insensitive)
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Load a project from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ModelError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ModelError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_json(&contents)
    }

    /// Parse a project from JSON
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(|e| ModelError::ParseError(e.to_string()))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Errors loading the entity model
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Failed to read {0}: {1}")]
    IoError(String, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown data type '{0}'")]
    UnknownDataType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_type_parsing_is_case_insensitive() {
        assert_eq!("varchar".parse::<DataType>().unwrap(), DataType::VarChar);
        assert_eq!("DATETIME2".parse::<DataType>().unwrap(), DataType::DateTime2);
        assert!(matches!(
            "VARCHAR2".parse::<DataType>(),
            Err(ModelError::UnknownDataType(_))
        ));
    }

    #[test]
    fn data_type_limits() {
        assert_eq!(DataType::NVarChar.max_length_limit(), Some(4000));
        assert_eq!(DataType::VarBinary.max_length_limit(), Some(8000));
        assert_eq!(DataType::Int.max_length_limit(), None);
        assert!(DataType::Numeric.is_decimal());
        assert!(DataType::BigInt.is_integer());
        assert!(!DataType::Decimal.is_integer());
    }

    #[test]
    fn index_prefixes() {
        assert_eq!(index_prefix(IndexType::Clustered, true), "PK__");
        assert_eq!(index_prefix(IndexType::Clustered, false), "CIDX__");
        assert_eq!(index_prefix(IndexType::Nonclustered, true), "IDX__");
        assert_eq!(index_prefix(IndexType::Nonclustered, false), "IDX__");
    }

    #[test]
    fn table_orders_columns_by_order_index() {
        let table = Table::new("USER")
            .with_column(Column::new("B", DataType::Int).with_order(2))
            .with_column(Column::new("A", DataType::Int).with_order(1))
            .with_column(Column::new("C", DataType::Int));

        assert_eq!(table.column_names(), vec!["A", "B", "C"]);
        assert!(table.find_column("a").is_some());
    }

    #[test]
    fn project_json_roundtrip() {
        let project = Project::new("shop").with_table(
            Table::new("USER")
                .with_column(Column::new("USER_ID", DataType::Int).primary_key())
                .with_column(Column::new("NAME", DataType::NVarChar).with_length(100)),
        );

        let json = project.to_json().unwrap();
        assert!(json.contains("\"data_type\": \"NVARCHAR\""));

        let parsed = Project::from_json(&json).unwrap();
        assert_eq!(parsed, project);
    }

    #[test]
    fn unknown_data_type_is_a_parse_error() {
        let json = r#"{"name":"p","tables":[{"name":"T","columns":[{"name":"C","data_type":"JSONB"}]}]}"#;
        let err = Project::from_json(json).unwrap_err();
        assert!(err.to_string().contains("JSONB"));
    }

    #[test]
    fn relationship_constraint_name() {
        let rel = Relationship::new("ORDER", "USER_ID", "USER", "USER_ID");
        assert_eq!(rel.constraint_name(), "FK__ORDER__USER");
    }
}
