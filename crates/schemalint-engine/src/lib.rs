//! schemalint engine - naming and consistency validation
//!
//! This crate implements the rule logic for schemalint:
//! - Rule primitives (case, pattern, prefix/suffix, reserved words)
//! - Table, column, data type and index validators
//! - Project validation with a compliance score
//! - Name suggestions, batch auto-fix and the save gate
//!
//! Everything here is a pure function of its inputs. Entities are borrowed,
//! never mutated.

pub mod case;
pub mod column;
pub mod datatype;
pub mod error;
pub mod fix;
pub mod gate;
pub mod index;
pub mod primitives;
pub mod project;
pub mod suggest;
pub mod table;

pub use case::{convert_case, to_pascal_case, to_snake_case, validate_case};
pub use column::{
    is_forbidden_standalone_name, validate_column_description, validate_column_name, validate_column_structure,
    validate_primary_key_name, FORBIDDEN_STANDALONE_NAMES,
};
pub use datatype::validate_data_type_properties;
pub use error::RuleError;
pub use fix::{apply_fixes, plan_fixes, Rename};
pub use gate::{admit_table, Admission, SaveBlocked};
pub use index::{generate_index_name, validate_index_columns, validate_index_name};
pub use primitives::{
    validate_affixes, validate_default_naming, validate_identifier, validate_pattern, validate_reserved,
    MAX_IDENTIFIER_LENGTH,
};
pub use project::{validate_project, validate_system_columns, ProjectValidator, SYSTEM_COLUMNS};
pub use suggest::suggest_name;
pub use table::{validate_table_description, validate_table_name};
