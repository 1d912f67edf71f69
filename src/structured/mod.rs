//! Structured output: the `response_format` request shapes and checks of the
//! model output against them.
//!
//! - [`ResponseFormat`]: `json_object` or a named `json_schema`
//! - [`SchemaDescriptor`]: recursive object / array-of descriptor
//! - [`SchemaGenerator`]: builder for object descriptors
//! - [`OutputValidator`], [`StructuredOutput`]: validate what came back
//!
//! # Examples
//!
//! ```
//! use ai_lib_openrouter::structured::{
//!     PropertyType, ResponseFormat, SchemaGenerator, StructuredOutput,
//! };
//!
//! let schema = SchemaGenerator::new()
//!     .add_required("name", PropertyType::String)
//!     .build();
//! let format = ResponseFormat::json_schema("person", true, schema);
//!
//! let output = StructuredOutput::check(r#"{"name": "Alice"}"#, &format).unwrap();
//! assert!(output.is_valid());
//! ```

pub mod format;
pub mod schema;
pub mod validator;

pub use format::{
    JsonSchemaFormat, ObjectSchema, PropertySchema, PropertyType, ResponseFormat,
    SchemaDescriptor, TypeSpec,
};
pub use schema::{json_schema_from_type, SchemaGenerator};
pub use validator::{OutputValidator, SchemaViolation, StructuredOutput};
