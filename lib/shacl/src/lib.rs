//! A [SHACL Core](https://www.w3.org/TR/shacl/#core-components) validator for LaDeRR graphs.
//!
//! ```
//! use laderr_model::Graph;
//! use laderr_shacl::{CoreValidator, ShapeValidator, ValidationOptions};
//!
//! let report = CoreValidator::new()
//!     .validate(&Graph::new(), &Graph::new(), &ValidationOptions::default())
//!     .unwrap();
//! assert!(report.conforms());
//! ```

mod error;
mod graph;
pub mod inference;
mod options;
mod path;
mod report;
mod shape;
mod validator;

pub use error::ShaclError;
pub use options::{Inference, ParseInferenceError, ValidationOptions};
pub use path::Path;
pub use report::{Severity, ValidationReport, ValidationResult};
pub use validator::{CoreValidator, ShapeValidator};

/// Validates `data` against `shapes` with the [`CoreValidator`].
pub fn validate(
    data: &laderr_model::Graph,
    shapes: &laderr_model::Graph,
    options: &ValidationOptions,
) -> Result<ValidationReport, ShaclError> {
    CoreValidator::new().validate(data, shapes, options)
}
