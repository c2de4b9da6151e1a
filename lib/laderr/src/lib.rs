#![doc = include_str!("../README.md")]
#![doc(test(attr(deny(warnings))))]

pub mod base_uri;
mod config;
pub mod document;
mod error;
pub mod io;
pub mod mapping;
pub mod pipeline;
pub mod report;
pub mod resources;

pub use crate::base_uri::{BaseUri, DEFAULT_BASE_URI};
pub use crate::config::LaderrConfig;
pub use crate::document::Document;
pub use crate::error::{
    ConfigError, DocumentError, GraphBuildError, LaderrError, ResourceError, SerializerError,
    StructureError,
};
pub use crate::pipeline::{Pipeline, SpecificationGraph, Validation};

pub mod model {
    pub use laderr_model::*;
}

pub mod shacl {
    pub use laderr_shacl::*;
}
