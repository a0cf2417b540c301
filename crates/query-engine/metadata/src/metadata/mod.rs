//! Metadata information regarding the query template, its parameters and the rows it returns.

pub mod holder;
pub mod parameters;
pub mod template;

// re-export without modules
pub use holder::*;
pub use parameters::*;
pub use template::*;

/// Metadata information.
///
/// Fixed when a data provider is constructed and shared by every request it serves.
#[derive(Clone, PartialEq, Debug)]
pub struct Metadata {
    pub template: QueryTemplate,
    pub parameters: StaticParameters,
    pub holder: HolderInfo,
}
