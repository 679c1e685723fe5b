//! Pipeline description generation.
//!
//! The engine does not evaluate pipelines; it describes one stage by stage
//! and the frame-source engine turns that into its own script language.
//!
//! # Architecture
//!
//! - **stages**: the `PipelineDescription` value object
//! - **builder**: builds a description from a project

mod builder;
mod stages;

pub use builder::PipelineBuilder;
pub use stages::{
    format_stages_pretty, CustomListStage, Decimation, PipelineDescription, SectionFilter,
    SelectEveryRange, Stage,
};
