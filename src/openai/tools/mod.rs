//! Tools module aggregator.
//!
//! `core` holds the schema / handler / dispatch table types; each concrete
//! capability gets its own file.

mod core;
mod search_courses;

pub use self::core::{
    DispatchTable,
    FunctionSchema,
    HandlerError,
    ToolDefinition,
    ToolHandler,
    ToolParameters,
    ToolParametersBuilder,
};
pub use search_courses::{build_search_courses_tool, search_courses_schema, SEARCH_COURSES};
