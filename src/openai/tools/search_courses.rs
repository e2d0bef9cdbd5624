//! `search_courses` tool backed by the course catalog.

use crate::catalog::{CatalogClient, CourseQuery};
use crate::openai::tools::{FunctionSchema, HandlerError, ToolDefinition, ToolParametersBuilder};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub const SEARCH_COURSES: &str = "search_courses";

pub fn search_courses_schema() -> FunctionSchema {
    let parameters = ToolParametersBuilder::new_object()
        .add_string("role", Some("The role of the learner (i.e. developer, data scientist, student, etc.)"))
        .add_string("product", Some("The product that the lesson is covering (i.e. Azure, Power BI, etc.)"))
        .add_string(
            "level",
            Some("The level of experience the learner has prior to taking the course (i.e. beginner, intermediate, advanced)"),
        )
        .required("role")
        .additional_properties(false)
        .build();

    FunctionSchema::new(
        SEARCH_COURSES,
        "Retrieves courses from the search index based on the parameters provided",
        parameters,
    )
}

/// Build the tool. The result is a JSON array of `{title, url}` (`[]` when the
/// catalog has no modules).
pub fn build_search_courses_tool(catalog: CatalogClient) -> ToolDefinition {
    ToolDefinition::new(
        search_courses_schema(),
        Arc::new(move |args: &Map<String, Value>| -> Result<String, HandlerError> {
            let query: CourseQuery = serde_json::from_value(Value::Object(args.clone()))
                .map_err(|e| HandlerError::InvalidArguments(e.to_string()))?;
            let courses = catalog
                .search(&query)
                .map_err(|e| HandlerError::Failed(Box::new(e)))?;
            info!(target: "catalog", role = %query.role, found = courses.len(), "search_courses_done");
            serde_json::to_string(&courses).map_err(|e| HandlerError::Failed(Box::new(e)))
        }),
    )
}
