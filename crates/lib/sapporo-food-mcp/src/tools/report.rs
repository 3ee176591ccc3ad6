use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use sapporo_food_core::report::{self, FocusArea};
use serde::{Deserialize, Serialize};

use crate::SapporoFoodMcp;

/// Parameters for selecting an analysis prompt.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct AnalysisPromptParams {
    /// Analysis focus: "overall", "ward", "business_type", or "trends".
    /// Anything else falls back to "overall".
    pub focus_area: Option<String>,
}

#[tool_router(router = tool_router_report, vis = "pub")]
impl SapporoFoodMcp {
    #[tool(
        description = "Return a report-writing prompt for analyzing Sapporo's food-business landscape."
    )]
    async fn analysis_prompt(
        &self,
        Parameters(params): Parameters<AnalysisPromptParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let focus = params
            .focus_area
            .as_deref()
            .map_or(FocusArea::Overall, FocusArea::parse);
        Ok(CallToolResult::success(vec![Content::text(
            report::analysis_prompt(focus),
        )]))
    }
}
