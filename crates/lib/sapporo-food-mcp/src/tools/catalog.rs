use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use sapporo_food_core::catalog::DatastoreQuery;
use serde::{Deserialize, Serialize};

use crate::{SapporoFoodMcp, helpers};

const DEFAULT_LIST_LIMIT: u32 = 10;

/// Parameters for listing raw facility records.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ListFacilitiesParams {
    /// Number of records to retrieve. Defaults to 10; recommended maximum is 1000.
    pub limit: Option<u32>,
}

/// Parameters for keyword search across all record fields.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct SearchFacilitiesParams {
    /// Search keyword matched across all fields: a ward (中央区), a business
    /// type (スナック), a facility name, or any other text in the data.
    pub q: String,
}

#[tool_router(router = tool_router_catalog, vis = "pub")]
impl SapporoFoodMcp {
    #[tool(
        description = "List food-business license facility records from Sapporo City's open-data catalog."
    )]
    async fn list_facilities(
        &self,
        Parameters(params): Parameters<ListFacilitiesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let limit = helpers::positive_limit(params.limit, DEFAULT_LIST_LIMIT)?;
        match self.catalog().fetch(&DatastoreQuery::limit(limit)).await {
            Ok(batch) => Ok(CallToolResult::success(vec![Content::json(
                batch.into_raw(),
            )?])),
            Err(err) => helpers::catalog_failure(err),
        }
    }

    #[tool(
        description = "Search facilities by keyword; results are relevance-ranked by the catalog."
    )]
    async fn search_facilities(
        &self,
        Parameters(params): Parameters<SearchFacilitiesParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::required_text(&params.q, "q")?;
        match self.catalog().fetch(&DatastoreQuery::keyword(params.q)).await {
            Ok(batch) => Ok(CallToolResult::success(vec![Content::json(
                batch.into_raw(),
            )?])),
            Err(err) => helpers::catalog_failure(err),
        }
    }
}
