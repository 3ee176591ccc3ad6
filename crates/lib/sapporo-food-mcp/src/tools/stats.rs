use rmcp::{
    ErrorData,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content},
    schemars,
    tool,
    tool_router,
};
use sapporo_food_core::catalog::DatastoreQuery;
use sapporo_food_core::stats;
use serde::{Deserialize, Serialize};

use crate::SapporoFoodMcp;
use crate::helpers::{self, Envelope};

/// Batch size fetched for citywide ward statistics.
const STATISTICS_FETCH_LIMIT: u32 = 5000;
const DEFAULT_TYPE_STATS_LIMIT: u32 = 5000;
const DEFAULT_DETAIL_LIMIT: u32 = 1000;

/// Parameters for business-type statistics.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct BusinessTypeStatisticsParams {
    /// Number of records fetched for the analysis. Defaults to 5000;
    /// recommended maximum is 10000.
    pub limit: Option<u32>,
}

/// Parameters for a single-ward detail report.
#[derive(Debug, Clone, Serialize, Deserialize, schemars::JsonSchema)]
pub struct WardDetailParams {
    /// Ward name, matched exactly. Valid wards: 中央区, 北区, 東区, 白石区,
    /// 豊平区, 南区, 西区, 厚別区, 手稲区, 清田区.
    pub ward_name: String,
    /// Number of records fetched before filtering. Defaults to 1000;
    /// recommended maximum is 5000.
    pub limit: Option<u32>,
}

#[tool_router(router = tool_router_stats, vis = "pub")]
impl SapporoFoodMcp {
    #[tool(
        description = "Aggregate facilities per ward, with nested business-type counts and a citywide summary."
    )]
    async fn ward_statistics(&self) -> Result<CallToolResult, ErrorData> {
        match self
            .catalog()
            .fetch(&DatastoreQuery::limit(STATISTICS_FETCH_LIMIT))
            .await
        {
            Ok(batch) => {
                let statistics = stats::reduce_by_ward(batch.records());
                Ok(CallToolResult::success(vec![Content::json(Envelope::ok(
                    statistics,
                ))?]))
            }
            Err(err) => helpers::catalog_failure(err),
        }
    }

    #[tool(
        description = "Aggregate facilities per business type, with nested ward distribution and a ranking summary."
    )]
    async fn business_type_statistics(
        &self,
        Parameters(params): Parameters<BusinessTypeStatisticsParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let limit = helpers::positive_limit(params.limit, DEFAULT_TYPE_STATS_LIMIT)?;
        match self.catalog().fetch(&DatastoreQuery::limit(limit)).await {
            Ok(batch) => {
                let statistics = stats::reduce_by_business_type(batch.records());
                Ok(CallToolResult::success(vec![Content::json(Envelope::ok(
                    statistics,
                ))?]))
            }
            Err(err) => helpers::catalog_failure(err),
        }
    }

    #[tool(
        description = "Detailed report for one ward: totals, business-type breakdown, and sample facilities."
    )]
    async fn ward_detail(
        &self,
        Parameters(params): Parameters<WardDetailParams>,
    ) -> Result<CallToolResult, ErrorData> {
        helpers::required_text(&params.ward_name, "ward_name")?;
        let limit = helpers::positive_limit(params.limit, DEFAULT_DETAIL_LIMIT)?;
        // The ward name doubles as the catalog keyword to shrink the batch;
        // exact matching happens locally.
        let query = DatastoreQuery::keyword(params.ward_name.as_str()).with_limit(limit);
        match self.catalog().fetch(&query).await {
            Ok(batch) => {
                let detail = stats::ward_detail(batch.records(), &params.ward_name);
                Ok(CallToolResult::success(vec![Content::json(Envelope::ok(
                    detail,
                ))?]))
            }
            Err(err) => helpers::catalog_failure(err),
        }
    }
}
