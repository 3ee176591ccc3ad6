//! MCP server implementation for the Sapporo food-license catalog.
//!
//! This crate wires the catalog client and aggregation engine into rmcp tool
//! handlers and exposes the MCP-facing tool surface.

mod helpers;
mod tools;
pub mod server;

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{
    ErrorData,
    ServerHandler,
    handler::server::tool::ToolRouter,
    tool,
    tool_handler,
    tool_router,
};
use sapporo_food_core::catalog::CatalogClient;

const SERVER_INSTRUCTIONS: &str = r"sapporo-food-mcp exposes Sapporo City's food-business license catalog as MCP tools.

Workflow:
1. `list_facilities` returns raw facility records (default 10 rows). `search_facilities` runs a
   relevance-ranked keyword search across all fields (e.g. 中央区, スナック, ラーメン).
2. `ward_statistics` and `business_type_statistics` fetch a large batch and aggregate it in
   memory per call; nothing is cached between calls.
3. `ward_detail` reports on one ward by exact name (中央区, 北区, 東区, 白石区, 豊平区, 南区,
   西区, 厚別区, 手稲区, 清田区), with a business-type breakdown and sample facilities.
4. `analysis_prompt` returns a fixed report-writing prompt for a focus area:
   overall, ward, business_type, or trends.

Notes:
- Records use the dataset's Japanese column names: 屋号 (name), 業種区分名 (business type),
  施設所在地 (address), 区名 (ward), 許可番号 (license number), 許可年月日 (license date),
  申請者名 (applicant name). Missing fields aggregate under 'Unknown'.
- Statistics tools return {success, result} envelopes; when the upstream catalog reports a
  failure, its envelope is passed through unchanged.
- `health` returns `ok`.";

/// MCP server wrapper around the catalog client and tool routers.
#[derive(Clone)]
pub struct SapporoFoodMcp {
    tool_router: ToolRouter<Self>,
    catalog: Arc<CatalogClient>,
}

impl SapporoFoodMcp {
    /// Creates a new server owning its catalog client.
    #[must_use]
    pub fn new(catalog: CatalogClient) -> Self {
        Self::with_catalog(Arc::new(catalog))
    }

    /// Creates a new server using a shared catalog client handle.
    #[must_use]
    pub fn with_catalog(catalog: Arc<CatalogClient>) -> Self {
        let tool_router = Self::tool_router_core()
            + Self::tool_router_catalog()
            + Self::tool_router_stats()
            + Self::tool_router_report();
        Self {
            tool_router,
            catalog,
        }
    }

    pub(crate) fn catalog(&self) -> &CatalogClient {
        &self.catalog
    }
}

#[tool_router(router = tool_router_core, vis = "pub")]
impl SapporoFoodMcp {
    #[tool(description = "Health check. Returns 'ok'.")]
    async fn health(&self) -> Result<CallToolResult, ErrorData> {
        Ok(CallToolResult::success(vec![Content::text("ok")]))
    }
}

#[tool_handler]
impl ServerHandler for SapporoFoodMcp {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(SERVER_INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .build(),
            ..Default::default()
        }
    }
}
