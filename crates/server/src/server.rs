//! MCP server handler: `tools/list` and `tools/call` backed by the dispatcher.

use evolution_mcp_tools::{Dispatcher, ResultEnvelope, listing};
use rmcp::model::{
    CallToolRequestParams, CallToolResult, Content, ErrorData, Implementation, JsonObject,
    ListToolsResult, PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::service::RequestContext;
use rmcp::{RoleServer, ServerHandler};
use serde_json::Value;
use std::future::Future;

const INSTRUCTIONS: &str = "Tools for the Evolution WhatsApp API. Instance-scoped tools act on \
the instance configured for this server; instance management tools (create_instance, \
fetch_instances, delete_instance) act on the whole server. Phone numbers include the country \
code, e.g. 5511999998888. Chat identifiers are JIDs such as 5511999998888@s.whatsapp.net or \
123456@g.us.";

#[derive(Clone)]
pub struct EvolutionServer {
    dispatcher: Dispatcher,
}

impl EvolutionServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Run one tool call. Unknown tools become a protocol error; every other failure is a
    /// regular (text) result.
    pub async fn handle_call(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<CallToolResult, ErrorData> {
        let arguments = arguments.map_or(Value::Null, Value::Object);
        let envelope = self
            .dispatcher
            .dispatch(name, arguments)
            .await
            .map_err(|e| ErrorData::invalid_params(e.to_string(), None))?;
        Ok(to_call_tool_result(envelope))
    }
}

fn to_call_tool_result(envelope: ResultEnvelope) -> CallToolResult {
    CallToolResult::success(
        envelope
            .content
            .into_iter()
            .map(|c| Content::text(c.text))
            .collect(),
    )
}

impl ServerHandler for EvolutionServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListToolsResult::with_all_items(
            listing::tools().to_vec(),
        )))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move { self.handle_call(&request.name, request.arguments).await }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Evolution WhatsApp API".to_string()),
                ..Default::default()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }
}
