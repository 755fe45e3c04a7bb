//! MCP server exposing the Clockify time-tracking API.
//!
//! Workspaces, users, clients, projects, tasks and time entries are
//! reachable as tools. Each tool resolves omitted workspace and user ids
//! against the authenticated user, calls Clockify once per lookup and
//! returns a trimmed JSON view of the result.

use rmcp::{
    ServerHandler,
    handler::server::router::tool::ToolRouter,
    model::{Implementation, ServerCapabilities, ServerInfo},
    tool_handler,
};
pub mod client;
pub mod config;
pub mod error;
pub mod service;
pub mod shape;
pub mod tools;

use crate::client::Client;
use crate::config::Config;
use crate::service::ClockifyService;

/// MCP server backed by the Clockify REST API.
#[derive(Debug, Clone)]
pub struct ClockifyServer {
    pub(crate) service: ClockifyService,
    pub(crate) tool_router: ToolRouter<Self>,
}

impl ClockifyServer {
    /// Build the transport and service from startup configuration.
    pub fn from_config(config: Config) -> error::Result<Self> {
        Ok(Self::new(ClockifyService::new(Client::new(config)?)))
    }
}

#[tool_handler]
impl ServerHandler for ClockifyServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "wmcp-clockify".into(),
                title: Some("Walrus MCP Clockify Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Clockify server for reading workspaces, users, clients, projects, tasks and \
                 time entries, and for adding or duplicating time entries. Workspace and user \
                 ids default to the authenticated user's active workspace and own id."
                    .into(),
            ),
        }
    }
}
