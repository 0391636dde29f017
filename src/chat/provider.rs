//! Tool discovery and invocation
//!
//! [`McpToolProvider`] spawns an MCP server as a child process over stdio,
//! lists its tools once at startup, and forwards tool calls to it. The chat
//! session only sees the [`ToolProvider`] trait, so tests can swap in a
//! scripted double.

use crate::llm::ToolDefinition;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use rmcp::{
    model::CallToolRequestParam,
    service::{RoleClient, RunningService, ServiceExt},
    transport::{ConfigureCommandExt, TokioChildProcess},
};
use tokio::process::Command;
use tracing::{debug, info, warn};

/// The chat session's view of an external tool source
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Tool definitions discovered at startup
    fn tools(&self) -> &[ToolDefinition];

    /// Invokes a tool and returns its textual payload
    async fn call(&self, name: &str, arguments: &serde_json::Value) -> Result<String>;
}

/// MCP stdio client wrapping a spawned server process
pub struct McpToolProvider {
    service: RunningService<RoleClient, ()>,
    tools: Vec<ToolDefinition>,
}

impl McpToolProvider {
    /// Spawns the MCP server from a whitespace-separated command line and
    /// lists its tools
    ///
    /// `FIRECRAWL_API_KEY` is forwarded to the child when set, since the
    /// default server needs it.
    pub async fn connect(command_line: &str) -> Result<Self> {
        let mut parts = command_line.split_whitespace();
        let Some(program) = parts.next() else {
            bail!("MCP command is empty");
        };
        let args: Vec<&str> = parts.collect();

        info!("Spawning MCP server: {}", command_line);
        let transport = TokioChildProcess::new(Command::new(program).configure(|cmd| {
            for arg in &args {
                cmd.arg(arg);
            }
            if let Ok(key) = std::env::var("FIRECRAWL_API_KEY") {
                cmd.env("FIRECRAWL_API_KEY", key);
            }
        }))
        .with_context(|| format!("failed to spawn MCP server '{command_line}'"))?;

        let service = ()
            .serve(transport)
            .await
            .context("MCP handshake failed")?;

        let listed = service
            .list_tools(Default::default())
            .await
            .context("failed to list MCP tools")?;

        let tools: Vec<ToolDefinition> = listed
            .tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name.clone().into_owned(),
                description: t
                    .description
                    .clone()
                    .map(|d| d.into_owned())
                    .unwrap_or_default(),
                parameters: serde_json::Value::Object((*t.input_schema).clone()),
            })
            .collect();

        info!("Discovered {} MCP tools", tools.len());
        Ok(Self { service, tools })
    }

    /// Shuts the server process down cleanly
    pub async fn shutdown(self) -> Result<()> {
        self.service.cancel().await.context("MCP shutdown failed")?;
        Ok(())
    }
}

#[async_trait]
impl ToolProvider for McpToolProvider {
    fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    async fn call(&self, name: &str, arguments: &serde_json::Value) -> Result<String> {
        debug!("Calling MCP tool '{}'", name);
        let arguments = match arguments {
            serde_json::Value::Object(map) => Some(map.clone()),
            serde_json::Value::Null => None,
            other => {
                warn!("Tool '{}' got non-object arguments: {}", name, other);
                None
            }
        };

        let result = self
            .service
            .call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments,
            })
            .await
            .with_context(|| format!("tool '{name}' call failed"))?;

        // Prefer the structured payload; fall back to concatenated text parts.
        let payload = if let Some(v) = result.structured_content.clone() {
            v.to_string()
        } else {
            result
                .content
                .iter()
                .filter_map(|c| c.as_text())
                .map(|t| t.text.clone())
                .collect::<Vec<_>>()
                .join("\n")
        };

        if result.is_error.unwrap_or(false) {
            bail!("tool '{name}' reported an error: {payload}");
        }

        Ok(payload)
    }
}

impl std::fmt::Debug for McpToolProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("McpToolProvider")
            .field("tools", &self.tools.iter().map(|t| &t.name).collect::<Vec<_>>())
            .finish()
    }
}
