/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests line by line
/// 2. Routes tool calls to the tracker tools
/// 3. Writes one JSON-RPC response line per request (none for notifications)

use chrono::Local;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools;
use crate::{ServerError, TrackerServer};

/// Arguments for tools that take none
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct NoParams {}

/// MCP server wrapping a [`TrackerServer`]
pub struct McpServer {
    tracker: TrackerServer,
    /// Whether the client has confirmed initialization
    initialized: bool,
}

impl McpServer {
    pub fn new(tracker: TrackerServer) -> Self {
        Self {
            tracker,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.serve(reader, writer).await
    }

    /// Serve requests from any line-oriented reader until it is exhausted
    pub async fn serve<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<(), ServerError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        loop {
            buf.clear();

            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    info!("MCP server shutting down (input closed)");
                    break;
                }
                Ok(_) => {
                    // invalid UTF-8 degrades to a parse error for this line only
                    let line = String::from_utf8_lossy(&buf);
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        writer.write_all(response_str.as_bytes()).await?;
                        writer.write_all(b"\n").await?;
                        writer.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read request: {}", e);
                    return Err(e.into());
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    pub async fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                ));
            }
        };

        self.handle_request(request).await
    }

    /// Handle a JSON-RPC request; notifications yield no response
    async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            match request.method.as_str() {
                "notifications/initialized" | "initialized" => {
                    self.initialized = true;
                    info!("MCP client finished initialization");
                }
                other => debug!("Ignoring notification '{}'", other),
            }
            return None;
        }

        let id = request.id.clone().unwrap_or(Value::Null);
        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, request.params).await,
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
            ),
        };
        Some(response)
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        match params.client_info {
            Some(client) => info!(
                "MCP client connected: {} {}",
                client.name,
                client.version.unwrap_or_default()
            ),
            None => info!("MCP client connected"),
        }
        if let Some(version) = params.protocol_version.filter(|v| v != MCP_VERSION) {
            warn!("Client requested protocol {}, answering with {}", version, MCP_VERSION);
        }

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Caveman Tracker MCP".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, result)
    }

    /// Handle tools/list request
    fn handle_tools_list(&self, id: Value) -> JsonRpcResponse {
        respond(id, json!({ "tools": tool_definitions() }))
    }

    /// Handle tools/call request
    async fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let tool_params: ToolCallParams = match params.map(serde_json::from_value) {
            Some(Ok(p)) => p,
            Some(Err(e)) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                );
            }
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                );
            }
        };

        let args = Value::Object(tool_params.arguments.into_iter().collect());
        let result = match self.call_tool(&tool_params.name, args).await {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                warn!("Tool {} failed: {}", tool_params.name, e);
                ToolCallResult::error(e.kind(), e.to_string())
            }
        };

        respond(id, result)
    }

    /// Dispatch a tool by name
    async fn call_tool(&self, name: &str, args: Value) -> Result<String, ServerError> {
        let now = Local::now().naive_local();
        let today = now.date();
        let storage = self.tracker.storage();

        match name {
            "habit_create" => render(tools::create_habit(storage, parse_args(args)?)?),
            "habit_update" => render(tools::update_habit(storage, parse_args(args)?)?),
            "habit_delete" => render(tools::delete_habit(storage, parse_args(args)?)?),
            "habit_complete" => render(tools::habit_complete(
                storage,
                parse_args(args)?,
                today,
                self.tracker.streak_policy(),
            )?),
            "habit_list" => render(tools::list_habits(storage, parse_args(args)?, today)?),
            "task_create" => render(tools::create_task(storage, parse_args(args)?)?),
            "task_update" => render(tools::update_task(storage, parse_args(args)?)?),
            "task_complete" => render(tools::complete_task(storage, parse_args(args)?, today)?),
            "task_uncomplete" => render(tools::uncomplete_task(storage, parse_args(args)?)?),
            "task_delete" => render(tools::delete_task(storage, parse_args(args)?)?),
            "task_list" => render(tools::list_tasks(storage, parse_args(args)?, today)?),
            "dashboard_stats" => {
                parse_args::<NoParams>(args)?;
                render(tools::dashboard_stats(storage, today)?)
            }
            "daily_quote" => {
                parse_args::<NoParams>(args)?;
                let retention_days = self.tracker.config().quotes.retention_days;
                render(
                    tools::daily_quote(storage, self.tracker.quote_source(), today, retention_days)
                        .await?,
                )
            }
            "calendar_day" => render(tools::calendar_day(storage, parse_args(args)?, today)?),
            "calendar_month" => render(tools::calendar_month(storage, parse_args(args)?, today)?),
            "reminder_digest" => {
                parse_args::<NoParams>(args)?;
                let schedule = self.tracker.reminder_schedule()?;
                render(tools::reminder_digest(storage, &schedule, now)?)
            }
            _ => Err(ServerError::InvalidInput(format!("Unknown tool: {}", name))),
        }
    }
}

/// Every tool this server offers, with schemas derived from the parameter types
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<tools::CreateHabitParams>("habit_create", "Create a new habit to track"),
        tool::<tools::UpdateHabitParams>(
            "habit_update",
            "Edit a habit's name, description, frequency, category or appearance (streaks are never edited)",
        ),
        tool::<tools::DeleteHabitParams>(
            "habit_delete",
            "Delete a habit, or archive it to keep its streak history",
        ),
        tool::<tools::CompleteHabitParams>(
            "habit_complete",
            "Complete a habit for today or a given date and update its streak",
        ),
        tool::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with their streaks and whether they are done today",
        ),
        tool::<tools::CreateTaskParams>("task_create", "Create a new task (rock) to move"),
        tool::<tools::UpdateTaskParams>("task_update", "Edit a task"),
        tool::<tools::CompleteTaskParams>("task_complete", "Mark a task as done"),
        tool::<tools::TaskIdParams>("task_uncomplete", "Reopen a completed task"),
        tool::<tools::TaskIdParams>("task_delete", "Delete a task"),
        tool::<tools::ListTasksParams>(
            "task_list",
            "List tasks by priority and due date, flagging overdue ones",
        ),
        tool::<NoParams>(
            "dashboard_stats",
            "Aggregate statistics over all habits and tasks",
        ),
        tool::<NoParams>("daily_quote", "Today's motivational quote"),
        tool::<tools::CalendarDayParams>(
            "calendar_day",
            "Tasks due or finished on a date and habits completed that day",
        ),
        tool::<tools::CalendarMonthParams>(
            "calendar_month",
            "Per-day task and habit counts for a month",
        ),
        tool::<NoParams>(
            "reminder_digest",
            "What the morning and evening reminders would say right now",
        ),
    ]
}

fn tool<T: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(T);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" })),
    }
}

fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ServerError> {
    serde_json::from_value(args)
        .map_err(|e| ServerError::InvalidInput(format!("Invalid arguments: {}", e)))
}

/// Human-readable summary line followed by the full response as JSON
fn render<T: Serialize>(response: T) -> Result<String, ServerError> {
    let value = serde_json::to_value(response)?;
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(format!("{}\n\n{}", message, serde_json::to_string_pretty(&value)?))
}

fn respond<T: Serialize>(id: Value, result: T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(
            id,
            error_codes::INTERNAL_ERROR,
            format!("Failed to serialize result: {}", e),
        ),
    }
}
