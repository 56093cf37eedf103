/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the server loop that:
/// 1. Reads JSON-RPC requests from stdin
/// 2. Dispatches tool calls to the habit tools
/// 3. Sends JSON-RPC responses to stdout

use std::collections::HashMap;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::mcp::protocol::*;
use crate::tools;
use crate::tools::ToolError;
use crate::{HabitServer, ServerError};

/// MCP server that exposes the habit tools to a client
pub struct McpServer {
    /// The underlying habit stats server
    habit_server: HabitServer,
    /// Whether the client has completed initialization
    initialized: bool,
}

impl McpServer {
    /// Create a new MCP server
    pub fn new(habit_server: HabitServer) -> Self {
        Self {
            habit_server,
            initialized: false,
        }
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line) {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    fn process_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
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
                    json!(null),
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                    None,
                ));
            }
        };

        Some(self.handle_request(request))
    }

    /// Handle a JSON-RPC request
    fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(request.id, json!(null))
            }
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request),
            _ => JsonRpcResponse::error(
                request.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
                None,
            ),
        }
    }

    /// Handle MCP initialization request
    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: "Habit Stats".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INTERNAL_ERROR,
                e.to_string(),
                None,
            ),
        }
    }

    /// Handle tools/list request
    fn handle_tools_list(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let tools = vec![
            ToolDefinition {
                name: "user_create".to_string(),
                description: "Register a new user".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "name": {"type": "string", "description": "Display name"},
                        "email": {"type": "string", "description": "Email address, must be unique"},
                        "age": {"type": "number", "description": "Age in years (optional)"},
                        "role": {"type": "string", "description": "Authorization role (optional, defaults to 'user')"},
                        "password": {"type": "string", "description": "Password"}
                    },
                    "required": ["name", "email", "password"]
                }),
            },
            ToolDefinition {
                name: "user_list".to_string(),
                description: "List all registered users".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {},
                    "required": []
                }),
            },
            ToolDefinition {
                name: "user_update".to_string(),
                description: "Update a user's name, email, age or role".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "userId": {"type": "number", "description": "Id of the user to update"},
                        "name": {"type": "string", "description": "New display name (optional)"},
                        "email": {"type": "string", "description": "New email address (optional, must stay unique)"},
                        "age": {"type": "number", "description": "New age in years (optional)"},
                        "role": {"type": "string", "description": "New authorization role (optional)"}
                    },
                    "required": ["userId"]
                }),
            },
            ToolDefinition {
                name: "user_delete".to_string(),
                description: "Delete a user and all of their habit records".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "userId": {"type": "number", "description": "Id of the user to delete"}
                    },
                    "required": ["userId"]
                }),
            },
            ToolDefinition {
                name: "habit_create".to_string(),
                description: "Record a new habit for a user".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "userId": {"type": "number", "description": "Owning user id"},
                        "title": {"type": "string", "description": "Habit title (e.g., 'Morning Run')"},
                        "time": {"type": "string", "description": "Scheduled time label (e.g., '07:30')"},
                        "type": {"type": "string", "description": "Habit type label (e.g., 'exercise')"},
                        "status": {"type": "boolean", "description": "Completion flag (optional, defaults to false)"}
                    },
                    "required": ["userId", "title", "time", "type"]
                }),
            },
            ToolDefinition {
                name: "habit_update".to_string(),
                description: "Update a habit's title, time, type or completion status".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "habitId": {"type": "number", "description": "Id of the habit to update"},
                        "title": {"type": "string", "description": "New title (optional)"},
                        "time": {"type": "string", "description": "New time label (optional)"},
                        "type": {"type": "string", "description": "New type label (optional)"},
                        "status": {"type": "boolean", "description": "New completion flag (optional)"}
                    },
                    "required": ["habitId"]
                }),
            },
            ToolDefinition {
                name: "habit_delete".to_string(),
                description: "Delete a habit record".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "habitId": {"type": "number", "description": "Id of the habit to delete"}
                    },
                    "required": ["habitId"]
                }),
            },
            ToolDefinition {
                name: "habit_list".to_string(),
                description: "List all habit records for a user".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "userId": {"type": "number", "description": "Id of the user"}
                    },
                    "required": ["userId"]
                }),
            },
            ToolDefinition {
                name: "habits_by_date".to_string(),
                description: "List a user's habit records for one calendar day (dd-mm-yyyy)"
                    .to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "userId": {"type": "number", "description": "Id of the user"},
                        "date": {"type": "string", "description": "Day selector in dd-mm-yyyy form"}
                    },
                    "required": ["userId", "date"]
                }),
            },
            ToolDefinition {
                name: "daily_completion".to_string(),
                description: "Completion percentage for one calendar day (dd-mm-yyyy)".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "userId": {"type": "number", "description": "Id of the user"},
                        "date": {"type": "string", "description": "Day selector in dd-mm-yyyy form"}
                    },
                    "required": ["userId", "date"]
                }),
            },
            ToolDefinition {
                name: "weekly_completion".to_string(),
                description: "Per-week completion percentages for one calendar month".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "userId": {"type": "number", "description": "Id of the user"},
                        "month": {"type": "number", "description": "Calendar month, 1-12"},
                        "year": {"type": "number", "description": "Calendar year"}
                    },
                    "required": ["userId", "month", "year"]
                }),
            },
            ToolDefinition {
                name: "top_habits".to_string(),
                description: "The user's most frequently recorded habit titles (top 3)".to_string(),
                input_schema: json!({
                    "type": "object",
                    "properties": {
                        "userId": {"type": "number", "description": "Id of the user"}
                    },
                    "required": ["userId"]
                }),
            },
        ];

        JsonRpcResponse::success(request.id, json!({"tools": tools}))
    }

    /// Handle tools/call request
    fn handle_tools_call(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        if !self.initialized {
            debug!("tools/call received before initialized notification");
        }

        let tool_params: ToolCallParams = match request.params {
            Some(params) => match serde_json::from_value(params) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        error_codes::INVALID_PARAMS,
                        format!("Invalid parameters: {}", e),
                        None,
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    error_codes::INVALID_PARAMS,
                    "Missing parameters".to_string(),
                    None,
                );
            }
        };

        let result = match tool_params.name.as_str() {
            "user_create" => self.call_user_create(tool_params.arguments),
            "user_list" => self.call_user_list(),
            "user_update" => self.call_user_update(tool_params.arguments),
            "user_delete" => self.call_user_delete(tool_params.arguments),
            "habit_create" => self.call_habit_create(tool_params.arguments),
            "habit_update" => self.call_habit_update(tool_params.arguments),
            "habit_delete" => self.call_habit_delete(tool_params.arguments),
            "habit_list" => self.call_habit_list(tool_params.arguments),
            "habits_by_date" => self.call_habits_by_date(tool_params.arguments),
            "daily_completion" => self.call_daily_completion(tool_params.arguments),
            "weekly_completion" => self.call_weekly_completion(tool_params.arguments),
            "top_habits" => self.call_top_habits(tool_params.arguments),
            _ => ToolCallResult::error(format!("Unknown tool: {}", tool_params.name)),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                error_codes::INTERNAL_ERROR,
                e.to_string(),
                None,
            ),
        }
    }

    /// Turn a tool failure into the appropriate tool result
    ///
    /// The no-records outcome is a not-found signal, reported as an
    /// ordinary result rather than an error.
    fn failure_result(e: ToolError) -> ToolCallResult {
        if e.is_no_records() {
            ToolCallResult::success("No habit records found for the requested period".to_string())
        } else {
            ToolCallResult::error(e.to_string())
        }
    }

    /// Call the user_create tool
    fn call_user_create(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::CreateUserParams {
            name: string_arg(&args, "name"),
            email: string_arg(&args, "email"),
            age: u32_arg(&args, "age"),
            role: args
                .get("role")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            password: string_arg(&args, "password"),
        };

        // TODO: wire a real password hasher once the auth surface lands
        match tools::create_user(self.habit_server.storage(), params, |raw| raw.to_string()) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the user_list tool
    fn call_user_list(&self) -> ToolCallResult {
        match tools::list_users(self.habit_server.storage()) {
            Ok(response) => {
                if response.users.is_empty() {
                    ToolCallResult::success("No users registered yet".to_string())
                } else {
                    let listing = response
                        .users
                        .iter()
                        .map(|u| format!("{} - {} <{}> ({})", u.id, u.name, u.email, u.role))
                        .collect::<Vec<_>>()
                        .join("\n");
                    ToolCallResult::success(listing)
                }
            }
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the user_update tool
    fn call_user_update(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::UpdateUserParams {
            user_id: id_arg(&args, "userId"),
            name: args
                .get("name")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            email: args
                .get("email")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            age: u32_arg(&args, "age"),
            role: args
                .get("role")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        };

        match tools::update_user(self.habit_server.storage(), params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the user_delete tool
    fn call_user_delete(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::DeleteUserParams {
            user_id: id_arg(&args, "userId"),
        };

        match tools::delete_user(self.habit_server.storage(), params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the habit_create tool
    fn call_habit_create(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::CreateHabitParams {
            user_id: id_arg(&args, "userId"),
            title: string_arg(&args, "title"),
            time: string_arg(&args, "time"),
            kind: string_arg(&args, "type"),
            status: args.get("status").and_then(|v| v.as_bool()),
        };

        match tools::create_habit(self.habit_server.storage(), params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the habit_update tool
    fn call_habit_update(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::UpdateHabitParams {
            habit_id: id_arg(&args, "habitId"),
            title: args
                .get("title")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            time: args
                .get("time")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            kind: args
                .get("type")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            status: args.get("status").and_then(|v| v.as_bool()),
        };

        match tools::update_habit(self.habit_server.storage(), params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the habit_delete tool
    fn call_habit_delete(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::DeleteHabitParams {
            habit_id: id_arg(&args, "habitId"),
        };

        match tools::delete_habit(self.habit_server.storage(), params) {
            Ok(response) => ToolCallResult::success(response.message),
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the habit_list tool
    fn call_habit_list(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::ListHabitsParams {
            user_id: id_arg(&args, "userId"),
        };

        match tools::list_habits(self.habit_server.storage(), params) {
            Ok(response) => {
                if response.habits.is_empty() {
                    ToolCallResult::success("No habits recorded yet".to_string())
                } else {
                    let listing = response
                        .habits
                        .iter()
                        .map(|h| {
                            format!(
                                "{} - {} at {} [{}] {}",
                                h.id,
                                h.title,
                                h.time,
                                h.kind,
                                if h.status { "done" } else { "pending" }
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("\n");
                    ToolCallResult::success(listing)
                }
            }
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the habits_by_date tool
    fn call_habits_by_date(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::HabitsByDateParams {
            user_id: args.get("userId").and_then(|v| v.as_i64()),
            date: args
                .get("date")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        };

        match tools::habits_by_date(self.habit_server.storage(), params) {
            Ok(response) => {
                let listing = response
                    .habits
                    .iter()
                    .map(|h| {
                        format!(
                            "{} - {} at {} [{}] {}",
                            h.id,
                            h.title,
                            h.time,
                            h.kind,
                            if h.status { "done" } else { "pending" }
                        )
                    })
                    .collect::<Vec<_>>()
                    .join("\n");
                ToolCallResult::success(listing)
            }
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the daily_completion tool
    fn call_daily_completion(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::DailyCompletionParams {
            user_id: args.get("userId").and_then(|v| v.as_i64()),
            date: args
                .get("date")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
        };

        match tools::daily_completion(
            self.habit_server.storage(),
            self.habit_server.analytics(),
            params,
        ) {
            Ok(stat) => ToolCallResult::success(format!(
                "Completion for {}: {} of {} tasks done ({})",
                stat.date, stat.completed_tasks, stat.total_tasks, stat.completion_percentage
            )),
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the weekly_completion tool
    fn call_weekly_completion(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::WeeklyCompletionParams {
            user_id: args.get("userId").and_then(|v| v.as_i64()),
            month: u32_arg(&args, "month"),
            year: i32_arg(&args, "year"),
        };

        match tools::weekly_completion(
            self.habit_server.storage(),
            self.habit_server.analytics(),
            params,
        ) {
            Ok(stat) => {
                let weeks = stat
                    .weekly_completion_percentages
                    .iter()
                    .enumerate()
                    .map(|(i, pct)| format!("week {}: {:.2}%", i + 1, pct))
                    .collect::<Vec<_>>()
                    .join(" | ");
                ToolCallResult::success(format!("Completion for {}: {}", stat.month, weeks))
            }
            Err(e) => Self::failure_result(e),
        }
    }

    /// Call the top_habits tool
    fn call_top_habits(&self, args: HashMap<String, Value>) -> ToolCallResult {
        let params = tools::TopHabitsParams {
            user_id: args.get("userId").and_then(|v| v.as_i64()),
        };

        match tools::top_habits(
            self.habit_server.storage(),
            self.habit_server.analytics(),
            params,
        ) {
            Ok(ranked) => {
                if ranked.is_empty() {
                    ToolCallResult::success("No habits recorded yet".to_string())
                } else {
                    let listing = ranked
                        .iter()
                        .enumerate()
                        .map(|(i, habit)| format!("{}. {}", i + 1, habit.title))
                        .collect::<Vec<_>>()
                        .join("\n");
                    ToolCallResult::success(format!("Most recorded habits:\n{}", listing))
                }
            }
            Err(e) => Self::failure_result(e),
        }
    }
}

/// Extract a required string argument, defaulting to empty so the tool's
/// own validation produces the user-facing message
fn string_arg(args: &HashMap<String, Value>, key: &str) -> String {
    args.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Extract an id argument; 0 never matches a stored row, so a missing id
/// falls through to the not-found path
fn id_arg(args: &HashMap<String, Value>, key: &str) -> i64 {
    args.get(key).and_then(|v| v.as_i64()).unwrap_or(0)
}

/// Extract an optional u32 argument
///
/// A checked conversion, not a cast: a value outside u32 must read as
/// absent rather than wrap into something that looks valid.
fn u32_arg(args: &HashMap<String, Value>, key: &str) -> Option<u32> {
    args.get(key)
        .and_then(|v| v.as_u64())
        .and_then(|n| u32::try_from(n).ok())
}

/// Extract an optional i32 argument, with the same overflow handling as
/// `u32_arg`
fn i32_arg(args: &HashMap<String, Value>, key: &str) -> Option<i32> {
    args.get(key)
        .and_then(|v| v.as_i64())
        .and_then(|n| i32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(key: &str, value: Value) -> HashMap<String, Value> {
        let mut map = HashMap::new();
        map.insert(key.to_string(), value);
        map
    }

    #[test]
    fn test_numeric_args_within_range() {
        assert_eq!(u32_arg(&args("month", json!(12)), "month"), Some(12));
        assert_eq!(i32_arg(&args("year", json!(2025)), "year"), Some(2025));
    }

    #[test]
    fn test_out_of_range_numeric_args_read_as_absent() {
        // 2^32 + 4 would wrap to month 4 under a plain cast
        assert_eq!(u32_arg(&args("month", json!(4_294_967_300u64)), "month"), None);
        assert_eq!(i32_arg(&args("year", json!(i64::MAX)), "year"), None);
        assert_eq!(i32_arg(&args("year", json!(i64::MIN)), "year"), None);
    }

    #[test]
    fn test_missing_or_non_numeric_args_read_as_absent() {
        assert_eq!(u32_arg(&HashMap::new(), "month"), None);
        assert_eq!(u32_arg(&args("month", json!("4")), "month"), None);
        assert_eq!(i32_arg(&args("year", json!(-1)), "year"), Some(-1));
        assert_eq!(u32_arg(&args("age", json!(-1)), "age"), None);
    }
}
