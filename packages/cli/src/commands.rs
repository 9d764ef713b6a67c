//! REPL command parsing and execution.
//!
//! Commands:
//! - `<Method> [json]` - Call a resource-API method with a JSON request body
//! - `methods` - List the callable methods
//! - `help` - Show help
//! - `exit` - Exit the REPL
//!
//! A missing body is the empty request `{}`.

use nu_ansi_term::{Color, Style};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value as JsonValue;

use nvbridge::{Bridge, FrontendNvmeService, FrontendVirtioBlkService, Status};

/// Result of executing a command
pub enum CommandResult {
    /// Command succeeded, optionally with output to display
    Ok(Option<String>),
    /// Input could not be turned into a call
    Error(String),
    /// The bridge rejected the call
    Status(Status),
    /// User requested to exit
    Exit,
    /// Show help
    Help,
    /// List methods
    Methods,
}

/// Every resource-API method with a one-line description.
pub const METHODS: &[(&str, &str)] = &[
    ("CreateNvmeSubsystem", "Create an NVMe subsystem"),
    ("DeleteNvmeSubsystem", "Delete an NVMe subsystem"),
    ("UpdateNvmeSubsystem", "Update an NVMe subsystem"),
    ("ListNvmeSubsystems", "List NVMe subsystems"),
    ("GetNvmeSubsystem", "Get an NVMe subsystem"),
    ("StatsNvmeSubsystem", "NVMe subsystem I/O counters"),
    ("CreateNvmeController", "Create an NVMe controller"),
    ("DeleteNvmeController", "Delete an NVMe controller"),
    ("UpdateNvmeController", "Update an NVMe controller"),
    ("ListNvmeControllers", "List NVMe controllers of a subsystem"),
    ("GetNvmeController", "Get an NVMe controller"),
    ("StatsNvmeController", "NVMe controller I/O counters"),
    ("CreateNvmeNamespace", "Attach an NVMe namespace"),
    ("DeleteNvmeNamespace", "Detach an NVMe namespace"),
    ("UpdateNvmeNamespace", "Update an NVMe namespace"),
    ("ListNvmeNamespaces", "List NVMe namespaces of a subsystem"),
    ("GetNvmeNamespace", "Get an NVMe namespace"),
    ("StatsNvmeNamespace", "NVMe namespace I/O counters"),
    ("CreateVirtioBlk", "Create a virtio-blk controller"),
    ("DeleteVirtioBlk", "Delete a virtio-blk controller"),
    ("UpdateVirtioBlk", "Update a virtio-blk controller"),
    ("ListVirtioBlks", "List virtio-blk controllers"),
    ("GetVirtioBlk", "Get a virtio-blk controller"),
    ("StatsVirtioBlk", "Virtio-blk I/O counters"),
];

/// Commands that are not resource-API methods.
pub const BUILTINS: &[&str] = &["help", "methods", "exit", "quit"];

/// Look up a method name, ignoring case. Returns the canonical spelling.
pub fn find_method(name: &str) -> Option<&'static str> {
    METHODS
        .iter()
        .map(|(method, _)| *method)
        .find(|method| method.eq_ignore_ascii_case(name))
}

/// Parse and execute a command
pub fn execute(input: &str, bridge: &Bridge) -> CommandResult {
    let input = input.trim();

    if input.is_empty() {
        return CommandResult::Ok(None);
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    match command.to_lowercase().as_str() {
        "help" | "?" => return CommandResult::Help,
        "exit" | "quit" | "q" => return CommandResult::Exit,
        "methods" => return CommandResult::Methods,
        _ => {}
    }

    let Some(method) = find_method(command) else {
        return CommandResult::Error(format!(
            "Unknown command: '{}'. Type 'methods' for callable methods.",
            command
        ));
    };

    let body = if args.is_empty() {
        JsonValue::Object(Default::default())
    } else {
        match serde_json::from_str(args) {
            Ok(body) => body,
            Err(e) => return CommandResult::Error(format!("Invalid JSON: {}", e)),
        }
    };

    let Some(outcome) = dispatch(method, body, bridge) else {
        return CommandResult::Error(format!("Method '{}' is not callable", method));
    };

    match outcome {
        Ok(JsonValue::Null) => CommandResult::Ok(Some(Color::Green.paint("OK").to_string())),
        Ok(value) => CommandResult::Ok(Some(format_json(&value))),
        Err(CallError::Request(e)) => CommandResult::Error(format!("Invalid request: {}", e)),
        Err(CallError::Status(status)) => CommandResult::Status(status),
    }
}

enum CallError {
    Request(serde_json::Error),
    Status(Status),
}

/// Decode the body as `Req`, run `handler`, and encode its response.
fn call<Req, Resp>(
    body: JsonValue,
    handler: impl FnOnce(Req) -> Result<Resp, Status>,
) -> Result<JsonValue, CallError>
where
    Req: DeserializeOwned,
    Resp: Serialize,
{
    let request = serde_json::from_value(body).map_err(CallError::Request)?;
    let response = handler(request).map_err(CallError::Status)?;
    serde_json::to_value(response).map_err(CallError::Request)
}

fn dispatch(
    method: &str,
    body: JsonValue,
    bridge: &Bridge,
) -> Option<Result<JsonValue, CallError>> {
    let outcome = match method {
        "CreateNvmeSubsystem" => call(body, |r| bridge.create_nvme_subsystem(r)),
        "DeleteNvmeSubsystem" => call(body, |r| bridge.delete_nvme_subsystem(r)),
        "UpdateNvmeSubsystem" => call(body, |r| bridge.update_nvme_subsystem(r)),
        "ListNvmeSubsystems" => call(body, |r| bridge.list_nvme_subsystems(r)),
        "GetNvmeSubsystem" => call(body, |r| bridge.get_nvme_subsystem(r)),
        "StatsNvmeSubsystem" => call(body, |r| bridge.stats_nvme_subsystem(r)),
        "CreateNvmeController" => call(body, |r| bridge.create_nvme_controller(r)),
        "DeleteNvmeController" => call(body, |r| bridge.delete_nvme_controller(r)),
        "UpdateNvmeController" => call(body, |r| bridge.update_nvme_controller(r)),
        "ListNvmeControllers" => call(body, |r| bridge.list_nvme_controllers(r)),
        "GetNvmeController" => call(body, |r| bridge.get_nvme_controller(r)),
        "StatsNvmeController" => call(body, |r| bridge.stats_nvme_controller(r)),
        "CreateNvmeNamespace" => call(body, |r| bridge.create_nvme_namespace(r)),
        "DeleteNvmeNamespace" => call(body, |r| bridge.delete_nvme_namespace(r)),
        "UpdateNvmeNamespace" => call(body, |r| bridge.update_nvme_namespace(r)),
        "ListNvmeNamespaces" => call(body, |r| bridge.list_nvme_namespaces(r)),
        "GetNvmeNamespace" => call(body, |r| bridge.get_nvme_namespace(r)),
        "StatsNvmeNamespace" => call(body, |r| bridge.stats_nvme_namespace(r)),
        "CreateVirtioBlk" => call(body, |r| bridge.create_virtio_blk(r)),
        "DeleteVirtioBlk" => call(body, |r| bridge.delete_virtio_blk(r)),
        "UpdateVirtioBlk" => call(body, |r| bridge.update_virtio_blk(r)),
        "ListVirtioBlks" => call(body, |r| bridge.list_virtio_blks(r)),
        "GetVirtioBlk" => call(body, |r| bridge.get_virtio_blk(r)),
        "StatsVirtioBlk" => call(body, |r| bridge.stats_virtio_blk(r)),
        _ => return None,
    };
    Some(outcome)
}

/// Format help text
pub fn format_help() -> String {
    let cmd_style = Style::new().bold().fg(Color::Cyan);
    let arg_style = Style::new().fg(Color::Yellow);

    let mut help = String::new();
    help.push_str(&format!(
        "{}\n\n",
        Style::new().bold().paint("nvbridge REPL Commands")
    ));

    let commands = [
        ("<Method>", "[json]", "Call a resource-API method (see 'methods')"),
        ("methods", "", "List callable methods"),
        ("help", "", "Show this help message"),
        ("exit", "", "Exit the REPL (alias: quit, q)"),
    ];
    for (cmd, args, desc) in commands {
        help.push_str(&format!(
            "  {:<12} {:<8} {}\n",
            cmd_style.paint(cmd),
            arg_style.paint(args),
            desc
        ));
    }

    help.push_str(&format!("\n{}\n", Style::new().bold().paint("Examples")));
    let examples = [
        r#"CreateNvmeSubsystem {"nvme_subsystem_id": "subsys0", "nvme_subsystem": {"spec": {"nqn": "nqn.2022-09.io.spdk:opi3"}}}"#,
        r#"CreateNvmeController {"parent": "nvmeSubsystems/subsys0", "nvme_controller_id": "ctrl0", "nvme_controller": {"spec": {"trtype": "pcie", "pcie_id": {"physical_function": 0}}}}"#,
        r#"ListNvmeControllers {"parent": "nvmeSubsystems/subsys0", "page_size": 10}"#,
        r#"DeleteNvmeSubsystem {"name": "nvmeSubsystems/subsys0", "allow_missing": true}"#,
    ];
    for example in examples {
        help.push_str(&format!("  {}\n", arg_style.paint(example)));
    }

    help
}

/// List methods with descriptions
pub fn format_methods() -> String {
    let method_style = Style::new().bold().fg(Color::Cyan);
    METHODS
        .iter()
        .map(|(method, desc)| format!("  {:<24} {}", method_style.paint(*method), desc))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format JSON with syntax highlighting
fn format_json(value: &JsonValue) -> String {
    let pretty = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());

    let mut result = String::new();
    let mut in_string = false;
    let mut escape_next = false;

    for c in pretty.chars() {
        if escape_next {
            result.push(c);
            escape_next = false;
            continue;
        }
        if c == '\\' && in_string {
            result.push(c);
            escape_next = true;
            continue;
        }
        if c == '"' {
            in_string = !in_string;
            result.push_str(&Color::Green.paint("\"").to_string());
            continue;
        }

        if in_string {
            result.push_str(&Color::Green.paint(c.to_string()).to_string());
        } else if c.is_ascii_digit() || c == '-' {
            result.push_str(&Color::Cyan.paint(c.to_string()).to_string());
        } else {
            result.push(c);
        }
    }

    result
}
