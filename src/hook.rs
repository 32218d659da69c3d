//! Host invocation contract: decode a PreToolUse event, route it to the
//! right classifier, and render the verdict in the shape the host expects.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::checks::file_length::FileWrite;
use crate::config::Settings;
use crate::error::HookError;
use crate::eval::{Decision, Evaluator, FinalDecision};

const DEFAULT_EVENT_NAME: &str = "PreToolUse";

/// Raw hook payload as sent on stdin.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_name: Option<String>,
    #[serde(default)]
    pub tool_input: Option<ToolInput>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub hook_event_name: Option<String>,
}

/// The subset of `tool_input` the checkers read.
#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub file_path: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub old_string: Option<String>,
    #[serde(default)]
    pub new_string: Option<String>,
    #[serde(default)]
    pub replace_all: Option<bool>,
}

/// What the host is about to do.
#[derive(Debug)]
pub enum Event {
    Command(String),
    FileWrite(FileWrite),
    /// Any tool this hook has no rules for.
    Other(String),
}

impl HookInput {
    pub fn parse(raw: &str) -> Result<Self, HookError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// `tool_input.cwd`, then the event's `cwd`, then the process cwd.
    pub fn working_dir(&self) -> PathBuf {
        self.tool_input
            .as_ref()
            .and_then(|t| t.cwd.as_deref())
            .or(self.cwd.as_deref())
            .filter(|c| !c.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(process_cwd)
    }

    pub fn event_name(&self) -> &str {
        self.hook_event_name.as_deref().unwrap_or(DEFAULT_EVENT_NAME)
    }

    pub fn event(&self) -> Result<Event, HookError> {
        let tool = self.tool_name.as_deref().unwrap_or_default();
        let input = self.tool_input.as_ref();
        match tool {
            "Bash" => input
                .and_then(|t| t.command.clone())
                .map(Event::Command)
                .ok_or(HookError::MissingField("tool_input.command")),
            "Write" | "Edit" => {
                let t = input.ok_or(HookError::MissingField("tool_input"))?;
                let file_path = t
                    .file_path
                    .clone()
                    .ok_or(HookError::MissingField("tool_input.file_path"))?;
                let write = if tool == "Write" {
                    FileWrite::Write {
                        file_path,
                        content: t.content.clone().unwrap_or_default(),
                    }
                } else {
                    FileWrite::Edit {
                        file_path,
                        old_string: t.old_string.clone().unwrap_or_default(),
                        new_string: t.new_string.clone().unwrap_or_default(),
                        replace_all: t.replace_all.unwrap_or(false),
                    }
                };
                Ok(Event::FileWrite(write))
            }
            other => Ok(Event::Other(other.to_string())),
        }
    }
}

fn process_cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Response shape selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Nested for `ask`, flat for everything else.
    #[default]
    Auto,
    Flat,
    Nested,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(OutputFormat::Auto),
            "flat" => Ok(OutputFormat::Flat),
            "nested" => Ok(OutputFormat::Nested),
            other => Err(format!("unknown output format '{other}' (expected flat, nested or auto)")),
        }
    }
}

/// Outcome of one hook invocation, before rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Decision(FinalDecision),
    /// No opinion; the host's normal permission flow applies.
    Defer,
}

/// Classify a decoded event against a settings snapshot.
pub fn decide(input: &HookInput, settings: &Settings) -> Response {
    let event = match input.event() {
        Ok(event) => event,
        Err(e) => return malformed(&e),
    };
    let cwd = input.working_dir();
    let evaluator = Evaluator::from_config(settings);

    match event {
        Event::Command(command) => Response::Decision(evaluator.evaluate(&command, &cwd)),
        Event::FileWrite(write) => match evaluator.evaluate_file_write(&write, &cwd) {
            Some(result) => Response::Decision(result.into()),
            None => Response::Defer,
        },
        Event::Other(tool) => {
            log::debug!("no rules for tool '{tool}'");
            Response::Decision(FinalDecision::allow(""))
        }
    }
}

/// Input the hook could not make sense of never blocks the host.
pub fn malformed(err: &HookError) -> Response {
    log::warn!("malformed hook input: {err}");
    Response::Decision(FinalDecision::allow(format!(
        "safety-hooks could not read the event ({err}); allowing"
    )))
}

/// Render a response as the host JSON.
pub fn render(response: &Response, format: OutputFormat, event_name: &str) -> Value {
    let decision = match response {
        Response::Defer => return json!({}),
        Response::Decision(d) => d,
    };

    let nested = match format {
        OutputFormat::Nested => true,
        OutputFormat::Flat => false,
        OutputFormat::Auto => decision.decision == Decision::Ask,
    };

    if nested {
        json!({
            "hookSpecificOutput": {
                "hookEventName": event_name,
                "permissionDecision": decision.decision.permission_str(),
                "permissionDecisionReason": decision.reason,
            }
        })
    } else if decision.reason.is_empty() {
        json!({ "decision": decision.decision.flat_str() })
    } else {
        json!({
            "decision": decision.decision.flat_str(),
            "reason": decision.reason,
        })
    }
}

/// Decode, classify and render in one step.
pub fn handle(raw: &str, settings: &Settings, format: OutputFormat) -> Value {
    match HookInput::parse(raw) {
        Ok(input) => render(&decide(&input, settings), format, input.event_name()),
        Err(e) => render(&malformed(&e), format, DEFAULT_EVENT_NAME),
    }
}

/// Short description of the event for the decision log.
pub fn describe(input: &HookInput) -> String {
    match input.event() {
        Ok(Event::Command(c)) => c,
        Ok(Event::FileWrite(w)) => format!("write {}", w.file_path()),
        Ok(Event::Other(tool)) => format!("tool {tool}"),
        Err(e) => format!("<{e}>"),
    }
}
