//! Forgiving input parsing for board commands
//!
//! A host (the board UI, a CLI, a sync job) sends commands as JSON. The
//! parser accepts a few input shapes and normalizes them into typed
//! [`BoardCommand`]s.

use crate::board::GetBoard;
use crate::context::BoardContext;
use crate::error::{BoardError, Result};
use crate::processor::BoardOperationProcessor;
use crate::task::{
    AddTask, CompleteTask, DeleteTask, GetTask, ListTasks, MoveTask, RebalanceLane, SweepOverdue,
    UpdateTask,
};
use harvest_operations::OperationProcessor;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// A command ready to run
#[derive(Debug, Clone)]
pub enum BoardCommand {
    AddTask(AddTask),
    UpdateTask(UpdateTask),
    DeleteTask(DeleteTask),
    CompleteTask(CompleteTask),
    GetTask(GetTask),
    ListTasks(ListTasks),
    MoveTask(MoveTask),
    RebalanceLane(RebalanceLane),
    SweepOverdue(SweepOverdue),
    GetBoard(GetBoard),
}

/// A parsed command plus who asked for it
#[derive(Debug, Clone)]
pub struct ParsedCommand {
    pub command: BoardCommand,
    pub actor: Option<String>,
}

impl ParsedCommand {
    /// Run the command through a processor attributed to its actor
    pub async fn run(&self, ctx: &BoardContext) -> Result<Value> {
        let processor = match &self.actor {
            Some(actor) => BoardOperationProcessor::with_actor(actor.clone()),
            None => BoardOperationProcessor::new(),
        };

        match &self.command {
            BoardCommand::AddTask(op) => processor.process(op, ctx).await,
            BoardCommand::UpdateTask(op) => processor.process(op, ctx).await,
            BoardCommand::DeleteTask(op) => processor.process(op, ctx).await,
            BoardCommand::CompleteTask(op) => processor.process(op, ctx).await,
            BoardCommand::GetTask(op) => processor.process(op, ctx).await,
            BoardCommand::ListTasks(op) => processor.process(op, ctx).await,
            BoardCommand::MoveTask(op) => processor.process(op, ctx).await,
            BoardCommand::RebalanceLane(op) => processor.process(op, ctx).await,
            BoardCommand::SweepOverdue(op) => processor.process(op, ctx).await,
            BoardCommand::GetBoard(op) => processor.process(op, ctx).await,
        }
    }
}

/// Parse input JSON into one or more commands
pub fn parse_input(input: Value) -> Result<Vec<ParsedCommand>> {
    match input {
        // Batch
        Value::Array(arr) => arr.into_iter().map(parse_single).collect(),
        Value::Object(obj) => Ok(vec![parse_single(Value::Object(obj))?]),
        _ => Err(BoardError::parse("input must be an object or array")),
    }
}

fn parse_single(input: Value) -> Result<ParsedCommand> {
    let Value::Object(obj) = input else {
        return Err(BoardError::parse("command must be an object"));
    };

    let (verb, noun) = extract_op(&obj)?;
    let actor = obj
        .get("actor")
        .and_then(Value::as_str)
        .map(str::to_string);

    let mut params: Map<String, Value> = obj
        .into_iter()
        .filter(|(k, _)| !matches!(k.as_str(), "op" | "verb" | "noun" | "actor"))
        .collect();
    normalize_params(&mut params);

    let command = build(verb, noun, Value::Object(params))?;
    Ok(ParsedCommand { command, actor })
}

/// Find the verb and noun: an `op` string like `"move task"`, or separate
/// `verb` and `noun` fields
fn extract_op(obj: &Map<String, Value>) -> Result<(&'static str, &'static str)> {
    if let Some(op) = obj.get("op").and_then(Value::as_str) {
        let mut parts = op.split_whitespace();
        if let (Some(verb), Some(noun), None) = (parts.next(), parts.next(), parts.next()) {
            return resolve(verb, noun)
                .ok_or_else(|| BoardError::parse(format!("unknown operation '{}'", op)));
        }
        return Err(BoardError::parse(format!("operation must be 'verb noun', got '{}'", op)));
    }

    match (
        obj.get("verb").and_then(Value::as_str),
        obj.get("noun").and_then(Value::as_str),
    ) {
        (Some(verb), Some(noun)) => resolve(verb, noun)
            .ok_or_else(|| BoardError::parse(format!("unknown operation '{} {}'", verb, noun))),
        _ => Err(BoardError::parse("cannot determine operation from input")),
    }
}

/// Canonical verb and noun, resolving aliases
fn resolve(verb: &str, noun: &str) -> Option<(&'static str, &'static str)> {
    let verb = match verb.to_lowercase().as_str() {
        "add" | "create" | "new" => "add",
        "update" | "edit" => "update",
        "delete" | "remove" | "rm" => "delete",
        "complete" | "toggle" | "done" => "complete",
        "get" | "show" => "get",
        "list" | "ls" => "list",
        "move" | "mv" => "move",
        "rebalance" => "rebalance",
        "sweep" => "sweep",
        _ => return None,
    };
    let noun = match noun.to_lowercase().as_str() {
        "task" | "tasks" => "task",
        "lane" => "lane",
        "overdue" => "overdue",
        "board" => "board",
        _ => return None,
    };
    Some((verb, noun))
}

fn build(verb: &str, noun: &str, params: Value) -> Result<BoardCommand> {
    Ok(match (verb, noun) {
        ("add", "task") => BoardCommand::AddTask(from_params(params)?),
        ("update", "task") => BoardCommand::UpdateTask(from_params(params)?),
        ("delete", "task") => BoardCommand::DeleteTask(from_params(params)?),
        ("complete", "task") => BoardCommand::CompleteTask(from_params(params)?),
        ("get", "task") => BoardCommand::GetTask(from_params(params)?),
        ("list", "task") => BoardCommand::ListTasks(from_params(params)?),
        ("move", "task") => BoardCommand::MoveTask(from_params(params)?),
        ("rebalance", "lane") => BoardCommand::RebalanceLane(from_params(params)?),
        ("sweep", "overdue") => BoardCommand::SweepOverdue(from_params(params)?),
        ("get", "board") => BoardCommand::GetBoard(GetBoard),
        (verb, noun) => {
            return Err(BoardError::parse(format!(
                "'{} {}' is not a board operation",
                verb, noun
            )))
        }
    })
}

fn from_params<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| BoardError::parse(e.to_string()))
}

/// Normalize parameter keys (aliases, snake_case)
fn normalize_params(params: &mut Map<String, Value>) {
    let keys: Vec<String> = params.keys().cloned().collect();
    for key in keys {
        let snake = to_snake_case(&key);
        if snake != key {
            if let Some(value) = params.remove(&key) {
                params.entry(snake).or_insert(value);
            }
        }
    }

    let aliases: &[(&[&str], &str)] = &[
        (&["task_id"], "id"),
        (&["column", "to"], "lane"),
        (&["position"], "index"),
        (&["farm"], "farm_id"),
        (&["crop"], "crop_id"),
        (&["due"], "due_date"),
        (&["description"], "notes"),
    ];
    for (from_keys, to_key) in aliases {
        for from_key in *from_keys {
            if let Some(value) = params.remove(*from_key) {
                params.entry(to_key.to_string()).or_insert(value);
            }
        }
    }
}

/// Simple camelCase to snake_case conversion
fn to_snake_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.extend(c.to_lowercase());
    }
    result
}
