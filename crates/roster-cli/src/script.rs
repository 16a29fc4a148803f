//! JSON-lines command scripts.
//!
//! One command per line, `#` comments and blank lines are skipped:
//!
//! ```text
//! {"op":"update","user":"alice","nickname":"Alice"}
//! {"op":"schedule","user":"alice"}
//! {"op":"advance","secs":10}
//! {"op":"tick","caller":"bob"}
//! {"op":"show","user":"alice"}
//! ```

use anyhow::{Context, Result, bail};
use chrono::Duration;
use roster_core::ports::{Clock, ManualClock};
use roster_core::{ProfileFields, Registry, RosterError, UserId};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptCommand {
    Update {
        user: UserId,
        /// defaults to `user`
        caller: Option<UserId>,
        #[serde(flatten)]
        fields: ProfileFields,
    },
    Schedule {
        user: UserId,
        caller: Option<UserId>,
    },
    Tick {
        caller: UserId,
    },
    Advance {
        secs: i64,
    },
    Show {
        user: UserId,
    },
    Status,
}

impl ScriptCommand {
    fn name(&self) -> &'static str {
        match self {
            ScriptCommand::Update { .. } => "update",
            ScriptCommand::Schedule { .. } => "schedule",
            ScriptCommand::Tick { .. } => "tick",
            ScriptCommand::Advance { .. } => "advance",
            ScriptCommand::Show { .. } => "show",
            ScriptCommand::Status => "status",
        }
    }
}

/// Result line printed for every command.
#[derive(Debug, Serialize)]
pub struct Outcome {
    pub line: usize,
    pub op: &'static str,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl Outcome {
    fn ok(line: usize, op: &'static str, result: Value) -> Self {
        Self {
            line,
            op,
            ok: true,
            result: Some(result),
            error: None,
            kind: None,
        }
    }

    fn rejected(line: usize, op: &'static str, err: &RosterError) -> Self {
        Self {
            line,
            op,
            ok: false,
            result: None,
            error: Some(err.to_string()),
            kind: Some(format!("{:?}", err.kind()).to_lowercase()),
        }
    }
}

/// Parse a whole script. Fails on the first malformed line.
pub fn parse(input: &str) -> Result<Vec<(usize, ScriptCommand)>> {
    input
        .lines()
        .enumerate()
        .map(|(i, raw)| (i + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
        .map(|(n, line)| {
            let cmd = serde_json::from_str(line)
                .with_context(|| format!("line {n}: invalid command: {line}"))?;
            Ok((n, cmd))
        })
        .collect()
}

/// Run one command. Registry rejections are outcomes, not errors.
pub fn execute(
    registry: &mut Registry,
    clock: &ManualClock,
    line: usize,
    cmd: ScriptCommand,
) -> Result<Outcome> {
    let op = cmd.name();
    let outcome = match cmd {
        ScriptCommand::Update {
            user,
            caller,
            fields,
        } => {
            let caller = caller.unwrap_or_else(|| user.clone());
            match registry.update(&caller, &user, fields) {
                Ok(()) => Outcome::ok(line, op, serde_json::to_value(registry.profile(&user))?),
                Err(e) => Outcome::rejected(line, op, &e),
            }
        }
        ScriptCommand::Schedule { user, caller } => {
            let caller = caller.unwrap_or_else(|| user.clone());
            match registry.schedule(&caller, &user) {
                Ok(()) => Outcome::ok(line, op, serde_json::to_value(registry.pending(&user))?),
                Err(e) => Outcome::rejected(line, op, &e),
            }
        }
        ScriptCommand::Tick { caller } => match registry.tick(&caller) {
            Ok(report) => Outcome::ok(line, op, serde_json::to_value(report)?),
            Err(e) => Outcome::rejected(line, op, &e),
        },
        ScriptCommand::Advance { secs } => {
            let by = Duration::try_seconds(secs)
                .with_context(|| format!("line {line}: advance of {secs}s is out of range"))?;
            if secs > 0 && clock.now().checked_add_signed(by).is_none() {
                bail!("line {line}: advance of {secs}s moves the clock past the latest representable time");
            }
            let now = clock.advance(by);
            Outcome::ok(line, op, json!({ "now": now }))
        }
        ScriptCommand::Show { user } => {
            Outcome::ok(line, op, serde_json::to_value(registry.profile(&user))?)
        }
        ScriptCommand::Status => Outcome::ok(line, op, serde_json::to_value(registry.status())?),
    };
    Ok(outcome)
}
