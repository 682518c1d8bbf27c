//! Privileged command gate
//!
//! Decides whether a command attempted by a participant may run directly,
//! must go to a ballot, or is the trusted re-submission of an approved one.

use super::context::ExecutionContext;
use std::collections::BTreeSet;

/// Commands that need a ballot when attempted by non-privileged participants
pub const DEFAULT_GATED_COMMANDS: &[&str] = &[
    "gamemode",
    "gamerule",
    "give",
    "tp",
    "teleport",
    "kill",
    "ban",
    "kick",
    "op",
    "deop",
    "whitelist",
    "difficulty",
    "stop",
    "setblock",
    "fill",
    "summon",
    "effect",
    "enchant",
    "weather",
    "time",
    "spawnpoint",
    "setworldspawn",
];

/// Verdict for one attempted command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Not gated, or the actor is privileged
    Allow,
    /// Gated and the actor lacks privilege: open a ballot
    RequireVote,
    /// Gated, but carried by an approval for this exact command
    Bypass,
}

impl GateDecision {
    pub fn may_execute(&self) -> bool {
        !matches!(self, GateDecision::RequireVote)
    }
}

/// Set of gated command names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandGate {
    commands: BTreeSet<String>,
}

impl Default for CommandGate {
    fn default() -> Self {
        Self::new(DEFAULT_GATED_COMMANDS.iter().copied())
    }
}

impl CommandGate {
    /// Gate over the given command names (leading `/` and case ignored)
    pub fn new<I, S>(commands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            commands: commands
                .into_iter()
                .filter_map(|c| normalize(c.as_ref()))
                .collect(),
        }
    }

    /// First token of `input` without its leading `/`
    pub fn command_name(input: &str) -> Option<&str> {
        let first = input.split_whitespace().next()?;
        let name = first.trim_start_matches('/');
        (!name.is_empty()).then_some(name)
    }

    pub fn is_gated(&self, input: &str) -> bool {
        Self::command_name(input)
            .and_then(normalize)
            .is_some_and(|name| self.commands.contains(&name))
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Classify an attempted command.
    ///
    /// # Example
    ///
    /// ```
    /// use ballot_domain::{CommandGate, ExecutionContext, GateDecision, Participant};
    ///
    /// let gate = CommandGate::default();
    /// let ctx = ExecutionContext::direct(Participant::named("steve"));
    /// assert_eq!(gate.evaluate("/weather rain", false, &ctx), GateDecision::RequireVote);
    /// assert_eq!(gate.evaluate("/weather rain", true, &ctx), GateDecision::Allow);
    /// assert_eq!(gate.evaluate("/say hi", false, &ctx), GateDecision::Allow);
    /// ```
    pub fn evaluate(&self, input: &str, privileged: bool, ctx: &ExecutionContext) -> GateDecision {
        if !self.is_gated(input) {
            return GateDecision::Allow;
        }
        if let Some(approval) = &ctx.approval
            && approval.covers(input, ctx.actor.id())
        {
            return GateDecision::Bypass;
        }
        if privileged {
            GateDecision::Allow
        } else {
            GateDecision::RequireVote
        }
    }
}

fn normalize(name: &str) -> Option<String> {
    let name = name.trim().trim_start_matches('/').to_lowercase();
    (!name.is_empty()).then_some(name)
}
