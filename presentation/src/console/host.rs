//! Interactive host console
//!
//! Simulates a shared server on one terminal: the host adds and removes
//! participants and types on their behalf. Notices the engine sends to
//! participants are printed by the [`NotificationSink`] the engine was built
//! with; this console only prints host-facing output.

use super::command::{CommandParseError, ConsoleCommand};
use crate::output::console::ConsoleFormatter;
use ballot_application::{
    CastError, InitiationError, NotificationSink, PolicyAccessorPort, RosterRegistry, SubmitCommandUseCase,
    SubmitError, SubmitOutcome, VoteEngine,
};
use ballot_domain::{NoticeTemplate, Participant, ParticipantId, VoteChoice};
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const HISTORY_CAPACITY: usize = 500;

/// What the console loop should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Print these lines and read the next command
    Continue(Vec<String>),
    Quit,
}

impl Flow {
    fn say(line: impl Into<String>) -> Self {
        Flow::Continue(vec![line.into()])
    }

    fn silent() -> Self {
        Flow::Continue(Vec::new())
    }
}

/// A line read by the editor thread, acknowledged once handled
struct InputLine {
    text: String,
    /// `true` tells the reader to stop
    done: oneshot::Sender<bool>,
}

/// Host console over a running vote engine
pub struct HostConsole {
    engine: Arc<VoteEngine>,
    submit: SubmitCommandUseCase,
    roster: Arc<dyn RosterRegistry>,
    policy: Arc<dyn PolicyAccessorPort>,
    notifier: Arc<dyn NotificationSink>,
}

impl HostConsole {
    pub fn new(
        engine: Arc<VoteEngine>,
        submit: SubmitCommandUseCase,
        roster: Arc<dyn RosterRegistry>,
        policy: Arc<dyn PolicyAccessorPort>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            engine,
            submit,
            roster,
            policy,
            notifier,
        }
    }

    /// Run the interactive console until `/quit` or end of input.
    ///
    /// The line editor blocks, so it runs on its own thread and hands each
    /// line over a channel; it waits for the line to be handled before
    /// showing the next prompt.
    pub async fn run(&self) -> std::io::Result<()> {
        self.print_welcome();

        let (tx, mut rx) = mpsc::channel::<InputLine>(1);
        let reader = std::thread::Builder::new()
            .name("console-reader".to_string())
            .spawn(move || read_lines(tx))?;

        while let Some(InputLine { text, done }) = rx.recv().await {
            let flow = match ConsoleCommand::parse(&text) {
                Ok(command) => self.dispatch(command).await,
                Err(CommandParseError::Empty) => Flow::silent(),
                Err(e) => Flow::say(e.to_string().red().to_string()),
            };

            match flow {
                Flow::Continue(lines) => {
                    for line in lines {
                        println!("{}", line);
                    }
                    let _ = done.send(false);
                }
                Flow::Quit => {
                    println!("Bye!");
                    let _ = done.send(true);
                    break;
                }
            }
        }

        tokio::task::spawn_blocking(move || reader.join())
            .await
            .map_err(std::io::Error::other)?
            .map_err(|_| std::io::Error::other("console reader panicked"))
    }

    /// Handle one parsed command
    pub async fn dispatch(&self, command: ConsoleCommand) -> Flow {
        match command {
            ConsoleCommand::Join { name, privileged } => {
                if self.roster.join(Participant::named(&name), privileged) {
                    Flow::say(format!("{} joined{}", name, if privileged { " as op" } else { "" }))
                } else {
                    Flow::say(format!("{} is already online", name))
                }
            }
            ConsoleCommand::Leave { name } => match self.roster.leave(&ParticipantId::new(name.as_str())) {
                Some(_) => Flow::say(format!("{} left", name)),
                None => Flow::say(format!("{} is not online", name)),
            },
            ConsoleCommand::Who => Flow::say(ConsoleFormatter::format_members(&self.roster.members())),
            ConsoleCommand::Status { json } => {
                let statuses = self.engine.status();
                Flow::say(if json {
                    ConsoleFormatter::format_status_json(&statuses)
                } else {
                    ConsoleFormatter::format_status(&statuses)
                })
            }
            ConsoleCommand::Set { key, value } => self.handle_set(key, value),
            ConsoleCommand::Help => Flow::Continue(help_lines()),
            ConsoleCommand::Quit => Flow::Quit,
            ConsoleCommand::Vote { name, choice } => match self.speaker(&name) {
                Ok(voter) => self.handle_vote(&voter, choice).await,
                Err(flow) => flow,
            },
            ConsoleCommand::VoteStatus { name } => match self.speaker(&name) {
                Ok(voter) => {
                    self.notifier.notify(voter.id(), &self.status_text());
                    Flow::silent()
                }
                Err(flow) => flow,
            },
            ConsoleCommand::Submit { name, command } => match self.speaker(&name) {
                Ok(actor) => self.handle_submit(&actor, &command).await,
                Err(flow) => flow,
            },
        }
    }

    /// Resolve a speaking participant, who must be online
    fn speaker(&self, name: &str) -> Result<Participant, Flow> {
        let id = ParticipantId::try_new(name).map_err(|e| Flow::say(e.to_string()))?;
        self.roster.find(&id).ok_or_else(|| {
            Flow::say(format!("{} is not online (use /join {})", name, name).red().to_string())
        })
    }

    async fn handle_vote(&self, voter: &Participant, choice: VoteChoice) -> Flow {
        match self.engine.cast_vote(voter.id(), choice).await {
            Ok(outcome) => {
                debug!("{} cast {:?}", voter.id(), outcome);
            }
            Err(CastError::NoActiveBallot) => {
                self.notifier.notify(voter.id(), NoticeTemplate::no_active_ballot());
            }
            Err(CastError::Domain(e)) => {
                self.notifier.notify(voter.id(), &e.to_string());
            }
        }
        Flow::silent()
    }

    async fn handle_submit(&self, actor: &Participant, command: &str) -> Flow {
        match self.submit.execute(actor, command).await {
            Ok(SubmitOutcome::Executed(code)) => Flow::say(
                format!("{} ran '{}' (exit code {})", actor.display_name(), command, code)
                    .dimmed()
                    .to_string(),
            ),
            Ok(SubmitOutcome::BallotOpened(_)) => Flow::silent(),
            Err(SubmitError::Empty) => Flow::say("Usage: <name>: <command>"),
            Err(SubmitError::Initiation(InitiationError::AlreadyActive)) => {
                self.notifier.notify(actor.id(), NoticeTemplate::already_active());
                Flow::silent()
            }
            Err(SubmitError::Initiation(InitiationError::TooFewOnline { required, online })) => {
                self.notifier
                    .notify(actor.id(), &NoticeTemplate::too_few_online(required, online));
                Flow::silent()
            }
            Err(SubmitError::Executor(e)) => {
                warn!("Direct execution of '{}' failed: {}", command, e);
                self.notifier
                    .notify(actor.id(), &NoticeTemplate::execution_failed(&e.to_string()));
                Flow::silent()
            }
        }
    }

    fn handle_set(&self, key: Option<String>, value: Option<String>) -> Flow {
        match (key, value) {
            (None, _) => {
                let entries: Vec<(&str, String)> = self
                    .policy
                    .policy_keys()
                    .into_iter()
                    .filter_map(|k| self.policy.policy_get(k).ok().map(|v| (k, v)))
                    .collect();
                Flow::say(ConsoleFormatter::format_policy(&entries))
            }
            (Some(key), None) => match self.policy.policy_get(&key) {
                Ok(v) => Flow::say(format!("{} = {}", key, v)),
                Err(e) => Flow::say(e.to_string().red().to_string()),
            },
            (Some(key), Some(value)) => match self.policy.policy_set(&key, &value) {
                Ok(issues) => {
                    let mut lines = vec![format!("{} = {}", key, value).green().to_string()];
                    if !issues.is_empty() {
                        lines.push(ConsoleFormatter::format_issues(&issues));
                    }
                    Flow::Continue(lines)
                }
                Err(e) => Flow::say(e.to_string().red().to_string()),
            },
        }
    }

    /// Plain status text sent to a participant
    fn status_text(&self) -> String {
        let statuses = self.engine.status();
        if statuses.is_empty() {
            return NoticeTemplate::no_active_votes().to_string();
        }
        statuses
            .iter()
            .map(|s| NoticeTemplate::status_report(&s.payload, &s.tally(), s.seconds_remaining))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          Ballot Gate - Host Console         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        for line in help_lines() {
            println!("{}", line);
        }
        println!();
    }
}

fn help_lines() -> Vec<String> {
    [
        "Host commands:",
        "  /join <name> [--op]   - Bring a participant online (--op: may bypass votes)",
        "  /leave <name>         - Take a participant offline",
        "  /who                  - List online participants",
        "  /status [--json]      - Show open ballots",
        "  /set [key] [value]    - Show or change voting policy",
        "  /help, /h, /?         - Show this help",
        "  /quit, /exit, /q      - Exit",
        "",
        "Speak as a participant:",
        "  <name>: <command>     - Run a command (gated commands open a vote)",
        "  <name>: /yes | /no    - Vote on the open ballot",
        "  <name>: /votestatus   - Show open ballots to that participant",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn history_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("ballot-gate").join("history.txt"))
}

/// Editor loop, run on a dedicated thread
fn read_lines(tx: mpsc::Sender<InputLine>) {
    let mut editor = Reedline::create();
    if let Some(path) = history_path() {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match FileBackedHistory::with_file(HISTORY_CAPACITY, path) {
            Ok(history) => editor = editor.with_history(Box::new(history)),
            Err(e) => warn!("Console history disabled: {}", e),
        }
    }

    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic("ballot".to_string()),
        DefaultPromptSegment::Empty,
    );

    loop {
        match editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let (done_tx, done_rx) = oneshot::channel();
                let input = InputLine {
                    text: line,
                    done: done_tx,
                };
                if tx.blocking_send(input).is_err() {
                    break;
                }
                if done_rx.blocking_recv().unwrap_or(true) {
                    break;
                }
            }
            Ok(Signal::CtrlC) => {
                println!("^C");
            }
            Ok(_) => {
                println!("Bye!");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
}
