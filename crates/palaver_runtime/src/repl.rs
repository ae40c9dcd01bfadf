//! The chat REPL.
//!
//! Lines starting with `/` are commands; anything else is said to the NPC
//! the player is facing.

use crate::editor::{LineEditor, ReadResult, RustylineEditor};
use crate::world::World;
use palaver_engine::{Actor, Reply, StepOutcome};
use palaver_foundation::{Error, Result};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// What evaluating one line produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Evaluated {
    /// Lines to show the user.
    Output(Vec<String>),
    /// The user asked to quit.
    Quit,
}

/// The interactive REPL.
pub struct Repl<E: LineEditor = RustylineEditor> {
    /// The line editor for input.
    editor: E,

    /// The world being played.
    world: World,

    /// Whether to show the welcome banner.
    show_banner: bool,

    /// Prompt shown when no NPC is being addressed.
    prompt: String,
}

impl Repl<RustylineEditor> {
    /// Creates a REPL over the demo world with the rustyline editor.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor or the demo world fails to initialize.
    pub fn new() -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, World::demo(0)?))
    }
}

impl<E: LineEditor> Repl<E> {
    /// Creates a REPL with the given editor and world.
    pub fn with_editor(mut editor: E, world: World) -> Self {
        editor.set_keywords(Self::npc_names(&world));
        Self {
            editor,
            world,
            show_banner: true,
            prompt: "> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the prompt shown when no NPC is being addressed.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// The world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world, for setting up scenarios.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Runs the REPL loop until `/quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input fails fatally.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }

        loop {
            match self.read_eval_print() {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => {
                    self.print_error(&e);
                }
            }
        }

        println!("\nFarewell, {}.", self.world.player().name());
        Ok(())
    }

    /// Executes one read-eval-print iteration.
    ///
    /// Returns `Ok(true)` to continue, `Ok(false)` to exit.
    fn read_eval_print(&mut self) -> Result<bool> {
        let prompt = match self.world.current() {
            Some(npc) => format!("[{npc}] {}", self.prompt),
            None => self.prompt.clone(),
        };
        let input = match self.editor.read_line(&prompt)? {
            ReadResult::Line(line) => line,
            ReadResult::Interrupted => return Ok(true),
            ReadResult::Eof => return Ok(false),
        };
        if input.trim().is_empty() {
            return Ok(true);
        }
        self.editor.add_history(&input);

        match self.eval(&input)? {
            Evaluated::Output(lines) => {
                Self::print_lines(&lines);
                Ok(true)
            }
            Evaluated::Quit => Ok(false),
        }
    }

    /// Evaluates every non-blank line of a script, printing the output.
    ///
    /// Stops early at `/quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a command fails.
    pub fn eval_file(&mut self, path: &Path) -> Result<()> {
        let script = fs::read_to_string(path)
            .map_err(|e| Error::io(format!("{}: {e}", path.display())))?;
        for line in script.lines().filter(|line| !line.trim().is_empty()) {
            println!("{}{line}", self.prompt);
            match self.eval(line)? {
                Evaluated::Output(lines) => Self::print_lines(&lines),
                Evaluated::Quit => break,
            }
        }
        Ok(())
    }

    /// Evaluates one line of input.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands, bad arguments, and failures
    /// of the world.
    pub fn eval(&mut self, input: &str) -> Result<Evaluated> {
        let input = input.trim();
        let Some(command) = input.strip_prefix('/') else {
            return Ok(Evaluated::Output(self.say(input)));
        };
        let (name, argument) = match command.split_once(char::is_whitespace) {
            Some((name, argument)) => (name, argument.trim()),
            None => (command, ""),
        };

        let lines = match name {
            "quit" | "exit" => return Ok(Evaluated::Quit),
            "talk" => self.talk(argument)?,
            "leave" => self.leave(),
            "npcs" => self.npcs(),
            "state" => self.state(),
            "tick" => self.tick(argument)?,
            "help" => Self::help(),
            other => {
                return Err(Error::internal(format!(
                    "unknown command /{other}; try /help"
                )));
            }
        };
        Ok(Evaluated::Output(lines))
    }

    fn say(&mut self, text: &str) -> Vec<String> {
        let Some(reply) = self.world.say(text) else {
            return vec!["You are not talking to anyone. Try /talk <npc>.".to_string()];
        };
        let mut lines = self.render(&reply);
        if reply.is_empty() && matches!(reply.outcome(), StepOutcome::NoMatch) {
            lines.push("(no response)".to_string());
        }
        lines.extend(self.private_messages());
        lines
    }

    fn talk(&mut self, name: &str) -> Result<Vec<String>> {
        if name.is_empty() {
            return Err(Error::internal("usage: /talk <npc>"));
        }
        if self.world.registry().get(name).is_none() {
            return Err(Error::internal(format!("nobody called {name} is here")));
        }
        let mut lines = self.leave();
        if let Some(npc) = self.world.approach(name) {
            lines.push(format!("You approach {npc}."));
        }
        if let Some(description) = self
            .world
            .current()
            .and_then(|npc| self.world.registry().get(npc))
            .and_then(|npc| npc.description())
        {
            lines.push(description.to_string());
        }
        Ok(lines)
    }

    fn leave(&mut self) -> Vec<String> {
        let npc = self.world.current().map(str::to_string);
        match (npc, self.world.leave()) {
            (Some(npc), Some(reply)) => reply
                .lines()
                .iter()
                .map(|line| format!("{npc}: {line}"))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn npcs(&self) -> Vec<String> {
        self.world
            .registry()
            .iter()
            .map(|npc| {
                let marker = if self.world.current() == Some(npc.name()) {
                    "*"
                } else {
                    " "
                };
                format!("{marker} {} at {}", npc.name(), npc.position())
            })
            .collect()
    }

    fn state(&self) -> Vec<String> {
        let player = self.world.player();
        let mut lines = vec![format!(
            "{} | minute {} | {} money",
            player.name(),
            self.world.clock().now(),
            player.money()
        )];
        match (self.world.current(), self.world.current_state()) {
            (Some(npc), Some(state)) => lines.push(format!("talking to {npc} ({state})")),
            (Some(npc), None) => lines.push(format!("facing {npc}")),
            _ => lines.push("talking to no one".to_string()),
        }
        let items: Vec<String> = player
            .items()
            .into_iter()
            .map(|(item, count)| format!("{count} x {item}"))
            .collect();
        if !items.is_empty() {
            lines.push(format!("bag: {}", items.join(", ")));
        }
        for (slot, value) in player.quests().iter() {
            lines.push(format!("quest {slot} = {value}"));
        }
        lines
    }

    fn tick(&mut self, argument: &str) -> Result<Vec<String>> {
        let minutes = if argument.is_empty() {
            1
        } else {
            argument
                .parse()
                .map_err(|_| Error::internal(format!("invalid number of minutes: {argument}")))?
        };
        let report = self.world.tick(minutes)?;
        let mut lines = vec![format!("It is now minute {}.", report.minute)];
        lines.extend(
            report
                .moved
                .iter()
                .map(|(npc, position)| format!("{npc} walks to {position}.")),
        );
        if report.expired > 0 {
            lines.push(format!("{} offers expired.", report.expired));
        }
        Ok(lines)
    }

    fn help() -> Vec<String> {
        [
            "/talk <npc>     turn to an NPC",
            "/leave          walk away from the current NPC",
            "/npcs           list NPCs and where they stand",
            "/state          show the player and the conversation",
            "/tick [min]     let game time pass",
            "/quit           leave the game",
            "anything else is said to the NPC you face",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }

    fn render(&self, reply: &Reply) -> Vec<String> {
        let npc = self.world.current().unwrap_or("?");
        let mut lines: Vec<String> = reply
            .lines()
            .iter()
            .flat_map(|line| line.lines())
            .map(|line| format!("{npc}: {line}"))
            .collect();
        if let StepOutcome::Faulted { error, .. } = reply.outcome() {
            lines.push(format!("({npc} seems confused: {error})"));
        }
        lines
    }

    fn private_messages(&mut self) -> Vec<String> {
        self.world
            .player_mut()
            .drain_private_messages()
            .into_iter()
            .map(|message| format!("* {message}"))
            .collect()
    }

    fn npc_names(world: &World) -> Vec<String> {
        world
            .registry()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn print_lines(lines: &[String]) {
        for line in lines {
            println!("{line}");
        }
    }

    #[allow(clippy::unused_self)]
    fn print_error(&self, error: &Error) {
        eprintln!("\x1b[31mError: {error}\x1b[0m");
    }

    /// Prints the welcome banner.
    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mPalaver v{}\x1b[0m", env!("CARGO_PKG_VERSION"));
        println!("Say /talk <npc> to start a conversation, /help for commands.");
        println!("NPCs here: {}\n", self.world.registry().names().join(", "));
        let _ = io::stdout().flush();
    }
}
