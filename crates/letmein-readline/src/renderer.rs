//! Terminal rendering of the game's render commands.

use colored::{ColoredString, Colorize};
use letmein_core::game::{ConnectionStatus, RenderCommand, Role, TranscriptEntry};
use letmein_core::level::{LevelButton, MAX_LEVEL};

use crate::input::COMMANDS;

/// Prints render commands as colored terminal output.
///
/// A terminal has no persistent widgets, so indicators are printed only when
/// their value changes. Input fields are owned by the line editor and need no
/// clearing.
#[derive(Debug, Default)]
pub struct TerminalRenderer {
    level: Option<u32>,
    completed: Option<u32>,
    buttons: Vec<LevelButton>,
    connection: Option<ConnectionStatus>,
    connection_requested: bool,
    awaiting_confirmation: bool,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&mut self, commands: &[RenderCommand]) {
        for command in commands {
            self.render_one(command);
        }
    }

    /// Returns true once after a reset confirmation was asked for: the next
    /// input line is the answer.
    pub fn take_confirmation(&mut self) -> bool {
        std::mem::take(&mut self.awaiting_confirmation)
    }

    fn render_one(&mut self, command: &RenderCommand) {
        match command {
            RenderCommand::SetLevelLabel(level) => {
                if self.level.replace(*level) != Some(*level) {
                    println!("{}", format!("== Level {} ==", level).bright_magenta().bold());
                }
            }
            RenderCommand::SetCompletedCount(count) => {
                if self.completed.replace(*count) != Some(*count) {
                    println!("{}", progress_line(*count).bright_black());
                }
            }
            RenderCommand::SetLevelButtons(buttons) => {
                if &self.buttons != buttons {
                    self.buttons = buttons.clone();
                    println!("{}", level_bar(buttons).bright_black());
                }
            }
            RenderCommand::ClearTranscript => {
                println!();
                println!("{}", "-".repeat(40).bright_black());
            }
            RenderCommand::Append(entry) => print_entry(entry),
            RenderCommand::Alert(message) => {
                println!("{}", format!("! {}", message).yellow());
            }
            RenderCommand::ConfirmReset => {
                self.awaiting_confirmation = true;
                println!(
                    "{}",
                    "Start a new game? All progress will be lost. (yes/no)".bright_yellow()
                );
            }
            RenderCommand::SetControl { control, busy } => {
                if *busy {
                    println!("{}", control.label(true).bright_black());
                }
            }
            RenderCommand::ClearInput(_) => {}
            RenderCommand::SetConnection(status) => {
                let changed = self.connection.replace(*status) != Some(*status);
                if changed || std::mem::take(&mut self.connection_requested) {
                    println!("{}", connection_line(*status));
                }
            }
        }
    }

    /// Prints the next connection result even when it is unchanged.
    pub fn report_next_connection(&mut self) {
        self.connection_requested = true;
    }

    pub fn print_help(&self) {
        println!("{}", "Type anything to talk to the level AI.".bright_black());
        for (name, description) in COMMANDS {
            println!("  {} {}", format!("{:<10}", name).bright_cyan(), description);
        }
        println!("  {} {}", format!("{:<10}", "quit").bright_cyan(), "same as /quit");
    }

    pub fn notice(&self, message: &str) {
        println!("{}", message.yellow());
    }
}

fn print_entry(entry: &TranscriptEntry) {
    println!("{}", colorize(entry.role, &format!("[{}]", heading(entry))).bold());
    for line in entry.content.lines() {
        println!("{}", colorize(entry.role, line));
    }
    println!();
}

fn colorize(role: Role, text: &str) -> ColoredString {
    match role {
        Role::User => text.green(),
        Role::Ai => text.bright_blue(),
        Role::Success => text.bright_green(),
        Role::Error => text.red(),
        Role::System => text.bright_black(),
    }
}

/// Label shown above an entry.
pub fn heading(entry: &TranscriptEntry) -> &str {
    if let Some(heading) = &entry.heading {
        return heading;
    }
    match entry.role {
        Role::User => "You",
        Role::Ai => "AI",
        Role::Success => "Success",
        Role::Error => "Error",
        Role::System => "Game",
    }
}

pub fn level_bar(buttons: &[LevelButton]) -> String {
    let cells: Vec<String> = buttons
        .iter()
        .map(|b| match (b.active, b.unlocked) {
            (true, _) => format!("[{}*]", b.level),
            (false, true) => format!("[{}]", b.level),
            (false, false) => format!("[{} locked]", b.level),
        })
        .collect();
    format!("Levels: {}", cells.join(" "))
}

pub fn progress_line(completed: u32) -> String {
    format!("Completed: {}/{}", completed, MAX_LEVEL)
}

fn connection_line(status: ConnectionStatus) -> ColoredString {
    let text = format!("Server: {}", status.label());
    match status {
        ConnectionStatus::Connected => text.green(),
        ConnectionStatus::Disconnected => text.yellow(),
        ConnectionStatus::Error => text.red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letmein_core::level::level_buttons;

    #[test]
    fn test_heading_defaults_and_override() {
        assert_eq!(heading(&TranscriptEntry::user("hi")), "You");
        assert_eq!(heading(&TranscriptEntry::system("Loading")), "Game");
        let entry = TranscriptEntry::ai("Welcome").with_heading("Level 2 AI");
        assert_eq!(heading(&entry), "Level 2 AI");
    }

    #[test]
    fn test_level_bar() {
        let bar = level_bar(&level_buttons(2, 1));
        assert_eq!(bar, "Levels: [1] [2*] [3 locked] [4 locked]");
    }

    #[test]
    fn test_progress_line() {
        assert_eq!(progress_line(3), "Completed: 3/4");
    }

    #[test]
    fn test_confirmation_is_taken_once() {
        let mut renderer = TerminalRenderer::new();
        assert!(!renderer.take_confirmation());
        renderer.render(&[RenderCommand::ConfirmReset]);
        assert!(renderer.take_confirmation());
        assert!(!renderer.take_confirmation());
    }

    #[test]
    fn test_indicators_track_last_value() {
        let mut renderer = TerminalRenderer::new();
        renderer.render(&[
            RenderCommand::SetLevelLabel(2),
            RenderCommand::SetConnection(ConnectionStatus::Error),
        ]);
        assert_eq!(renderer.level, Some(2));
        assert_eq!(renderer.connection, Some(ConnectionStatus::Error));
    }
}
