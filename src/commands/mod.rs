//! Interactive commands typed at the viewer prompt

mod viewer;

pub use viewer::run_prompt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Reload the screen list
    List,
    /// Select a screen by option value; empty selects the default
    Select(String),
    Start,
    Stop,
    Toggle,
    Status,
    Help,
    Quit,
}

impl ViewerCommand {
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(word, rest)| (word, rest.trim()))
            .unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "list" | "reload" | "ls" => Ok(Self::List),
            "select" | "screen" => Ok(Self::Select(rest.to_string())),
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "toggle" | "" => Ok(Self::Toggle),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("Unknown command: {}", other)),
        }
    }
}

pub const HELP: &str = "\
Commands:
  list              reload the screen list
  select <index>    choose a screen (blank for the default)
  start | stop      start or stop viewing
  toggle | <enter>  press the start/stop button
  status            show the current state
  quit              close the session and exit";
