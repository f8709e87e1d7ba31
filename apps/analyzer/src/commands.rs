//! Line commands accepted by the interactive front end.

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// `None` behaves like a cancelled file picker.
    Select(Option<PathBuf>),
    Clear,
    Submit,
    Status,
    Save(Option<String>),
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub const HELP: &str = "\
commands:
  select <path>   choose the image to analyze
  clear           drop the current selection
  submit          send the selected image for analysis
  status          show selection, submit control and result
  save [file]     save the current report
  help            show this help
  quit            exit";

pub fn parse_command(line: &str) -> ReplCommand {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let arg = (!rest.is_empty()).then(|| rest.to_string());

    match word.to_ascii_lowercase().as_str() {
        "" => ReplCommand::Empty,
        "select" | "open" => ReplCommand::Select(arg.map(PathBuf::from)),
        "clear" => ReplCommand::Clear,
        "submit" | "analyze" => ReplCommand::Submit,
        "status" => ReplCommand::Status,
        "save" => ReplCommand::Save(arg),
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => ReplCommand::Unknown(other.to_string()),
    }
}
