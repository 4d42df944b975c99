use card_spec::{ActionButton, ActionButtonState, InputValues, Transition, UiNode, render_text};
use component_card::{ClickReport, ComponentError};

/// Controls which bits of state the shell prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Card outline and numbered buttons only.
    Clean,
    /// Also button states, request JSON and input values after every step.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// One line typed at the shell prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// 1-based index into the listed buttons.
    Click(usize),
    Set { id: String, value: String },
    Inputs,
    Help,
    Exit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandParseError {
    pub user_message: String,
    pub debug_message: Option<String>,
}

impl CommandParseError {
    fn new(user_message: impl Into<String>, debug_message: Option<String>) -> Self {
        Self {
            user_message: user_message.into(),
            debug_message,
        }
    }
}

impl ShellCommand {
    pub fn parse(raw: &str, button_count: usize) -> Result<Self, CommandParseError> {
        let trimmed = raw.trim();
        let (head, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (trimmed, ""),
        };
        match head.to_ascii_lowercase().as_str() {
            "" => Err(CommandParseError::new("Type a command.", Some(usage()))),
            "exit" | "quit" => Ok(ShellCommand::Exit),
            "inputs" => Ok(ShellCommand::Inputs),
            "help" | "?" => Ok(ShellCommand::Help),
            "set" => {
                let (id, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if id.is_empty() {
                    return Err(CommandParseError::new(
                        "set needs an input id.",
                        Some("set <id> <value>".into()),
                    ));
                }
                Ok(ShellCommand::Set {
                    id: id.to_string(),
                    value: value.trim().to_string(),
                })
            }
            number => {
                let index = number.parse::<usize>().map_err(|_| {
                    CommandParseError::new(format!("Unknown command '{}'.", head), Some(usage()))
                })?;
                if index == 0 || index > button_count {
                    return Err(CommandParseError::new(
                        format!("No button numbered {}.", index),
                        Some(format!("a number between 1 and {}", button_count)),
                    ));
                }
                Ok(ShellCommand::Click(index))
            }
        }
    }
}

fn usage() -> String {
    "<n> clicks a button, set <id> <value>, inputs, exit".to_string()
}

/// Prints the card and the outcome of each command.
pub struct ShellPresenter {
    verbosity: Verbosity,
}

impl ShellPresenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn show_card(&self, tree: &UiNode) {
        println!("{}", render_text(tree));
    }

    pub fn show_buttons<'a>(&self, buttons: impl IntoIterator<Item = &'a ActionButton>) {
        println!("Buttons:");
        for (index, button) in buttons.into_iter().enumerate() {
            let mut line = format!("  {}. {}", index + 1, button.text());
            if self.verbosity.is_verbose() {
                line.push_str(&format!(" [{}]", button.id()));
            }
            match button.state() {
                ActionButtonState::Expanded => line.push_str(" (expanded)"),
                ActionButtonState::Subdued if self.verbosity.is_verbose() => {
                    line.push_str(" (subdued)")
                }
                _ => {}
            }
            println!("{}", line);
        }
    }

    pub fn show_click(&self, report: &ClickReport) {
        println!("{} -> {}", report.action, transition_label(report));
        if let Some(request) = &report.request {
            if self.verbosity.is_verbose() {
                match serde_json::to_string_pretty(request) {
                    Ok(pretty) => println!("{}", pretty),
                    Err(err) => eprintln!("Failed to serialize request: {}", err),
                }
            } else {
                match serde_json::to_string(request) {
                    Ok(line) => println!("Request: {}", line),
                    Err(err) => eprintln!("Failed to serialize request: {}", err),
                }
            }
        }
    }

    pub fn show_click_error(&self, error: &ComponentError) {
        eprintln!("Click failed: {}", error);
    }

    pub fn show_inputs(&self, values: &InputValues) {
        if values.is_empty() {
            println!("This card has no inputs.");
            return;
        }
        for (id, value) in values {
            println!("  {} = {}", id, value);
        }
    }

    pub fn show_parse_error(&self, error: &CommandParseError) {
        eprintln!("Invalid command: {}", error.user_message);
        if let Some(debug) = &error.debug_message {
            eprintln!("  Expected: {}", debug);
        }
    }

    pub fn show_help(&self) {
        println!("{}", usage());
    }
}

fn transition_label(report: &ClickReport) -> &'static str {
    match report.transition {
        Transition::Executed => "executed",
        Transition::Expanded => "expanded",
        Transition::Collapsed => "collapsed",
    }
}
