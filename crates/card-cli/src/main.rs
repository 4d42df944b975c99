mod shell;

use card_spec::{ActionButtonStyle, ButtonId, UiNode};
use clap::{Parser, Subcommand, ValueEnum};
use component_card::{CardSession, check, render_html, render_json_ui, render_text};
use serde_json::{Value, json};
use shell::{ShellCommand, ShellPresenter, Verbosity};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const BUTTON_STYLE_ENV: &str = "CARD_PREVIEW_BUTTON_STYLE";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Preview interactive message cards",
    long_about = "Parses card documents, renders them as HTML, text or a JSON UI tree, and lets you click through their actions in a text shell"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderFormat {
    Html,
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ButtonStyleArg {
    Link,
    Push,
}

impl From<ButtonStyleArg> for ActionButtonStyle {
    fn from(arg: ButtonStyleArg) -> Self {
        match arg {
            ButtonStyleArg::Link => ActionButtonStyle::Link,
            ButtonStyleArg::Push => ActionButtonStyle::Push,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Render a card once.
    Render {
        /// Path to the card JSON document.
        #[arg(long, value_name = "CARD")]
        card: PathBuf,
        #[arg(long, value_enum, default_value_t = RenderFormat::Html)]
        format: RenderFormat,
        /// Button style; defaults to CARD_PREVIEW_BUTTON_STYLE, then the card shape's style.
        #[arg(long, value_enum)]
        button_style: Option<ButtonStyleArg>,
    },
    /// Check that a card parses.
    Check {
        #[arg(long, value_name = "CARD")]
        card: PathBuf,
    },
    /// Print the JSON Schema of the rendered UI tree.
    Schema,
    /// Click through a card's actions in a text shell.
    Interact {
        #[arg(long, value_name = "CARD")]
        card: PathBuf,
        #[arg(long, value_enum)]
        button_style: Option<ButtonStyleArg>,
        /// Show button ids and states, request bodies and input values.
        #[arg(long, alias = "debug")]
        verbose: bool,
    },
}

fn main() -> CliResult<()> {
    let _ = env_logger::try_init();
    let cli = Cli::parse();
    match cli.command {
        Command::Render {
            card,
            format,
            button_style,
        } => run_render(card, format, button_style),
        Command::Check { card } => run_check(card),
        Command::Schema => run_schema(),
        Command::Interact {
            card,
            button_style,
            verbose,
        } => run_interact(card, button_style, verbose),
    }
}

/// Flag first, then the environment. `None` leaves the choice to the card shape.
fn resolve_button_style(flag: Option<ButtonStyleArg>) -> Option<ActionButtonStyle> {
    if let Some(flag) = flag {
        return Some(flag.into());
    }
    let raw = env::var(BUTTON_STYLE_ENV).ok()?;
    let style = ActionButtonStyle::parse(&raw);
    if style.is_none() {
        log::warn!("ignoring {}='{}'; expected link or push", BUTTON_STYLE_ENV, raw);
    }
    style
}

fn style_name(style: ActionButtonStyle) -> &'static str {
    match style {
        ActionButtonStyle::Link => "link",
        ActionButtonStyle::Push => "push",
    }
}

fn config_for(card_json: &str, style: Option<ActionButtonStyle>) -> String {
    json!({
        "card_json": card_json,
        "button_style": style.map(style_name),
    })
    .to_string()
}

fn parse_component_result(response: &str) -> CliResult<Value> {
    let value: Value = serde_json::from_str(response)?;
    if let Some(error) = value.get("error").and_then(Value::as_str) {
        Err(error.into())
    } else {
        Ok(value)
    }
}

/// HTML and text responses are plain strings; failures still come back as an error envelope.
fn component_text(response: String) -> CliResult<String> {
    if let Ok(value) = serde_json::from_str::<Value>(&response)
        && let Some(error) = value.get("error").and_then(Value::as_str)
    {
        return Err(error.into());
    }
    Ok(response)
}

fn run_render(
    card_path: PathBuf,
    format: RenderFormat,
    button_style: Option<ButtonStyleArg>,
) -> CliResult<()> {
    let card_json = fs::read_to_string(&card_path)?;
    let config = config_for(&card_json, resolve_button_style(button_style));
    match format {
        RenderFormat::Html => println!("{}", component_text(render_html(&config))?),
        RenderFormat::Text => print!("{}", component_text(render_text(&config))?),
        RenderFormat::Json => {
            let tree = parse_component_result(&render_json_ui(&config))?;
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
    }
    Ok(())
}

fn run_check(card_path: PathBuf) -> CliResult<()> {
    let card_json = fs::read_to_string(&card_path)?;
    let result = parse_component_result(&check(&config_for(&card_json, None)))?;
    if result["valid"].as_bool().unwrap_or(false) {
        println!("{}: valid", card_path.display());
        Ok(())
    } else {
        let error = result["error"].as_str().unwrap_or("malformed card");
        println!("{}: invalid", card_path.display());
        Err(error.into())
    }
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(UiNode);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

fn run_interact(
    card_path: PathBuf,
    button_style: Option<ButtonStyleArg>,
    verbose: bool,
) -> CliResult<()> {
    let card_json = fs::read_to_string(&card_path)?;
    let mut session = CardSession::new(&card_json)?;
    if let Some(style) = resolve_button_style(button_style) {
        session = session.with_button_style(style);
    }
    let verbosity = Verbosity::from_verbose(verbose);
    let presenter = ShellPresenter::new(verbosity);

    let mut redraw = true;
    loop {
        if redraw {
            let tree = session.render();
            presenter.show_card(&tree);
            presenter.show_buttons(session.buttons());
            if verbosity.is_verbose() {
                presenter.show_inputs(&session.input_values());
            }
        }
        let buttons: Vec<ButtonId> = session.buttons().map(|button| button.id()).collect();

        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        redraw = false;
        match ShellCommand::parse(&line, buttons.len()) {
            Ok(ShellCommand::Exit) => break,
            Ok(ShellCommand::Help) => presenter.show_help(),
            Ok(ShellCommand::Inputs) => presenter.show_inputs(&session.input_values()),
            Ok(ShellCommand::Set { id, value }) => {
                if session.set_input_value(&id, value) {
                    redraw = true;
                } else {
                    eprintln!("No input with id '{}'.", id);
                }
            }
            Ok(ShellCommand::Click(index)) => {
                match session.click(&buttons[index - 1].to_string()) {
                    Ok(report) => presenter.show_click(&report),
                    Err(err) => presenter.show_click_error(&err),
                }
                redraw = true;
            }
            Err(err) => presenter.show_parse_error(&err),
        }
    }

    Ok(())
}
