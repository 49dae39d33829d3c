use anyhow::{Context, Result, bail};
use clap::Parser;
use editablehints_core::{
    Backend, Candidate, Capabilities, Document, EditableHints, HintValue, HintsConfig, KeyEvent,
    KeyResult,
};
use std::cell::RefCell;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Drive the inline hints widget against an in-memory editor.
///
/// Reads one command per line from `--script` or stdin:
/// `type <text>`, `key <name>`, `show`, `quit`.
#[derive(Parser)]
#[command(name = "hints-demo")]
struct Args {
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON hint list, overrides the config's hints
    #[arg(long)]
    hints: Option<PathBuf>,

    /// Trigger character
    #[arg(long)]
    trigger: Option<char>,

    /// Use the legacy text-range selection back-end
    #[arg(long)]
    legacy: bool,

    /// Read commands from this file instead of stdin
    #[arg(long)]
    script: Option<PathBuf>,

    /// Initial editor text, caret at the end
    #[arg(long, default_value = "")]
    text: String,
}

#[derive(Debug, PartialEq)]
enum Command {
    Type(String),
    Key(KeyEvent),
    Show,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return Ok(None);
    }
    if let Some(text) = line.strip_prefix("type ") {
        return Ok(Some(Command::Type(text.to_string())));
    }
    let mut parts = line.split_whitespace();
    let command = match (parts.next(), parts.next()) {
        (Some("key"), Some(name)) => match KeyEvent::from_name(name) {
            Some(key) => Command::Key(key),
            None => bail!("unknown key: {}", name),
        },
        (Some("show"), None) => Command::Show,
        (Some("quit"), None) => Command::Quit,
        _ => bail!("unknown command: {}", line),
    };
    Ok(Some(command))
}

fn default_hints() -> Vec<Candidate> {
    ["alice", "alfred", "anna", "bob", "carol"]
        .into_iter()
        .map(Candidate::plain)
        .collect()
}

fn load_config(args: &Args) -> Result<HintsConfig> {
    let mut config = match &args.config {
        Some(path) => HintsConfig::load_toml(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => HintsConfig::default(),
    };
    if let Some(path) = &args.hints {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read hints {}", path.display()))?;
        config
            .load_hints_json(&json)
            .with_context(|| format!("failed to parse hints {}", path.display()))?;
    }
    if config.hints.is_empty() {
        config.hints = default_hints();
    }
    if let Some(trigger) = args.trigger {
        config.trigger = trigger;
    }
    Ok(config)
}

/// Markup the commit put into the editor.
fn inserted_markup(candidate: &Candidate) -> String {
    match &candidate.value {
        HintValue::Markup(markup) => markup.clone(),
        HintValue::Element(element) => element.to_markup(),
    }
}

struct Demo {
    editor: Rc<RefCell<Document>>,
    hints: EditableHints<Document>,
}

impl Demo {
    fn new(args: &Args, config: HintsConfig) -> Result<Self> {
        let capabilities = if args.legacy {
            Capabilities::TEXT_RANGE_ONLY
        } else {
            Capabilities::ALL
        };
        let editor = Rc::new(RefCell::new(
            Document::with_text(&args.text)
                .with_capabilities(capabilities)
                .with_editor_origin(8, 8),
        ));
        let mut builder = EditableHints::builder(config).editor(editor.clone());
        if args.legacy {
            builder = builder.backend(Backend::TextRange);
        }
        let hints = builder.build().context("failed to attach hints widget")?;
        debug!(backend = ?hints.backend(), "demo ready");
        Ok(Demo { editor, hints })
    }

    /// Key-down, native effect unless suppressed, key-up, then run the queue.
    fn press(&mut self, key: KeyEvent) -> Result<()> {
        if self.hints.key_down(key)? == KeyResult::NotHandled {
            self.editor.borrow_mut().apply_native(&key);
        }
        self.hints.key_up(key);
        self.hints.tick()?;
        if let Some(candidate) = self.hints.take_committed() {
            println!("committed {}", serde_json::to_string(&candidate)?);
            println!("inserted  {}", inserted_markup(&candidate));
        }
        Ok(())
    }

    fn show(&self) {
        let doc = self.editor.borrow();
        let text = doc.text();
        let caret = doc.caret_position();
        let (before, after): (String, String) = (
            text.chars().take(caret).collect(),
            text.chars().skip(caret).collect(),
        );
        println!("text  {:?}", format!("{}|{}", before, after));
        println!("caret {}", caret);

        let view = self.hints.view();
        if !view.visible {
            println!("menu  hidden");
            return;
        }
        println!(
            "menu  .{} at ({}, {}) rows {}-{} of {}",
            view.class_name,
            view.position.x,
            view.position.y,
            view.scroll_top + 1,
            view.scroll_top + view.visible_entries().len(),
            view.entries.len()
        );
        for (row, entry) in view.visible_entries().iter().enumerate() {
            let marker = if view.highlighted == Some(view.scroll_top + row) {
                ">"
            } else {
                " "
            };
            println!("  {} [{}] {}", marker, entry.index, entry.text);
        }
    }

    fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        for (lineno, line) in input.lines().enumerate() {
            let line = line.context("failed to read command")?;
            let command = parse_command(&line).with_context(|| format!("line {}", lineno + 1))?;
            match command {
                None => continue,
                Some(Command::Quit) => break,
                Some(Command::Show) => {}
                Some(Command::Type(text)) => {
                    for ch in text.chars() {
                        self.press(KeyEvent::Char(ch))?;
                    }
                }
                Some(Command::Key(key)) => self.press(key)?,
            }
            self.show();
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut demo = Demo::new(&args, config)?;
    demo.show();

    match &args.script {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("failed to open script {}", path.display()))?;
            demo.run(BufReader::new(file))
        }
        None => demo.run(io::stdin().lock()),
    }
}
