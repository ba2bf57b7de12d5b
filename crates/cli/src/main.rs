use std::{fs::OpenOptions, path::PathBuf, rc::Rc, sync::Mutex};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use railnav_engine::{Document, ExpandedPreference, PanelElements, SidebarPanelController, parse_expanded};
use railnav_types::{NavigationTree, SIDEBAR_EXPANDED_KEY};
use railnav_util::{PreferenceStore, UserPreferences, expand_tilde, resolve_config_file};
use serde_json::json;
use tracing::{info, warn};

/// Overrides the navigation tree file when `--tree` is not given.
const TREE_PATH_ENV: &str = "RAILNAV_TREE_PATH";
/// Overrides where the TUI writes its log.
const LOG_PATH_ENV: &str = "RAILNAV_LOG_PATH";
const LOG_FILE_NAME: &str = "railnav.log";

/// Collapsible navigation sidebar in the terminal.
#[derive(Parser, Debug)]
#[command(name = "railnav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the sidebar shell (default)
    Run(RouteArgs),
    /// Print the navigation tree annotated for a path
    Tree(RouteArgs),
    /// Inspect or change the persisted sidebar preference
    #[command(subcommand)]
    Prefs(PrefsCommand),
}

#[derive(Args, Debug)]
struct RouteArgs {
    /// Current route path
    #[arg(long, default_value = "/")]
    path: String,

    /// JSON navigation tree to load instead of the built-in one
    #[arg(long)]
    tree: Option<PathBuf>,
}

impl Default for RouteArgs {
    fn default() -> Self {
        Self {
            path: "/".to_string(),
            tree: None,
        }
    }
}

#[derive(Subcommand, Debug)]
enum PrefsCommand {
    /// Show the stored value and how it is read
    Show,
    /// Store whether the desktop rail starts expanded
    SetExpanded {
        #[arg(action = clap::ArgAction::Set)]
        expanded: bool,
    },
    /// Forget the stored value
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command.unwrap_or_else(|| Command::Run(RouteArgs::default())) {
        Command::Run(args) => {
            init_file_tracing()?;
            let tree = load_tree(args.tree)?;
            railnav_tui::run(open_store(), tree, &args.path)
        }
        Command::Tree(args) => {
            init_tracing();
            let tree = load_tree(args.tree)?;
            println!("{}", annotated_tree(open_store().as_ref(), tree, &args.path)?);
            Ok(())
        }
        Command::Prefs(command) => {
            init_tracing();
            let store = UserPreferences::new().context("failed to open preferences")?;
            let location = store.path().display().to_string();
            println!("{}", run_prefs(Rc::new(store), location, command)?);
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

/// The TUI owns the terminal, so its log goes to a file.
fn init_file_tracing() -> Result<()> {
    let log_path = resolve_config_file(LOG_PATH_ENV, LOG_FILE_NAME);
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("failed to create log directory {}", parent.display()))?;
    }
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init();
    Ok(())
}

/// `--tree`, then the environment override, then the built-in tree.
fn load_tree(flag: Option<PathBuf>) -> Result<NavigationTree> {
    let from_env = std::env::var(TREE_PATH_ENV).ok().filter(|value| !value.trim().is_empty()).map(|value| expand_tilde(&value));
    match flag.or(from_env) {
        Some(path) => {
            info!(path = %path.display(), "loading navigation tree");
            NavigationTree::from_path(&path).with_context(|| format!("failed to load navigation tree from {}", path.display()))
        }
        None => NavigationTree::builtin().context("built-in navigation tree is invalid"),
    }
}

/// Preferences on disk, or an in-memory store when the file is unusable.
fn open_store() -> Rc<dyn PreferenceStore> {
    match UserPreferences::new() {
        Ok(store) => Rc::new(store),
        Err(error) => {
            warn!(error = %error, "Preferences unavailable; the expanded state will not persist");
            Rc::new(UserPreferences::ephemeral())
        }
    }
}

/// Builds a headless sidebar for `path` and renders its view model as JSON.
/// The stored preference is copied into a scratch store so this never writes.
fn annotated_tree(store: &dyn PreferenceStore, tree: NavigationTree, path: &str) -> Result<String> {
    let scratch = UserPreferences::ephemeral();
    if let Some(raw) = store.get(SIDEBAR_EXPANDED_KEY) {
        scratch.set(SIDEBAR_EXPANDED_KEY, &raw)?;
    }
    let document = Document::new();
    let elements = PanelElements::create(&document);
    let panel = SidebarPanelController::new(document, Rc::new(scratch), tree, elements, path);
    Ok(serde_json::to_string_pretty(&panel.view_model())?)
}

fn run_prefs(store: Rc<dyn PreferenceStore>, location: String, command: PrefsCommand) -> Result<String> {
    match command {
        PrefsCommand::Show => {
            let raw = store.get(SIDEBAR_EXPANDED_KEY);
            let report = json!({
                "path": location,
                "key": SIDEBAR_EXPANDED_KEY,
                "stored": raw,
                "expanded": parse_expanded(raw.as_deref()),
            });
            Ok(serde_json::to_string_pretty(&report)?)
        }
        PrefsCommand::SetExpanded { expanded } => {
            ExpandedPreference::new(store).save(expanded)?;
            Ok(format!("{SIDEBAR_EXPANDED_KEY} = {expanded}"))
        }
        PrefsCommand::Reset => {
            store.remove(SIDEBAR_EXPANDED_KEY)?;
            Ok(format!("{SIDEBAR_EXPANDED_KEY} cleared"))
        }
    }
}
