use std::fs;
use std::io;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use foldertools_opener::{
    expand_placeholders, menu_label, FolderOpener, SystemOpener, PACKAGES_PLACEHOLDER,
};
use foldertools_project::selection::EMPTY_PROJECT_HINT;
use foldertools_project::{
    run_selection, Effect, EntryFilter, ProjectError, ProjectManager, ProjectStore,
    ProjectStoreConfig, SelectionIntent, SelectionOutcome, SessionDocument, KEY_FOLDERS, KEY_PATH,
};
use foldertools_settings::{Config, ConfigStore};
use foldertools_statusbar::shorten_with;
use serde_json::{json, Value};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod picker;

use picker::LinePicker;

const LOG_ENV: &str = "FOLDERTOOLS_LOG";
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser)]
#[command(
    name = "foldertools",
    about = "Project files, folder shortcuts and status-bar paths for editor windows",
    author,
    version
)]
struct Cli {
    /// 指定工作區根目錄；預設為目前目錄。 / Workspace root (defaults to current directory).
    #[arg(long, global = true, value_name = "PATH")]
    workspace: Option<PathBuf>,
    /// 專案檔所在資料夾，優先於設定檔。 / Directory holding saved projects; overrides the config file.
    #[arg(long, global = true, value_name = "PATH")]
    projects_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 縮短路徑以顯示於狀態列。 / Shorten a path for display in the status bar.
    Shorten(ShortenArgs),
    /// 產生檔案的狀態列項目。 / Print the status-bar entry for a file.
    Status(StatusArgs),
    /// 管理已儲存的專案。 / Manage saved projects.
    #[command(subcommand)]
    Projects(ProjectsCommand),
    /// 在檔案管理員中開啟資料夾。 / Open folders in the system file manager.
    OpenFolder(OpenFolderArgs),
    /// 檢視或調整設定。 / Inspect or adjust the configuration.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
struct ShortenArgs {
    /// 要縮短的路徑。 / Path to shorten.
    path: String,
    /// 保留的資料夾層數；預設取自設定。 / Trailing directories to keep; defaults to the configured value.
    #[arg(long, value_name = "N")]
    max_dirs: Option<usize>,
    /// 路徑分隔字元；預設為平台分隔字元。 / Separator character; defaults to the platform's.
    #[arg(long, value_name = "CHAR")]
    separator: Option<char>,
}

#[derive(Args)]
struct StatusArgs {
    /// 目前檢視的檔案；未存檔時省略。 / File shown in the view; omit for an unsaved view.
    file: Option<String>,
}

#[derive(Subcommand)]
enum ProjectsCommand {
    /// 列出已儲存的專案。 / List saved projects.
    List,
    /// 顯示專案檔內容。 / Print a project's document.
    Show {
        name: String,
    },
    /// 由資料夾或工作階段檔建立專案。 / Save a project from folders or a session file.
    Save(SaveArgs),
    /// 刪除專案檔。 / Delete a project file.
    Remove {
        name: String,
    },
    /// 將專案載入工作階段檔。 / Load a project into a session file.
    Open {
        name: String,
        #[arg(long, value_name = "FILE")]
        session: PathBuf,
    },
    /// 以互動選單挑選專案。 / Pick a project interactively from stdin.
    Pick(PickArgs),
    /// 從目前資料夾中挑選子資料夾作為根目錄。 / Re-root the session at a sub-folder of its folder.
    Scope {
        #[arg(long, value_name = "FILE")]
        session: PathBuf,
    },
    /// 以第一個資料夾的上層作為根目錄。 / Re-root the session at its first folder's parent.
    Parent {
        #[arg(long, value_name = "FILE")]
        session: PathBuf,
    },
    /// 關閉工作階段中的資料夾。 / Close the session's folders.
    Close {
        #[arg(long, value_name = "FILE")]
        session: PathBuf,
    },
}

#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["folders", "from"])))]
struct SaveArgs {
    /// 專案名稱。 / Project name.
    name: String,
    /// 專案包含的資料夾，可重複指定。 / Folder to include; repeat for several.
    #[arg(long = "folder", value_name = "PATH")]
    folders: Vec<PathBuf>,
    /// 從工作階段檔取得資料夾與設定。 / Take folders and settings from a session file.
    #[arg(long, value_name = "FILE")]
    from: Option<PathBuf>,
}

#[derive(Args)]
struct PickArgs {
    /// 選取後的動作。 / What to do with the chosen project.
    #[arg(long, value_enum, default_value_t = PickAction::Open)]
    action: PickAction,
    /// 瀏覽時列出的項目類型。 / Entries offered when browsing.
    #[arg(long, value_enum, default_value_t = FilterChoice::Both)]
    filter: FilterChoice,
    /// 要更新的工作階段檔。 / Session file to update.
    #[arg(long, value_name = "FILE")]
    session: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PickAction {
    Open,
    Browse,
    Remove,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FilterChoice {
    #[value(alias = "dirs-only")]
    Dirs,
    #[value(alias = "files-only")]
    Files,
    Both,
}

impl From<FilterChoice> for EntryFilter {
    fn from(choice: FilterChoice) -> Self {
        match choice {
            FilterChoice::Dirs => EntryFilter::DirsOnly,
            FilterChoice::Files => EntryFilter::FilesOnly,
            FilterChoice::Both => EntryFilter::Both,
        }
    }
}

#[derive(Args)]
struct OpenFolderArgs {
    /// 要開啟的資料夾或檔案。 / Folders (or files) to reveal.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
    /// 只印出將執行的指令。 / Print the commands instead of running them.
    #[arg(long)]
    dry_run: bool,
    /// 取代路徑中 `$packages` 的資料夾。 / Directory substituted for `$packages` in the paths.
    #[arg(long, value_name = "DIR")]
    packages: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// 顯示目前設定。 / Print the effective configuration.
    Show,
    /// 設定狀態列保留的資料夾層數。 / Set how many directories the status bar keeps.
    SetMaxDirs { value: usize },
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        match err.downcast_ref::<ProjectError>() {
            Some(project_err) => eprintln!("Error: {}", project_err.status_message()),
            None => eprintln!("Error: {err}"),
        }
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn run() -> Result<()> {
    let Cli {
        workspace,
        projects_dir,
        command,
    } = Cli::parse();
    let workspace_root = resolve_workspace(workspace)?;
    let mut config = ConfigStore::open_workspace(&workspace_root)?;
    debug!(
        workspace = %workspace_root.display(),
        config = %config.path().display(),
        "loaded configuration"
    );

    match command {
        Commands::Shorten(args) => execute_shorten(args, config.config()),
        Commands::Status(args) => execute_status(args, config.config()),
        Commands::Projects(subcommand) => {
            let store = project_store(projects_dir, &workspace_root, config.config())?;
            execute_projects_command(subcommand, store)
        }
        Commands::OpenFolder(args) => execute_open_folder(args, config.config()),
        Commands::Config(subcommand) => execute_config_command(subcommand, &mut config),
    }
}

fn execute_shorten(args: ShortenArgs, config: &Config) -> Result<()> {
    let max_dirs = args.max_dirs.unwrap_or(config.status_bar.max_dirs);
    let separator = args.separator.unwrap_or(MAIN_SEPARATOR);
    println!("{}", shorten_with(&args.path, max_dirs, separator));
    Ok(())
}

fn execute_status(args: StatusArgs, config: &Config) -> Result<()> {
    if let Some(entry) = config.status_bar.status_for(args.file.as_deref()) {
        println!("{}\t{}", entry.key, entry.value);
    }
    Ok(())
}

fn execute_projects_command(command: ProjectsCommand, store: ProjectStore) -> Result<()> {
    let mut manager = ProjectManager::new(store);
    match command {
        ProjectsCommand::List => {
            let listing = manager.store().list();
            if listing.projects.is_empty() {
                println!("No projects found in {}", manager.store().root().display());
            }
            for project in &listing.projects {
                println!(
                    "{}\t{}",
                    project.name(),
                    project.first_folder().unwrap_or(EMPTY_PROJECT_HINT)
                );
            }
            Ok(())
        }
        ProjectsCommand::Show { name } => {
            let project = manager.store().find(&name)?;
            let payload = serde_json::to_string_pretty(project.document())
                .with_context(|| format!("failed to serialize project {name}"))?;
            println!("{payload}");
            Ok(())
        }
        ProjectsCommand::Save(args) => {
            let session = match &args.from {
                Some(path) => read_session(path)?,
                None => session_from_folders(&args.folders)?,
            };
            let effect = manager.create(&args.name, &session)?;
            report(effect);
            Ok(())
        }
        ProjectsCommand::Remove { name } => {
            let project = manager.store().find(&name)?;
            let mut scratch = SessionDocument::new();
            let effect = manager.apply(SelectionOutcome::RemoveProject(project), &mut scratch)?;
            report(effect);
            Ok(())
        }
        ProjectsCommand::Open { name, session } => {
            let project = manager.store().find(&name)?;
            update_session(&session, |live| {
                Ok(manager.apply(SelectionOutcome::OpenProject(project), live)?)
            })
        }
        ProjectsCommand::Pick(args) => execute_pick(args, manager),
        ProjectsCommand::Scope { session } => update_session(&session, |live| {
            let flow = manager.begin_scope_to(live);
            let outcome = run_selection(flow, &mut stdin_picker());
            Ok(manager.apply(outcome, live)?)
        }),
        ProjectsCommand::Parent { session } => {
            update_session(&session, |live| Ok(manager.open_parent_folder(live)))
        }
        ProjectsCommand::Close { session } => {
            update_session(&session, |live| Ok(manager.close(live)))
        }
    }
}

fn execute_pick(args: PickArgs, mut manager: ProjectManager) -> Result<()> {
    let intent = match args.action {
        PickAction::Open => SelectionIntent::Open,
        PickAction::Browse => SelectionIntent::Browse(args.filter.into()),
        PickAction::Remove => SelectionIntent::Remove,
    };
    let flow = manager.begin_selection(intent);
    let outcome = run_selection(flow, &mut stdin_picker());
    debug!(?outcome, "selection finished");

    match &args.session {
        Some(path) => update_session(path, |live| Ok(manager.apply(outcome, live)?)),
        None => {
            let mut scratch = SessionDocument::new();
            report(manager.apply(outcome, &mut scratch)?);
            Ok(())
        }
    }
}

fn execute_open_folder(args: OpenFolderArgs, config: &Config) -> Result<()> {
    let packages = args
        .packages
        .as_deref()
        .map(resolve_input_path)
        .transpose()?;
    let paths = args
        .paths
        .iter()
        .map(|path| expand_folder_path(path, packages.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    let opener = SystemOpener::default();
    let commands = paths
        .iter()
        .map(|path| opener.command_for(path))
        .collect::<Result<Vec<_>, _>>()?;
    let Some(label) = menu_label(&paths, config.folder_opener.display_for_files) else {
        bail!("only files were given and folder_opener.display_for_files is disabled");
    };

    if args.dry_run {
        println!("{label}");
        for command in &commands {
            println!("{command}");
        }
        return Ok(());
    }
    for path in &paths {
        opener.open(path)?;
    }
    Ok(())
}

fn expand_folder_path(path: &Path, packages: Option<&Path>) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    if !raw.contains(PACKAGES_PLACEHOLDER) {
        return resolve_input_path(path);
    }
    let Some(packages) = packages else {
        bail!(
            "{} uses {PACKAGES_PLACEHOLDER}; pass --packages <DIR>",
            path.display()
        );
    };
    resolve_input_path(&expand_placeholders(&raw, packages))
}

fn execute_config_command(command: ConfigCommand, store: &mut ConfigStore) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let payload = serde_json::to_string_pretty(store.config())
                .context("failed to serialize configuration")?;
            println!("{payload}");
        }
        ConfigCommand::SetMaxDirs { value } => {
            let changed = store.update(|config| config.status_bar.max_dirs = value)?;
            let verb = if changed { "now keeps" } else { "already keeps" };
            println!(
                "Status bar {verb} {} directories ({})",
                store.config().status_bar.max_dirs,
                store.path().display()
            );
        }
    }
    Ok(())
}

fn project_store(
    projects_dir: Option<PathBuf>,
    workspace_root: &Path,
    config: &Config,
) -> Result<ProjectStore> {
    let root = match projects_dir {
        Some(dir) => resolve_input_path(&dir)?,
        None => config.projects.resolve_directory(workspace_root),
    };
    let store_config = ProjectStoreConfig::new(root)
        .with_extension(config.projects.extension.as_str())
        .with_dedup_folders(config.projects.dedup_folders);
    Ok(ProjectStore::new(store_config))
}

fn stdin_picker() -> LinePicker<io::StdinLock<'static>, io::Stderr> {
    LinePicker::new(io::stdin().lock(), io::stderr())
}

fn report(effect: Effect) {
    match effect {
        Effect::None => {}
        Effect::Status(message) => println!("{message}"),
        Effect::OpenFile(path) => println!("{}", path.display()),
        Effect::RequestName { suggested } => {
            println!("Project name required (suggested: {suggested})")
        }
    }
}

fn session_from_folders(folders: &[PathBuf]) -> Result<SessionDocument> {
    let entries = folders
        .iter()
        .map(|folder| {
            let path = resolve_input_path(folder)?;
            Ok(json!({ KEY_PATH: path.display().to_string() }))
        })
        .collect::<Result<Vec<_>>>()?;
    let mut session = SessionDocument::new();
    session.insert(KEY_FOLDERS, Value::Array(entries));
    Ok(session)
}

/// 讀取工作階段檔；不存在或為空時視為空白工作階段。 / Reads a session file; missing or blank files are an empty session.
fn read_session(path: &Path) -> Result<SessionDocument> {
    if !path.exists() {
        return Ok(SessionDocument::new());
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read session {}", path.display()))?;
    if contents.trim().is_empty() {
        return Ok(SessionDocument::new());
    }
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse session {}", path.display()))?;
    SessionDocument::from_value(value)
        .map_err(|source| anyhow!("invalid session {}: {source}", path.display()))
}

fn write_session(path: &Path, session: &SessionDocument) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let payload = serde_json::to_string_pretty(&session.to_value())
        .with_context(|| format!("failed to serialize session {}", path.display()))?;
    fs::write(path, format!("{payload}\n"))
        .with_context(|| format!("failed to write session {}", path.display()))
}

/// Loads the session, lets `op` change it and writes it back when it did.
fn update_session<F>(path: &Path, op: F) -> Result<()>
where
    F: FnOnce(&mut SessionDocument) -> Result<Effect>,
{
    let mut session = read_session(path)?;
    let before = session.clone();
    let effect = op(&mut session)?;
    if session != before {
        write_session(path, &session)?;
    }
    report(effect);
    Ok(())
}

fn resolve_workspace(workspace: Option<PathBuf>) -> Result<PathBuf> {
    match workspace {
        Some(path) => resolve_input_path(&path),
        None => std::env::current_dir().context("determine current directory"),
    }
}

fn resolve_input_path(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()
            .context("determine current directory")?
            .join(path))
    }
}
