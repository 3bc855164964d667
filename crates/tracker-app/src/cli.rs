//! Command-line interface
//!
//! `tracker [--config PATH] [--seed PATH] [--json] [--watch] <page> [filters]`
//!
//! Each subcommand renders one page. Filter flags are fed through the same
//! reducers a front end would use, in dependency order, so a project that
//! does not belong to the chosen manager is dropped rather than combined.

use crate::config::{AppConfig, ConfigSource};
use crate::error::AppError;
use crate::render::Format;
use crate::session::{Page, Session};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::sync::Arc;
use tracker_model::Choice;
use tracker_query::{
    FilterChange, ProjectFilterChange, SortColumn, SortDirection, SortState, TaskFilterField,
};
use tracker_store::{DocumentStore, MemoryDocumentStore, Seed};

/// Build the argument parser
#[must_use]
pub fn command() -> Command {
    Command::new("tracker")
        .version(crate::VERSION)
        .about("Division tracker: employees, projects and tasks")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (TOML)"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Seed JSON for the in-process store"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Output as JSON"),
        )
        .arg(
            Arg::new("watch")
                .long("watch")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Re-render after every settled burst of changes until Ctrl-C"),
        )
        .subcommand(Command::new("dashboard").about("Headline numbers, upcoming tasks, active projects"))
        .subcommand(
            Command::new("projects")
                .about("Project cards grouped by manager")
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Project status (active, paused, completed, all)"),
                )
                .arg(
                    Arg::new("manager")
                        .long("manager")
                        .help("Manager employee id, or all"),
                ),
        )
        .subcommand(
            Command::new("tasks")
                .about("Filterable, sortable task table")
                .arg(Arg::new("manager").long("manager").help("Manager employee id, or all"))
                .arg(Arg::new("project").long("project").help("Project id, or all"))
                .arg(
                    Arg::new("status")
                        .long("status")
                        .help("Task status (pending, in-progress, completed, all)"),
                )
                .arg(Arg::new("assignee").long("assignee").help("Assignee employee id, or all"))
                .arg(
                    Arg::new("max-days")
                        .long("max-days")
                        .allow_hyphen_values(true)
                        .help("Only tasks due within this many days, overdue included"),
                )
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .help("Sort column (name, project, manager, assignee, priority, dueDate, daysRemaining, status)"),
                )
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .action(ArgAction::SetTrue)
                        .requires("sort")
                        .help("Sort descending"),
                ),
        )
        .subcommand(Command::new("org").about("Organisation chart"))
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Configuration file
    pub config: Option<PathBuf>,
    /// Seed file, overriding the configured one
    pub seed: Option<PathBuf>,
    /// Output format
    pub format: Format,
    /// Keep running and re-render on change
    pub watch: bool,
    /// Page to render
    pub page: Page,
    /// Task filter edits, in dependency order
    pub task_changes: Vec<FilterChange>,
    /// Project filter edits
    pub project_changes: Vec<ProjectFilterChange>,
    /// Task sort
    pub sort: Option<SortState>,
}

impl Invocation {
    /// Interpret parsed arguments
    ///
    /// # Errors
    /// `AppError::Query` for a bad sort column or days window
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, AppError> {
        let mut invocation = Self {
            config: matches.get_one::<PathBuf>("config").cloned(),
            seed: matches.get_one::<PathBuf>("seed").cloned(),
            format: if matches.get_flag("json") {
                Format::Json
            } else {
                Format::Text
            },
            watch: matches.get_flag("watch"),
            page: Page::Dashboard,
            task_changes: Vec::new(),
            project_changes: Vec::new(),
            sort: None,
        };

        match matches.subcommand() {
            Some(("projects", args)) => {
                invocation.page = Page::Projects;
                if let Some(status) = args.get_one::<String>("status") {
                    invocation
                        .project_changes
                        .push(ProjectFilterChange::Status(Choice::parse(status)));
                }
                if let Some(manager) = args.get_one::<String>("manager") {
                    invocation
                        .project_changes
                        .push(ProjectFilterChange::Manager(Choice::parse(manager)));
                }
            }
            Some(("tasks", args)) => {
                invocation.page = Page::Tasks;
                for field in TaskFilterField::ALL {
                    if let Some(value) = args.get_one::<String>(flag_name(field)) {
                        invocation.task_changes.push(FilterChange::parse(field, value)?);
                    }
                }
                if let Some(column) = args.get_one::<String>("sort") {
                    let direction = if args.get_flag("desc") {
                        SortDirection::Desc
                    } else {
                        SortDirection::Asc
                    };
                    invocation.sort =
                        Some(SortState::new(column.parse::<SortColumn>()?).with_direction(direction));
                }
            }
            Some(("org", _)) => invocation.page = Page::Org,
            _ => invocation.page = Page::Dashboard,
        }
        Ok(invocation)
    }

    /// Load configuration, honouring `--seed`
    ///
    /// # Errors
    /// Any configuration read or parse failure
    pub fn load_config(&self) -> Result<(AppConfig, ConfigSource), AppError> {
        let (mut config, source) = AppConfig::load(self.config.as_deref())?;
        if let Some(seed) = &self.seed {
            config = config.with_seed(seed.clone());
        }
        Ok((config, source))
    }

    /// Apply page, filters and sort to a session
    pub fn apply<S: DocumentStore>(&self, session: &mut Session<S>) {
        session.show(self.page);
        for change in &self.task_changes {
            session.change_task_filter(change.clone());
        }
        for change in &self.project_changes {
            session.change_project_filter(change.clone());
        }
        session.set_sort(self.sort);
    }
}

fn flag_name(field: TaskFilterField) -> &'static str {
    match field {
        TaskFilterField::Manager => "manager",
        TaskFilterField::Project => "project",
        TaskFilterField::Status => "status",
        TaskFilterField::Assignee => "assignee",
        TaskFilterField::MaxDays => "max-days",
    }
}

/// In-process store seeded from the configured file, or empty
///
/// # Errors
/// `AppError::Store` when the seed file cannot be read or parsed
pub async fn open_store(config: &AppConfig) -> Result<Arc<MemoryDocumentStore>, AppError> {
    let store = match &config.store.seed_path {
        Some(path) => {
            let seed = Seed::load(path).await?;
            tracing::info!(
                path = %path.display(),
                employees = seed.employees.len(),
                projects = seed.projects.len(),
                tasks = seed.tasks.len(),
                "seeded store"
            );
            MemoryDocumentStore::seeded(&seed)
        }
        None => {
            tracing::warn!("no seed file configured, starting empty");
            MemoryDocumentStore::new()
        }
    };
    Ok(Arc::new(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tracker_model::{EmployeeId, ProjectId};

    fn parse(args: &[&str]) -> Result<Invocation, AppError> {
        let matches = command()
            .try_get_matches_from(std::iter::once("tracker").chain(args.iter().copied()))
            .unwrap();
        Invocation::from_matches(&matches)
    }

    #[test]
    fn command_is_well_formed() {
        command().debug_assert();
    }

    #[test]
    fn task_flags_in_dependency_order() {
        let invocation = parse(&[
            "tasks",
            "--assignee",
            "e3",
            "--manager",
            "e1",
            "--max-days",
            "-2",
            "--sort",
            "dueDate",
            "--desc",
        ])
        .unwrap();

        assert_eq!(invocation.page, Page::Tasks);
        assert_eq!(
            invocation.task_changes,
            vec![
                FilterChange::Manager(Choice::Only(EmployeeId::from("e1"))),
                FilterChange::Assignee(Choice::Only(EmployeeId::from("e3"))),
                FilterChange::MaxDays(Some(-2)),
            ]
        );
        assert_eq!(
            invocation.sort,
            Some(SortState::new(SortColumn::DueDate).with_direction(SortDirection::Desc))
        );
    }

    #[test]
    fn global_flags_after_subcommand() {
        let invocation = parse(&["org", "--json", "--seed", "seed.json"]).unwrap();
        assert_eq!(invocation.page, Page::Org);
        assert_eq!(invocation.format, Format::Json);
        assert_eq!(invocation.seed, Some(PathBuf::from("seed.json")));
        assert!(!invocation.watch);
    }

    #[test]
    fn project_flags() {
        let invocation = parse(&["projects", "--status", "all", "--manager", "e2"]).unwrap();
        assert_eq!(
            invocation.project_changes,
            vec![
                ProjectFilterChange::Status(Choice::All),
                ProjectFilterChange::Manager(Choice::Only(EmployeeId::from("e2"))),
            ]
        );
    }

    #[test]
    fn bad_values_are_query_errors() {
        assert!(matches!(
            parse(&["tasks", "--sort", "size"]),
            Err(AppError::Query(_))
        ));
        assert!(matches!(
            parse(&["tasks", "--max-days", "soon"]),
            Err(AppError::Query(_))
        ));
    }

    #[test]
    fn desc_requires_sort() {
        assert!(command()
            .try_get_matches_from(["tracker", "tasks", "--desc"])
            .is_err());
    }

    #[test]
    fn seed_flag_overrides_config() {
        let invocation = parse(&["dashboard", "--seed", "other.json"]).unwrap();
        let (config, source) = invocation.load_config().unwrap();
        assert_eq!(config.store.seed_path, Some(PathBuf::from("other.json")));
        assert_eq!(source, ConfigSource::Defaults);
    }

    #[tokio::test]
    async fn invocation_drives_session() {
        let (employees, projects, tasks) = tracker_test_utils::seed_documents();
        let backend = Arc::new(MemoryDocumentStore::seeded(&Seed {
            employees,
            projects,
            tasks,
        }));
        let mut session = Session::connect(backend, &AppConfig::new())
            .await
            .with_today(tracker_test_utils::today());

        // p3 belongs to e2, so it is not offered under manager e1
        parse(&["tasks", "--project", "p3", "--manager", "e1"])
            .unwrap()
            .apply(&mut session);

        assert_eq!(session.page(), Page::Tasks);
        assert_eq!(session.task_filter().project, Choice::<ProjectId>::All);
        assert_eq!(session.task_list().rows.len(), 4);
    }
}
