//! Property tests for the filter and sort engines

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use tracker_model::{
    Choice, EmployeeId, Priority, ProjectId, Snapshot, Task, TaskStatus,
};
use tracker_query::{sort_tasks, FilterChange, SortColumn, SortDirection, SortState, TaskFilter};
use tracker_test_utils::{employee, project, task_with, today};

fn organisation() -> Vec<tracker_model::Employee> {
    vec![
        employee("e0", "ראש", true, None),
        employee("e1", "דוד", true, Some("e0")),
        employee("e2", "מיכל", true, Some("e0")),
        employee("e3", "יוסי", false, Some("e1")),
        employee("e4", "Noa", false, Some("e2")),
    ]
}

fn projects() -> Vec<tracker_model::Project> {
    vec![
        project("p0", "הזמנות", Some("e1")),
        project("p1", "פורטל", Some("e1")),
        project("p2", "מחסן", Some("e2")),
        project("p3", "יתום", None),
    ]
}

fn status_strategy() -> impl Strategy<Value = TaskStatus> {
    prop_oneof![
        Just(TaskStatus::Pending),
        Just(TaskStatus::InProgress),
        Just(TaskStatus::Completed),
        Just(TaskStatus::from("blocked")),
    ]
}

fn priority_strategy() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::High),
        Just(Priority::Medium),
        Just(Priority::Low),
        Just(Priority::from("urgent")),
    ]
}

fn due_strategy() -> impl Strategy<Value = Option<NaiveDate>> {
    prop::option::of((-20i64..40).prop_map(|offset| today() + Duration::days(offset)))
}

prop_compose! {
    fn task_strategy()(
        project in prop::option::of(0usize..5),
        assignee in prop::option::of(0usize..6),
        status in status_strategy(),
        priority in priority_strategy(),
        due in due_strategy(),
    ) -> (Option<String>, Option<String>, TaskStatus, Priority, Option<NaiveDate>) {
        (
            project.map(|p| format!("p{p}")),
            assignee.map(|e| format!("e{e}")),
            status,
            priority,
            due,
        )
    }
}

fn snapshot_strategy() -> impl Strategy<Value = Snapshot> {
    prop::collection::vec(task_strategy(), 0..24).prop_map(|specs| {
        let tasks = specs
            .into_iter()
            .enumerate()
            .map(|(i, (project, assignee, status, priority, due))| {
                let mut task = task_with(
                    &format!("t{i:02}"),
                    project.as_deref(),
                    assignee.as_deref(),
                    status,
                    priority,
                    None,
                );
                task.due_date = due;
                task
            })
            .collect();
        Snapshot::new(organisation(), projects(), tasks)
    })
}

fn employee_choice() -> impl Strategy<Value = Choice<EmployeeId>> {
    prop_oneof![
        Just(Choice::All),
        (0usize..6).prop_map(|i| Choice::Only(EmployeeId::new(format!("e{i}")))),
    ]
}

fn filter_strategy() -> impl Strategy<Value = TaskFilter> {
    (
        employee_choice(),
        prop_oneof![
            Just(Choice::All),
            (0usize..5).prop_map(|i| Choice::Only(ProjectId::new(format!("p{i}")))),
        ],
        prop_oneof![Just(Choice::All), status_strategy().prop_map(Choice::Only)],
        employee_choice(),
        prop::option::of(-5i64..30),
    )
        .prop_map(|(manager, project, status, assignee, max_days)| TaskFilter {
            manager,
            project,
            status,
            assignee,
            max_days,
        })
}

/// Each predicate evaluated on its own, straight from the definitions
fn passes_independently(filter: &TaskFilter, task: &Task, snapshot: &Snapshot) -> bool {
    let manager_ok = match &filter.manager {
        Choice::All => true,
        Choice::Only(m) => snapshot
            .project_opt(task.project_id.as_ref())
            .is_some_and(|p| p.manager_id.as_ref() == Some(m)),
    };
    let project_ok = match &filter.project {
        Choice::All => true,
        Choice::Only(p) => task.project_id.as_ref() == Some(p),
    };
    let status_ok = match &filter.status {
        Choice::All => true,
        Choice::Only(s) => &task.status == s,
    };
    let assignee_ok = match &filter.assignee {
        Choice::All => true,
        Choice::Only(a) => task.assignee_id.as_ref() == Some(a),
    };
    let days_ok = match filter.max_days {
        None => true,
        Some(n) => task
            .due_date
            .is_some_and(|due| (due - today()).num_days() <= n),
    };
    manager_ok && project_ok && status_ok && assignee_ok && days_ok
}

fn ids(tasks: &[&Task]) -> Vec<String> {
    tasks.iter().map(|t| t.id.to_string()).collect()
}

proptest! {
    #[test]
    fn prop_filter_is_conjunction(snapshot in snapshot_strategy(), filter in filter_strategy()) {
        let filtered = filter.apply(&snapshot, today());
        let expected: Vec<&Task> = snapshot
            .tasks()
            .iter()
            .filter(|t| passes_independently(&filter, t, &snapshot))
            .collect();

        prop_assert_eq!(ids(&filtered), ids(&expected));
        for task in &filtered {
            prop_assert!(filter.admits(task, &snapshot, today()));
        }
    }

    #[test]
    fn prop_assignee_options_have_tasks(snapshot in snapshot_strategy(), filter in filter_strategy()) {
        let options = filter.options(&snapshot);
        if snapshot.tasks().is_empty() {
            prop_assert_eq!(options.assignees.len(), snapshot.employees().len());
        } else {
            let upstream = TaskFilter {
                assignee: Choice::All,
                max_days: None,
                ..filter.clone()
            };
            let candidates = upstream.apply(&snapshot, today());
            for option in &options.assignees {
                prop_assert!(candidates
                    .iter()
                    .any(|t| t.assignee_id.as_ref().map(EmployeeId::as_str) == Some(option.id.as_str())));
            }
        }
    }

    #[test]
    fn prop_project_options_follow_manager(snapshot in snapshot_strategy(), filter in filter_strategy()) {
        let options = filter.options(&snapshot);
        if let Choice::Only(manager) = &filter.manager {
            for option in &options.projects {
                let project = snapshot.project(&ProjectId::new(option.id.clone())).unwrap();
                prop_assert_eq!(project.manager_id.as_ref(), Some(manager));
            }
        } else {
            prop_assert_eq!(options.projects.len(), snapshot.projects().len());
        }
    }

    #[test]
    fn prop_manager_change_resets_downstream(filter in filter_strategy(), manager in employee_choice()) {
        let next = filter.apply_change(FilterChange::Manager(manager.clone()));

        prop_assert_eq!(&next.manager, &manager);
        prop_assert_eq!(next.project, Choice::All);
        prop_assert_eq!(next.assignee, Choice::All);
        prop_assert_eq!(next.status, filter.status);
        prop_assert_eq!(next.max_days, filter.max_days);
    }

    #[test]
    fn prop_normalize_is_stable_and_offered(snapshot in snapshot_strategy(), filter in filter_strategy()) {
        let normalized = filter.normalize(&snapshot);
        prop_assert_eq!(normalized.normalize(&snapshot), normalized.clone());

        let options = normalized.options(&snapshot);
        if let Choice::Only(id) = &normalized.project {
            prop_assert!(options.projects.iter().any(|o| o.id == id.as_str()));
        }
        if let Choice::Only(id) = &normalized.assignee {
            prop_assert!(options.assignees.iter().any(|o| o.id == id.as_str()));
        }
    }

    #[test]
    fn prop_sort_is_idempotent(snapshot in snapshot_strategy()) {
        let input: Vec<&Task> = snapshot.tasks().iter().collect();
        for column in [SortColumn::Priority, SortColumn::Status, SortColumn::DueDate, SortColumn::DaysRemaining] {
            let state = SortState::new(column);
            let once = sort_tasks(&input, state, &snapshot, today());
            let twice = sort_tasks(&once, state, &snapshot, today());
            prop_assert_eq!(ids(&once), ids(&twice));
        }
    }

    #[test]
    fn prop_desc_is_reverse_of_asc(snapshot in snapshot_strategy()) {
        let input: Vec<&Task> = snapshot.tasks().iter().collect();
        for column in SortColumn::ALL {
            let asc = sort_tasks(&input, SortState::new(column), &snapshot, today());
            let mut desc = sort_tasks(
                &input,
                SortState::new(column).with_direction(SortDirection::Desc),
                &snapshot,
                today(),
            );
            desc.reverse();
            prop_assert_eq!(ids(&asc), ids(&desc));
        }
    }

    #[test]
    fn prop_sort_keeps_every_task(snapshot in snapshot_strategy()) {
        let input: Vec<&Task> = snapshot.tasks().iter().collect();
        let mut sorted = ids(&sort_tasks(&input, SortState::new(SortColumn::Name), &snapshot, today()));
        let mut original = ids(&input);
        sorted.sort();
        original.sort();
        prop_assert_eq!(sorted, original);
    }
}

#[test]
fn manager_with_two_projects_offers_exactly_those() {
    let snapshot = Snapshot::new(organisation(), projects(), Vec::new());
    let filter = TaskFilter::new()
        .apply_change(FilterChange::Manager(Choice::Only(EmployeeId::from("e1"))));

    let offered: Vec<String> = filter
        .options(&snapshot)
        .projects
        .into_iter()
        .map(|o| o.id)
        .collect();
    assert_eq!(offered, vec!["p0".to_string(), "p1".to_string()]);
}
