//! Immutable view over the three collections
//!
//! A [`Snapshot`] is what every read path sees. Replacing one collection
//! builds a new snapshot that shares the other two, so a render pass that
//! holds an `Arc<Snapshot>` never observes a half-applied update.

use crate::entity::{Employee, Project, Task};
use crate::enums::{Choice, EntityKind, ProjectStatus, TaskStatus};
use crate::ids::{EmployeeId, ProjectId, TaskId};
use std::sync::Arc;

/// All three collections at one point in time
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    employees: Arc<[Employee]>,
    projects: Arc<[Project]>,
    tasks: Arc<[Task]>,
    revision: u64,
}

impl Snapshot {
    /// Build from owned collections
    #[must_use]
    pub fn new(employees: Vec<Employee>, projects: Vec<Project>, tasks: Vec<Task>) -> Self {
        Self {
            employees: employees.into(),
            projects: projects.into(),
            tasks: tasks.into(),
            revision: 0,
        }
    }

    /// Replace the employee collection
    #[must_use]
    pub fn with_employees(&self, employees: Vec<Employee>) -> Self {
        Self {
            employees: employees.into(),
            revision: self.revision + 1,
            ..self.clone()
        }
    }

    /// Replace the project collection
    #[must_use]
    pub fn with_projects(&self, projects: Vec<Project>) -> Self {
        Self {
            projects: projects.into(),
            revision: self.revision + 1,
            ..self.clone()
        }
    }

    /// Replace the task collection
    #[must_use]
    pub fn with_tasks(&self, tasks: Vec<Task>) -> Self {
        Self {
            tasks: tasks.into(),
            revision: self.revision + 1,
            ..self.clone()
        }
    }

    /// Number of collection replacements applied since construction
    #[inline]
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of records in a collection
    #[must_use]
    pub fn len_of(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Employees => self.employees.len(),
            EntityKind::Projects => self.projects.len(),
            EntityKind::Tasks => self.tasks.len(),
        }
    }

    // Employees

    /// All employees
    #[inline]
    #[must_use]
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Employee by id
    #[must_use]
    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }

    /// Employee by optional id
    #[must_use]
    pub fn employee_opt(&self, id: Option<&EmployeeId>) -> Option<&Employee> {
        id.and_then(|id| self.employee(id))
    }

    /// The division head: the parentless manager, or failing that the
    /// first parentless employee
    #[must_use]
    pub fn division_head(&self) -> Option<&Employee> {
        self.employees
            .iter()
            .find(|e| e.parent_id.is_none() && e.is_manager)
            .or_else(|| self.employees.iter().find(|e| e.parent_id.is_none()))
    }

    /// Department heads: managers reporting to the division head. Without a
    /// division head every manager qualifies.
    #[must_use]
    pub fn managers(&self) -> Vec<&Employee> {
        match self.division_head() {
            Some(head) => self
                .employees
                .iter()
                .filter(|e| e.is_manager && e.parent_id.as_ref() == Some(&head.id))
                .collect(),
            None => self.all_managers(),
        }
    }

    /// Every employee flagged as a manager, division head included
    #[must_use]
    pub fn all_managers(&self) -> Vec<&Employee> {
        self.employees.iter().filter(|e| e.is_manager).collect()
    }

    /// Employees of one department
    #[must_use]
    pub fn employees_by_department(&self, department: &str) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|e| e.department == department)
            .collect()
    }

    /// Direct reports of a manager
    #[must_use]
    pub fn team_of(&self, manager: &EmployeeId) -> Vec<&Employee> {
        self.employees
            .iter()
            .filter(|e| e.parent_id.as_ref() == Some(manager))
            .collect()
    }

    // Projects

    /// All projects
    #[inline]
    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    /// Project by id
    #[must_use]
    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|p| &p.id == id)
    }

    /// Project by optional id
    #[must_use]
    pub fn project_opt(&self, id: Option<&ProjectId>) -> Option<&Project> {
        id.and_then(|id| self.project(id))
    }

    /// Projects with status `active`
    pub fn active_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.is_active())
    }

    /// Projects managed by one employee
    pub fn projects_by_manager<'a, 'b>(
        &'a self,
        manager: &'b EmployeeId,
    ) -> impl Iterator<Item = &'a Project> + 'b
    where
        'a: 'b,
    {
        self.projects
            .iter()
            .filter(move |p| p.manager_id.as_ref() == Some(manager))
    }

    /// Projects matching a status choice
    pub fn projects_by_status<'a, 'b>(
        &'a self,
        status: &'b Choice<ProjectStatus>,
    ) -> impl Iterator<Item = &'a Project> + 'b
    where
        'a: 'b,
    {
        self.projects.iter().filter(move |p| status.admits(&p.status))
    }

    // Tasks

    /// All tasks
    #[inline]
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Task by id
    #[must_use]
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Tasks matching a project choice
    pub fn tasks_by_project<'a, 'b>(
        &'a self,
        project: &'b Choice<ProjectId>,
    ) -> impl Iterator<Item = &'a Task> + 'b
    where
        'a: 'b,
    {
        self.tasks
            .iter()
            .filter(move |t| project.admits_opt(t.project_id.as_ref()))
    }

    /// Tasks matching an assignee choice
    pub fn tasks_by_assignee<'a, 'b>(
        &'a self,
        assignee: &'b Choice<EmployeeId>,
    ) -> impl Iterator<Item = &'a Task> + 'b
    where
        'a: 'b,
    {
        self.tasks
            .iter()
            .filter(move |t| assignee.admits_opt(t.assignee_id.as_ref()))
    }

    /// Tasks matching a status choice
    pub fn tasks_by_status<'a, 'b>(
        &'a self,
        status: &'b Choice<TaskStatus>,
    ) -> impl Iterator<Item = &'a Task> + 'b
    where
        'a: 'b,
    {
        self.tasks.iter().filter(move |t| status.admits(&t.status))
    }

    /// Tasks with status `in-progress`
    pub fn in_progress_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks
            .iter()
            .filter(|t| t.status == TaskStatus::InProgress)
    }

    /// Manager of the project a task belongs to
    #[must_use]
    pub fn manager_of_task(&self, task: &Task) -> Option<&Employee> {
        let project = self.project_opt(task.project_id.as_ref())?;
        self.employee_opt(project.manager_id.as_ref())
    }
}
