//! Testing utilities for the division tracker workspace
//!
//! Shared fixtures: a small seeded organisation (as raw documents and as a
//! typed snapshot) and terse constructors for ad hoc entities.

#![allow(missing_docs)]

use chrono::NaiveDate;
use serde_json::{json, Value};
use tracker_model::{
    Document, Employee, EmployeeId, Priority, Project, ProjectId, ProjectStatus, Record, Snapshot,
    Task, TaskId, TaskStatus,
};

/// Reference "today" for every dated fixture
pub fn today() -> NaiveDate {
    date("2024-06-01")
}

/// Parse a `YYYY-MM-DD` fixture date
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
}

fn document(value: Value) -> Document {
    let Value::Object(mut fields) = value else {
        panic!("fixture document must be an object");
    };
    let id = fields
        .remove("id")
        .and_then(|id| id.as_str().map(str::to_string))
        .unwrap();
    let record: Record = serde_json::from_value(Value::Object(fields)).unwrap();
    Document::new(id, record)
}

/// Seeded organisation as stored documents: (employees, projects, tasks)
///
/// - `e0` division head; `e1`, `e2` department heads; `e3`..`e5` workers
/// - `p1` (3 tasks) and `p2` managed by `e1`, `p3` by `e2`
/// - `t1`..`t6` dated relative to [`today`]
pub fn seed_documents() -> (Vec<Document>, Vec<Document>, Vec<Document>) {
    let employees = vec![
        json!({"id": "e0", "name": "רונית כהן", "role": "ראש אגף", "department": "הנהלה", "isManager": true, "parentId": null}),
        json!({"id": "e1", "name": "דוד לוי", "role": "מנהל פיתוח", "department": "פיתוח", "isManager": true, "parentId": "e0"}),
        json!({"id": "e2", "name": "מיכל אברהם", "role": "מנהלת תפעול", "department": "תפעול", "isManager": true, "parentId": "e0"}),
        json!({"id": "e3", "name": "יוסי מזרחי", "role": "מפתח", "department": "פיתוח", "isManager": false, "parentId": "e1"}),
        json!({"id": "e4", "name": "נועה פרץ", "role": "מפתחת", "department": "פיתוח", "isManager": false, "parentId": "e1"}),
        json!({"id": "e5", "name": "אבי שמעון", "role": "רכז", "department": "תפעול", "isManager": false, "parentId": "e2"}),
    ];
    let projects = vec![
        json!({"id": "p1", "name": "מערכת הזמנות", "description": "הזמנות אונליין", "managerId": "e1", "department": "פיתוח", "status": "active", "startDate": "2024-04-01", "endDate": "2024-07-15"}),
        json!({"id": "p2", "name": "פורטל לקוחות", "description": "", "managerId": "e1", "department": "פיתוח", "status": "paused", "startDate": "2024-03-01", "endDate": "2024-06-05"}),
        json!({"id": "p3", "name": "שדרוג מחסן", "managerId": "e2", "department": "תפעול", "status": "active", "startDate": "2024-05-01", "endDate": "2024-06-20"}),
    ];
    let tasks = vec![
        json!({"id": "t1", "name": "אפיון", "projectId": "p1", "assigneeId": "e3", "dueDate": "2024-05-30", "priority": "high", "status": "in-progress"}),
        json!({"id": "t2", "name": "פיתוח API", "projectId": "p1", "assigneeId": "e4", "dueDate": "2024-06-01", "priority": "medium", "status": "pending"}),
        json!({"id": "t3", "name": "בדיקות", "projectId": "p1", "assigneeId": "e3", "dueDate": "2024-06-06", "priority": "low", "status": "pending"}),
        json!({"id": "t4", "name": "עיצוב", "projectId": "p2", "assigneeId": null, "dueDate": "2024-06-20", "priority": "medium", "status": "pending"}),
        json!({"id": "t5", "name": "ספירת מלאי", "projectId": "p3", "assigneeId": "e5", "dueDate": "2024-05-20", "priority": "high", "status": "completed"}),
        json!({"id": "t6", "name": "הדרכה", "projectId": "p3", "assigneeId": "e5", "priority": "low", "status": "in-progress"}),
    ];

    (
        employees.into_iter().map(document).collect(),
        projects.into_iter().map(document).collect(),
        tasks.into_iter().map(document).collect(),
    )
}

/// The seeded organisation as a typed snapshot
pub fn seed_snapshot() -> Snapshot {
    let (employees, projects, tasks) = seed_documents();
    Snapshot::new(
        employees.iter().map(Employee::from_document).collect(),
        projects.iter().map(Project::from_document).collect(),
        tasks.iter().map(Task::from_document).collect(),
    )
}

/// Employee with empty role and department
pub fn employee(id: &str, name: &str, is_manager: bool, parent: Option<&str>) -> Employee {
    Employee {
        id: EmployeeId::from(id),
        name: name.to_string(),
        role: String::new(),
        department: String::new(),
        is_manager,
        parent_id: parent.map(EmployeeId::from),
        created_at: None,
    }
}

/// Active project with no dates or description
pub fn project(id: &str, name: &str, manager: Option<&str>) -> Project {
    Project {
        id: ProjectId::from(id),
        name: name.to_string(),
        description: None,
        manager_id: manager.map(EmployeeId::from),
        department: String::new(),
        status: ProjectStatus::Active,
        start_date: None,
        end_date: None,
        created_at: None,
    }
}

/// Task with default priority and status
pub fn task(id: &str, name: &str, project: Option<&str>) -> Task {
    Task {
        id: TaskId::from(id),
        name: name.to_string(),
        description: None,
        project_id: project.map(ProjectId::from),
        assignee_id: None,
        start_date: None,
        due_date: None,
        priority: Priority::Medium,
        status: TaskStatus::Pending,
        created_at: None,
    }
}

/// Task with every filterable field set
pub fn task_with(
    id: &str,
    project: Option<&str>,
    assignee: Option<&str>,
    status: TaskStatus,
    priority: Priority,
    due: Option<&str>,
) -> Task {
    Task {
        assignee_id: assignee.map(EmployeeId::from),
        status,
        priority,
        due_date: due.map(date),
        ..task(id, id, project)
    }
}
