//! Mutating operations
//!
//! Every mutator delegates to the document store and returns once the
//! write is acknowledged. The mirror is never touched here: it changes only
//! when the resulting snapshot is pushed back, so a failed write leaves
//! local state exactly as it was.

use crate::backend::DocumentStore;
use crate::error::{CascadeOp, StoreError};
use crate::mirror::EntityStore;
use futures::future::join_all;
use tracker_model::{
    Document, EmployeeDraft, EmployeeId, EntityKind, FieldValue, ProjectDraft, ProjectId, Record,
    TaskDraft, TaskId,
};

fn stamp_created(mut record: Record) -> Record {
    record.insert(
        "createdAt".into(),
        FieldValue::Text(chrono::Utc::now().to_rfc3339()),
    );
    record
}

fn null_field(field: &str) -> Record {
    let mut patch = Record::new();
    patch.insert(field.to_string(), FieldValue::Null);
    patch
}

/// Progress through a non-transactional sequence
struct Cascade {
    operation: CascadeOp,
    completed: usize,
}

impl Cascade {
    fn new(operation: CascadeOp) -> Self {
        Self {
            operation,
            completed: 0,
        }
    }

    /// Record a batch of concurrent writes; stop at the first failure
    fn settle(&mut self, results: Vec<Result<(), StoreError>>) -> Result<(), StoreError> {
        let mut first_error = None;
        for result in results {
            match result {
                Ok(()) => self.completed += 1,
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            None => Ok(()),
            Some(e) => Err(self.fail(e)),
        }
    }

    fn fail(&self, source: StoreError) -> StoreError {
        if self.completed > 0 {
            tracing::warn!(
                operation = %self.operation,
                completed = self.completed,
                "cascade interrupted, store left partially updated: {source}"
            );
        }
        StoreError::cascade(self.operation, self.completed, source)
    }
}

impl<S: DocumentStore> EntityStore<S> {
    /// Department of a manager as currently mirrored; empty without one
    fn department_of(&self, manager: Option<&EmployeeId>) -> String {
        let Some(manager) = manager else {
            return String::new();
        };
        match self.snapshot().employee(manager) {
            Some(employee) => employee.department.clone(),
            None => {
                tracing::warn!(%manager, "manager not in mirror, department left empty");
                String::new()
            }
        }
    }

    async fn create_logged(&self, kind: EntityKind, record: Record) -> Result<String, StoreError> {
        match self.backend().create(kind, stamp_created(record)).await {
            Ok(id) => {
                tracing::info!(%kind, %id, "created");
                Ok(id)
            }
            Err(e) => {
                tracing::error!(%kind, "create failed: {e}");
                Err(e)
            }
        }
    }

    async fn update_logged(&self, kind: EntityKind, id: &str, patch: Record) -> Result<(), StoreError> {
        self.backend()
            .update(kind, id, patch)
            .await
            .map(|()| tracing::info!(%kind, id, "updated"))
            .map_err(|e| {
                tracing::error!(%kind, id, "update failed: {e}");
                e
            })
    }

    async fn delete_logged(&self, kind: EntityKind, id: &str) -> Result<(), StoreError> {
        self.backend()
            .delete(kind, id)
            .await
            .map(|()| tracing::info!(%kind, id, "deleted"))
            .map_err(|e| {
                tracing::error!(%kind, id, "delete failed: {e}");
                e
            })
    }

    /// Merge arbitrary fields into one document
    ///
    /// # Errors
    /// Any write failure from the store
    pub async fn patch(&self, kind: EntityKind, id: &str, patch: Record) -> Result<(), StoreError> {
        self.update_logged(kind, id, patch).await
    }

    // Employees

    /// Create an employee
    ///
    /// # Errors
    /// `StoreError::Invalid` for a blank name, or the store's write error
    pub async fn add_employee(&self, draft: &EmployeeDraft) -> Result<EmployeeId, StoreError> {
        draft.validate()?;
        self.create_logged(EntityKind::Employees, draft.to_record())
            .await
            .map(EmployeeId::new)
    }

    /// Overwrite an employee's editable fields
    ///
    /// # Errors
    /// `StoreError::Invalid` for a blank name, or the store's write error
    pub async fn update_employee(
        &self,
        id: &EmployeeId,
        draft: &EmployeeDraft,
    ) -> Result<(), StoreError> {
        draft.validate()?;
        self.update_logged(EntityKind::Employees, id.as_str(), draft.to_record())
            .await
    }

    /// Delete an employee, orphaning everything that referenced them
    ///
    /// In order: clear `parentId` on direct reports, `managerId` on managed
    /// projects, `assigneeId` on assigned tasks, then delete the employee.
    /// Writes within a step run concurrently; steps run in sequence.
    ///
    /// # Errors
    /// `StoreError::PartialCascade` if a step fails after earlier writes
    /// landed; those writes are not undone
    pub async fn delete_employee(&self, id: &EmployeeId) -> Result<(), StoreError> {
        let mut cascade = Cascade::new(CascadeOp::DeleteEmployee);
        let steps = [
            (EntityKind::Employees, "parentId"),
            (EntityKind::Projects, "managerId"),
            (EntityKind::Tasks, "assigneeId"),
        ];

        for (kind, field) in steps {
            let dependents = self
                .backend()
                .find_by_field(kind, field, id.as_str())
                .await
                .map_err(|e| cascade.fail(e))?;
            tracing::debug!(%kind, field, count = dependents.len(), "clearing references");

            let writes = dependents
                .iter()
                .map(|doc| self.update_logged(kind, &doc.id, null_field(field)));
            cascade.settle(join_all(writes).await)?;
        }

        self.delete_logged(EntityKind::Employees, id.as_str())
            .await
            .map_err(|e| cascade.fail(e))
    }

    // Projects

    /// Create a project; its department is copied from the manager
    ///
    /// # Errors
    /// `StoreError::Invalid` for a blank name, or the store's write error
    pub async fn add_project(&self, draft: &ProjectDraft) -> Result<ProjectId, StoreError> {
        draft.validate()?;
        let department = self.department_of(draft.manager_id.as_ref());
        self.create_logged(EntityKind::Projects, draft.to_record(&department))
            .await
            .map(ProjectId::new)
    }

    /// Overwrite a project's editable fields, re-deriving the department
    ///
    /// # Errors
    /// `StoreError::Invalid` for a blank name, or the store's write error
    pub async fn update_project(
        &self,
        id: &ProjectId,
        draft: &ProjectDraft,
    ) -> Result<(), StoreError> {
        draft.validate()?;
        let department = self.department_of(draft.manager_id.as_ref());
        self.update_logged(EntityKind::Projects, id.as_str(), draft.to_record(&department))
            .await
    }

    /// Delete a project and every task linked to it
    ///
    /// Reads the dependent tasks from the store, deletes them, then deletes
    /// the project.
    ///
    /// # Errors
    /// `StoreError::PartialCascade` if the sequence stops after some deletes
    /// landed; those are not undone
    pub async fn delete_project(&self, id: &ProjectId) -> Result<(), StoreError> {
        let mut cascade = Cascade::new(CascadeOp::DeleteProject);

        let tasks: Vec<Document> = self
            .backend()
            .find_by_field(EntityKind::Tasks, "projectId", id.as_str())
            .await?;
        tracing::info!(project = %id, tasks = tasks.len(), "deleting project with its tasks");

        let deletes = tasks
            .iter()
            .map(|doc| self.delete_logged(EntityKind::Tasks, &doc.id));
        cascade.settle(join_all(deletes).await)?;

        self.delete_logged(EntityKind::Projects, id.as_str())
            .await
            .map_err(|e| cascade.fail(e))
    }

    // Tasks

    /// Create a task
    ///
    /// # Errors
    /// `StoreError::Invalid` for a blank name or missing project, or the
    /// store's write error
    pub async fn add_task(&self, draft: &TaskDraft) -> Result<TaskId, StoreError> {
        draft.validate()?;
        self.create_logged(EntityKind::Tasks, draft.to_record())
            .await
            .map(TaskId::new)
    }

    /// Overwrite a task's editable fields
    ///
    /// # Errors
    /// `StoreError::Invalid` for a blank name or missing project, or the
    /// store's write error
    pub async fn update_task(&self, id: &TaskId, draft: &TaskDraft) -> Result<(), StoreError> {
        draft.validate()?;
        self.update_logged(EntityKind::Tasks, id.as_str(), draft.to_record())
            .await
    }

    /// Delete one task
    ///
    /// # Errors
    /// The store's write error
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), StoreError> {
        self.delete_logged(EntityKind::Tasks, id.as_str()).await
    }
}
