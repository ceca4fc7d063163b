use crate::error::{AppError, Result};
use crate::models::task::{NewTask, TaskPatch};

/// Required-field check for task creation
pub fn validate_new_task(task: &NewTask) -> Result<()> {
    if task.title.trim().is_empty() {
        return Err(AppError::InvalidRequest(
            "Task title is required".to_string(),
        ));
    }
    Ok(())
}

/// A patch may omit the title, but cannot blank it
pub fn validate_task_patch(patch: &TaskPatch) -> Result<()> {
    if let Some(title) = &patch.title
        && title.trim().is_empty()
    {
        return Err(AppError::InvalidRequest(
            "Task title cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Required-field check for assist inputs
pub fn validate_text_input(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidRequest(format!(
            "Field '{}' must not be empty",
            field
        )));
    }
    Ok(())
}
