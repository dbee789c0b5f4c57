use super::*;

pub(super) fn handle_create_draft_comment(
    client: &GerritClient,
    arguments: &Value,
) -> Result<Value, GerritError> {
    let change_id = change_id_arg(arguments)?;
    let file_path = required_str(arguments, "file_path")?;
    let message = required_str(arguments, "message")?;
    let line = required_i64(arguments, "line")?;
    info!(change_id = %change_id, file_path, line, "creating draft comment");
    client.create_draft_comment(&change_id, file_path, message, line)
}

pub(super) fn handle_set_review(
    client: &GerritClient,
    arguments: &Value,
) -> Result<Value, GerritError> {
    let change_id = change_id_arg(arguments)?;
    let label = required_i64(arguments, "code_review_label")?;
    let message = optional_str(arguments, "message");
    client.set_review(&change_id, label, message)
}
