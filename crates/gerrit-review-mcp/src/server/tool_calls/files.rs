use super::*;

pub(super) fn handle_get_file_list(
    client: &GerritClient,
    arguments: &Value,
) -> Result<Value, GerritError> {
    let change_id = change_id_arg(arguments)?;
    info!(change_id = %change_id, "listing files");
    client.get_file_list(&change_id)
}

pub(super) fn handle_get_file_diff(
    client: &GerritClient,
    arguments: &Value,
) -> Result<Value, GerritError> {
    let change_id = change_id_arg(arguments)?;
    let file_path = required_str(arguments, "file_path")?;
    info!(change_id = %change_id, file_path, "fetching file diff");
    let diff = client.get_file_diff(&change_id, file_path)?;
    debug!(
        file_path,
        binary = diff.is_binary,
        lines = diff.line_changes.len(),
        "diff reconstructed"
    );
    to_payload(&diff)
}
