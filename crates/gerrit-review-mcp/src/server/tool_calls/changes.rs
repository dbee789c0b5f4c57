use super::*;

pub(super) fn handle_get_commit_info(
    client: &GerritClient,
    arguments: &Value,
) -> Result<Value, GerritError> {
    let change_id = change_id_arg(arguments)?;
    info!(change_id = %change_id, "fetching commit info");
    client.get_commit_info(&change_id)
}

pub(super) fn handle_get_change_detail(
    client: &GerritClient,
    arguments: &Value,
) -> Result<Value, GerritError> {
    let change_id = change_id_arg(arguments)?;
    info!(change_id = %change_id, "fetching change detail");
    client.get_change_detail(&change_id)
}

pub(super) fn handle_get_commit_message(
    client: &GerritClient,
    arguments: &Value,
) -> Result<Value, GerritError> {
    let change_id = change_id_arg(arguments)?;
    info!(change_id = %change_id, "fetching commit message");
    to_payload(&client.get_commit_message(&change_id)?)
}

pub(super) fn handle_get_related_changes(
    client: &GerritClient,
    arguments: &Value,
) -> Result<Value, GerritError> {
    let change_id = change_id_arg(arguments)?;
    info!(change_id = %change_id, "fetching related changes");
    client.get_related_changes(&change_id)
}
