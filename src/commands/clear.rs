use log::info;

use crate::api::routes::CLEAR;
use crate::api::{ApiClient, RequestOptions};
use crate::utils::error::CommandError;

/// Ask the service to delete all stored data once `confirm` agrees.
///
/// Returns `Ok(false)` when the operator declined; nothing is sent then.
pub async fn clear_data<C>(api: &ApiClient, confirm: C) -> Result<bool, CommandError>
where
    C: FnOnce() -> bool,
{
    if !confirm() {
        info!("Clear cancelled by operator");
        return Ok(false);
    }

    api.call(CLEAR, RequestOptions::post()).await?;
    info!("Stored capture data cleared");
    Ok(true)
}
