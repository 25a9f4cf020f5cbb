use rizz_client::Backend;
use rizz_core::{Contact, Session};

use crate::error::SendError;

/// Send `message` to `contact` as a direct message.
///
/// # Errors
///
/// - [`SendError::EmptyMessage`] for a blank message, before any request.
/// - [`SendError::Backend`] if the backend call fails or reports `success: false`.
pub async fn send_pickup_line(
    backend: &dyn Backend,
    session: &Session,
    contact: &Contact,
    message: &str,
) -> Result<(), SendError> {
    let message = message.trim();
    if message.is_empty() {
        return Err(SendError::EmptyMessage);
    }
    backend
        .send_message(session.token(), &contact.username, message)
        .await?;
    tracing::debug!(contact = %contact.username, "pickup line sent");
    Ok(())
}
