use shopfront_core::ProfileResponse;
use tracing::{debug, instrument, warn};

use super::{Load, LoadEvent};
use crate::api::ApiError;
use crate::error::PageError;

/// Root layout loader: restores the session identity.
///
/// When the auth container is empty, asks `/api/auth/profile` who the session
/// belongs to and logs that user in. A missing session and an unreachable API
/// are both silent: the layout always loads and the visitor stays anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutLoader;

impl Load for LayoutLoader {
    type Data = ();

    #[instrument(name = "layout_load", skip_all)]
    async fn load(&self, event: &LoadEvent<'_>) -> Result<(), PageError> {
        if event.auth.is_authenticated() {
            debug!("Session already restored, skipping profile request");
            return Ok(());
        }

        match event.api.profile(event.session).await {
            Ok(ProfileResponse { user }) => event.auth.login(user),
            Err(ApiError::Status { status, .. }) => {
                debug!(status = %status, "No active session");
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch user profile");
            }
        }

        Ok(())
    }
}
