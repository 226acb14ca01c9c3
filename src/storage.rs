use crate::errors::AppError;
use crate::models::Users;
use std::path::Path;
use tokio::fs;
use tracing::error;

/// Reads the users blob. Missing or unparsable content yields an empty
/// mapping.
pub async fn load_users(path: &Path) -> Users {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(users) => users,
            Err(err) => {
                error!(path = %path.display(), "failed to parse users file: {err}");
                Users::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Users::default(),
        Err(err) => {
            error!(path = %path.display(), "failed to read users file: {err}");
            Users::default()
        }
    }
}

/// Overwrites the whole blob.
pub async fn persist_users(path: &Path, users: &Users) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(users).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(|err| {
        error!(path = %path.display(), "failed to write users file: {err}");
        AppError::internal(err)
    })?;
    Ok(())
}
