use crate::auth::AuthenticatedUser;
use crate::forms::uploads::UploadKind;
use crate::services::reports::CsvExport;
use crate::services::{MANAGER_ROLES, ServiceError, ServiceResult, require_role};

/// Blank CSV template for one of the bulk uploads.
pub fn upload_template(user: &AuthenticatedUser, kind: UploadKind) -> ServiceResult<CsvExport> {
    require_role(user, MANAGER_ROLES)?;

    let bytes = kind
        .template_csv()
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    Ok(CsvExport {
        file_name: kind.file_name().to_string(),
        bytes,
    })
}
