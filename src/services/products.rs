use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{ProductForm, parse_product_upload};
use crate::forms::uploads::UploadForm;
use crate::pagination::{Paginated, page_params};
use crate::repository::{ProductReader, ProductWriter, RepositoryError};
use crate::services::{
    ImportReport, MANAGER_ROLES, ServiceError, ServiceResult, page_of, require_role,
};

/// Query parameters accepted by the product list.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Matches code, name or HSN code.
    pub search: Option<String>,
    pub category: Option<String>,
    /// Include deactivated products.
    #[serde(default)]
    pub include_inactive: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub fn list_products<R>(
    repo: &R,
    _user: &AuthenticatedUser,
    query: ProductsQuery,
) -> ServiceResult<Paginated<Product>>
where
    R: ProductReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = ProductListQuery::new().paginate(page, per_page);

    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }
    if let Some(category) = query.category.as_deref().filter(|value| !value.trim().is_empty()) {
        list_query = list_query.category(category.trim());
    }
    if query.include_inactive {
        list_query = list_query.include_inactive();
    }

    let (total, products) = repo.list_products(list_query).map_err(ServiceError::from)?;
    Ok(page_of(products, total, page, per_page))
}

pub fn get_product<R>(
    repo: &R,
    _user: &AuthenticatedUser,
    product_id: i32,
) -> ServiceResult<Product>
where
    R: ProductReader + ?Sized,
{
    repo.get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let new_product = form
        .into_new_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo
        .create_product(&new_product)
        .map_err(ServiceError::from)?;
    log::info!("Product {} created by {}", created.product_code, user.id());
    Ok(created)
}

pub fn update_product<R>(
    repo: &R,
    user: &AuthenticatedUser,
    product_id: i32,
    form: ProductForm,
) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let updates = form
        .into_update_product()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_product(product_id, &updates)
        .map_err(ServiceError::from)
}

/// Imports products from an uploaded CSV file.
pub fn import_products<R>(
    repo: &R,
    user: &AuthenticatedUser,
    upload: UploadForm,
) -> ServiceResult<ImportReport>
where
    R: ProductWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let batch =
        parse_product_upload(upload).map_err(|err| ServiceError::Form(err.to_string()))?;

    if batch.rows.is_empty() {
        return Ok(ImportReport {
            inserted: 0,
            errors: batch.errors,
        });
    }

    let inserted = match repo.create_products(&batch.rows) {
        Ok(inserted) => inserted,
        Err(RepositoryError::Conflict(message)) => {
            log::warn!(
                "Product upload rolled back, {} rows discarded: {message}",
                batch.rows.len()
            );
            return Err(ServiceError::Conflict(format!(
                "upload rejected, no products were imported: {message}"
            )));
        }
        Err(err) => return Err(ServiceError::from(err)),
    };

    log::info!("Imported {inserted} products for {}", user.id());
    Ok(ImportReport {
        inserted,
        errors: batch.errors,
    })
}

#[cfg(test)]
mod tests {
    use std::io::{Seek, SeekFrom, Write};

    use actix_multipart::form::tempfile::TempFile;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::domain::user::Role;
    use crate::forms::uploads::UploadCsvForm;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures;

    fn form(gst_rate: f64) -> ProductForm {
        ProductForm {
            product_code: "P10".to_string(),
            product_name: "Hex Bolt".to_string(),
            category: None,
            subcategory: None,
            unit_of_measure: None,
            hsn_code: None,
            gst_rate,
            description: None,
            is_active: None,
        }
    }

    fn upload_from(contents: &str) -> UploadForm {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file.flush().expect("flush csv");
        file.as_file_mut()
            .seek(SeekFrom::Start(0))
            .expect("rewind csv");

        let form = UploadCsvForm {
            csv: TempFile {
                file,
                content_type: None,
                file_name: Some("products.csv".to_string()),
                size: contents.len(),
            },
        };
        form.into_upload().expect("upload read")
    }

    #[test]
    fn field_staff_cannot_create_products() {
        let repo = MockRepository::new();
        assert!(matches!(
            create_product(&repo, &fixtures::user(Role::FieldStaff), form(18.0)),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn invalid_form_never_reaches_storage() {
        let mut repo = MockRepository::new();
        repo.expect_create_product().never();

        assert!(matches!(
            create_product(&repo, &fixtures::user(Role::Admin), form(-5.0)),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn search_is_forwarded_to_the_repository() {
        let mut repo = MockRepository::new();
        repo.expect_list_products()
            .times(1)
            .withf(|query| query.search.as_deref() == Some("bolt") && !query.include_inactive)
            .returning(|_| Ok((1, vec![fixtures::product(1, 18.0)])));

        let query = ProductsQuery {
            search: Some("bolt".to_string()),
            ..ProductsQuery::default()
        };
        let page =
            list_products(&repo, &fixtures::user(Role::FieldStaff), query).expect("listed");
        assert_eq!(page.total, 1);
    }

    #[test]
    fn multipart_upload_imports_valid_rows() {
        let mut repo = MockRepository::new();
        repo.expect_create_products()
            .times(1)
            .withf(|rows| rows.len() == 1 && rows[0].product_code == "P1")
            .returning(|rows| Ok(rows.len()));

        let upload = upload_from("product_code,product_name\nP1,Bolt\n,Nut\n");
        let report =
            import_products(&repo, &fixtures::user(Role::SalesManager), upload).expect("imported");

        assert_eq!(report.inserted, 1);
        assert_eq!(
            report.errors,
            vec!["Row 3: Missing required fields (product_code)".to_string()]
        );
    }
}
