use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::route::{Route, RouteCustomer, RouteCustomerDetail, RouteListQuery};
use crate::forms::routes::{AddRouteCustomerForm, AddRouteForm, EditRouteForm, VisitSequenceForm};
use crate::pagination::{Paginated, page_params};
use crate::repository::{CustomerReader, RouteReader, RouteWriter};
use crate::services::{MANAGER_ROLES, ServiceError, ServiceResult, page_of, require_role};

/// Query parameters of the route list.
#[derive(Debug, Default, Deserialize)]
pub struct RoutesQuery {
    pub search: Option<String>,
    #[serde(default)]
    pub active_only: bool,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

pub fn list_routes<R>(
    repo: &R,
    _user: &AuthenticatedUser,
    query: RoutesQuery,
) -> ServiceResult<Paginated<Route>>
where
    R: RouteReader + ?Sized,
{
    let (page, per_page) = page_params(query.page, query.per_page);
    let mut list_query = RouteListQuery::new().paginate(page, per_page);

    if let Some(term) = query.search.as_deref().filter(|term| !term.trim().is_empty()) {
        list_query = list_query.search(term);
    }
    if query.active_only {
        list_query = list_query.active_only();
    }

    let (total, routes) = repo.list_routes(list_query).map_err(ServiceError::from)?;
    Ok(page_of(routes, total, page, per_page))
}

pub fn get_route<R>(repo: &R, _user: &AuthenticatedUser, route_id: i32) -> ServiceResult<Route>
where
    R: RouteReader + ?Sized,
{
    repo.get_route_by_id(route_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)
}

pub fn create_route<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddRouteForm,
) -> ServiceResult<Route>
where
    R: RouteWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let new_route = form
        .into_new_route(user.id())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let created = repo.create_route(&new_route).map_err(ServiceError::from)?;
    log::info!("Route {} created by {}", created.route_code, user.id());
    Ok(created)
}

pub fn update_route<R>(
    repo: &R,
    user: &AuthenticatedUser,
    route_id: i32,
    form: EditRouteForm,
) -> ServiceResult<Route>
where
    R: RouteWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let updates = form
        .into_update()
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    repo.update_route(route_id, &updates)
        .map_err(ServiceError::from)
}

/// Customers of a route in visit order.
pub fn list_route_customers<R>(
    repo: &R,
    user: &AuthenticatedUser,
    route_id: i32,
) -> ServiceResult<Vec<RouteCustomerDetail>>
where
    R: RouteReader + ?Sized,
{
    get_route(repo, user, route_id)?;

    repo.list_route_customers(route_id)
        .map_err(ServiceError::from)
}

/// Append a customer to the end of the route.
pub fn add_route_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    route_id: i32,
    form: AddRouteCustomerForm,
) -> ServiceResult<RouteCustomer>
where
    R: RouteReader + RouteWriter + CustomerReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;
    get_route(repo, user, route_id)?;

    if repo
        .get_customer_by_id(form.customer_id)
        .map_err(ServiceError::from)?
        .is_none()
    {
        return Err(ServiceError::Form(format!(
            "customer {} does not exist",
            form.customer_id
        )));
    }

    let mapping = repo
        .add_route_customer(&form.into_mapping(route_id, user.id()))
        .map_err(ServiceError::from)?;
    log::info!(
        "Customer {} added to route {} at position {}",
        mapping.customer_id,
        route_id,
        mapping.visit_sequence
    );
    Ok(mapping)
}

/// Mapping `mapping_id` if it belongs to `route_id`.
fn route_mapping<R>(repo: &R, route_id: i32, mapping_id: i32) -> ServiceResult<RouteCustomer>
where
    R: RouteReader + ?Sized,
{
    match repo
        .get_route_customer(mapping_id)
        .map_err(ServiceError::from)?
    {
        Some(mapping) if mapping.route_id == route_id => Ok(mapping),
        _ => Err(ServiceError::NotFound),
    }
}

/// Overwrite one visit position. Other mappings keep their numbers.
pub fn update_visit_sequence<R>(
    repo: &R,
    user: &AuthenticatedUser,
    route_id: i32,
    mapping_id: i32,
    form: VisitSequenceForm,
) -> ServiceResult<RouteCustomer>
where
    R: RouteReader + RouteWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;

    let visit_sequence = form
        .checked()
        .map_err(|err| ServiceError::Form(err.to_string()))?;
    route_mapping(repo, route_id, mapping_id)?;

    repo.update_visit_sequence(mapping_id, visit_sequence)
        .map_err(ServiceError::from)
}

pub fn remove_route_customer<R>(
    repo: &R,
    user: &AuthenticatedUser,
    route_id: i32,
    mapping_id: i32,
) -> ServiceResult<()>
where
    R: RouteReader + RouteWriter + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;
    let mapping = route_mapping(repo, route_id, mapping_id)?;

    repo.remove_route_customer(mapping_id)
        .map_err(ServiceError::from)?;
    log::info!(
        "Customer {} removed from route {} by {}",
        mapping.customer_id,
        route_id,
        user.id()
    );
    Ok(())
}
