use serde::Deserialize;

use crate::auth::AuthenticatedUser;
use crate::domain::location::{LatestUserLocation, UserLocation};
use crate::forms::locations::LocationForm;
use crate::repository::{LocationReader, LocationWriter};
use crate::services::{MANAGER_ROLES, ServiceError, ServiceResult, now, require_role};

const DEFAULT_HISTORY: i64 = 100;
const MAX_HISTORY: i64 = 1000;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

/// Store a fix reported by the caller's own device.
pub fn record_location<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: LocationForm,
) -> ServiceResult<UserLocation>
where
    R: LocationWriter + ?Sized,
{
    let location = form
        .into_new_location(user.id(), now())
        .map_err(|err| ServiceError::Form(err.to_string()))?;

    let stored = repo.record_location(&location).map_err(ServiceError::from)?;
    log::debug!(
        "Location of user {} at {:.5},{:.5}",
        stored.user_id,
        stored.latitude,
        stored.longitude
    );
    Ok(stored)
}

/// Last known position of every user, for the tracking map.
pub fn latest_locations<R>(
    repo: &R,
    user: &AuthenticatedUser,
) -> ServiceResult<Vec<LatestUserLocation>>
where
    R: LocationReader + ?Sized,
{
    require_role(user, MANAGER_ROLES)?;
    repo.latest_locations().map_err(ServiceError::from)
}

/// Newest fixes of `user_id` first.
pub fn user_history<R>(
    repo: &R,
    user: &AuthenticatedUser,
    user_id: i32,
    query: HistoryQuery,
) -> ServiceResult<Vec<UserLocation>>
where
    R: LocationReader + ?Sized,
{
    if user.scope().is_some_and(|own| own != user_id) {
        return Err(ServiceError::Forbidden);
    }

    let limit = query.limit.unwrap_or(DEFAULT_HISTORY).clamp(1, MAX_HISTORY);
    repo.list_user_locations(user_id, limit)
        .map_err(ServiceError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;
    use crate::services::fixtures::{self, USER_ID};

    fn stored(id: i32, user_id: i32) -> UserLocation {
        UserLocation {
            id,
            user_id,
            latitude: 19.07,
            longitude: 72.87,
            accuracy: None,
            battery_level: Some(64),
            recorded_at: fixtures::datetime(),
        }
    }

    #[test]
    fn fix_belongs_to_the_caller() {
        let mut repo = MockRepository::new();
        repo.expect_record_location()
            .times(1)
            .withf(|location| location.user_id == USER_ID)
            .returning(|_| Ok(stored(1, USER_ID)));

        let form = LocationForm {
            latitude: 19.07,
            longitude: 72.87,
            accuracy: None,
            battery_level: Some(64),
            recorded_at: None,
        };
        record_location(&repo, &fixtures::user(Role::FieldStaff), form).expect("recorded");
    }

    #[test]
    fn invalid_fix_is_a_form_error() {
        let mut repo = MockRepository::new();
        repo.expect_record_location().never();

        let form = LocationForm {
            latitude: 120.0,
            longitude: 0.0,
            accuracy: None,
            battery_level: None,
            recorded_at: None,
        };
        assert!(matches!(
            record_location(&repo, &fixtures::user(Role::Admin), form),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn tracking_map_is_for_managers() {
        let repo = MockRepository::new();
        assert!(matches!(
            latest_locations(&repo, &fixtures::user(Role::FieldStaff)),
            Err(ServiceError::Forbidden)
        ));
    }

    #[test]
    fn history_limit_is_clamped() {
        let mut repo = MockRepository::new();
        repo.expect_list_user_locations()
            .times(1)
            .withf(|user_id, limit| *user_id == USER_ID && *limit == MAX_HISTORY)
            .returning(|user_id, _| Ok(vec![stored(2, user_id)]));

        let history = user_history(
            &repo,
            &fixtures::user(Role::FieldStaff),
            USER_ID,
            HistoryQuery { limit: Some(50_000) },
        )
        .expect("history");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn field_staff_cannot_track_colleagues() {
        let repo = MockRepository::new();
        assert!(matches!(
            user_history(&repo, &fixtures::user(Role::FieldStaff), 99, HistoryQuery::default()),
            Err(ServiceError::Forbidden)
        ));
    }
}
