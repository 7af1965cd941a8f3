use std::collections::HashMap;

use chrono::NaiveDateTime;
use diesel::dsl::max;
use diesel::prelude::*;

use crate::{
    domain::location::{
        LatestUserLocation, NewUserLocation as DomainNewLocation, UserLocation as DomainLocation,
    },
    models::location::{NewUserLocation as DbNewLocation, UserLocation as DbLocation},
    repository::{DieselRepository, LocationReader, LocationWriter, RepositoryResult},
    schema::{user_locations, users},
};

impl LocationReader for DieselRepository {
    fn latest_locations(&self) -> RepositoryResult<Vec<LatestUserLocation>> {
        let mut conn = self.conn()?;

        let latest: HashMap<i32, NaiveDateTime> = user_locations::table
            .group_by(user_locations::user_id)
            .select((user_locations::user_id, max(user_locations::recorded_at)))
            .load::<(i32, Option<NaiveDateTime>)>(&mut conn)?
            .into_iter()
            .filter_map(|(user_id, recorded_at)| recorded_at.map(|at| (user_id, at)))
            .collect();

        if latest.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<i32> = latest.keys().copied().collect();
        let timestamps: Vec<NaiveDateTime> = latest.values().copied().collect();

        let rows = user_locations::table
            .inner_join(users::table)
            .filter(user_locations::user_id.eq_any(user_ids))
            .filter(user_locations::recorded_at.eq_any(timestamps))
            .order(user_locations::id.asc())
            .select((DbLocation::as_select(), users::full_name, users::mobile_no))
            .load::<(DbLocation, String, String)>(&mut conn)?;

        // Several fixes can share a timestamp; the last inserted one wins.
        let mut by_user: HashMap<i32, LatestUserLocation> = HashMap::new();
        for (location, full_name, mobile_no) in rows {
            if latest.get(&location.user_id) != Some(&location.recorded_at) {
                continue;
            }
            by_user.insert(
                location.user_id,
                LatestUserLocation {
                    location: location.into(),
                    full_name,
                    mobile_no,
                },
            );
        }

        let mut result: Vec<LatestUserLocation> = by_user.into_values().collect();
        result.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(result)
    }

    fn list_user_locations(
        &self,
        user_id: i32,
        limit: i64,
    ) -> RepositoryResult<Vec<DomainLocation>> {
        let mut conn = self.conn()?;

        let rows = user_locations::table
            .filter(user_locations::user_id.eq(user_id))
            .order((user_locations::recorded_at.desc(), user_locations::id.desc()))
            .limit(limit)
            .load::<DbLocation>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

impl LocationWriter for DieselRepository {
    fn record_location(&self, location: &DomainNewLocation) -> RepositoryResult<DomainLocation> {
        let mut conn = self.conn()?;

        let created = diesel::insert_into(user_locations::table)
            .values(&DbNewLocation::from(location))
            .get_result::<DbLocation>(&mut conn)?;

        Ok(created.into())
    }
}
