use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::location::{NewUserLocation as DomainNewLocation, UserLocation as DomainLocation};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::user_locations)]
pub struct UserLocation {
    pub id: i32,
    pub user_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub battery_level: Option<i32>,
    pub recorded_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::user_locations)]
pub struct NewUserLocation {
    pub user_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub battery_level: Option<i32>,
    pub recorded_at: NaiveDateTime,
}

impl From<UserLocation> for DomainLocation {
    fn from(value: UserLocation) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            latitude: value.latitude,
            longitude: value.longitude,
            accuracy: value.accuracy,
            battery_level: value.battery_level,
            recorded_at: value.recorded_at,
        }
    }
}

impl From<&DomainNewLocation> for NewUserLocation {
    fn from(value: &DomainNewLocation) -> Self {
        Self {
            user_id: value.user_id,
            latitude: value.latitude,
            longitude: value.longitude,
            accuracy: value.accuracy,
            battery_level: value.battery_level,
            recorded_at: value.recorded_at,
        }
    }
}
