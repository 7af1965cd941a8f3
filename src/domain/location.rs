use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Geolocation fix reported by a user's device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserLocation {
    pub id: i32,
    pub user_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres.
    pub accuracy: Option<f64>,
    /// Percent.
    pub battery_level: Option<i32>,
    pub recorded_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewUserLocation {
    pub user_id: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub battery_level: Option<i32>,
    pub recorded_at: NaiveDateTime,
}

/// Latest fix of a user, joined with the user name and mobile number.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct LatestUserLocation {
    #[serde(flatten)]
    pub location: UserLocation,
    pub full_name: String,
    pub mobile_no: String,
}
