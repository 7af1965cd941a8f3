use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::location::NewUserLocation;

#[derive(Debug, Error, PartialEq)]
pub enum LocationFormError {
    #[error("latitude must be within ±90 and longitude within ±180")]
    OutOfRange,
    #[error("battery level must be between 0 and 100")]
    InvalidBattery,
}

/// Geolocation fix reported by a device.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationForm {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>,
    pub battery_level: Option<i32>,
    /// Device time of the fix; defaults to the time it was received.
    pub recorded_at: Option<NaiveDateTime>,
}

impl LocationForm {
    pub fn into_new_location(
        self,
        user_id: i32,
        now: NaiveDateTime,
    ) -> Result<NewUserLocation, LocationFormError> {
        if !(-90.0..=90.0).contains(&self.latitude) || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(LocationFormError::OutOfRange);
        }
        if self
            .battery_level
            .is_some_and(|level| !(0..=100).contains(&level))
        {
            return Err(LocationFormError::InvalidBattery);
        }

        Ok(NewUserLocation {
            user_id,
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy: self.accuracy,
            battery_level: self.battery_level,
            recorded_at: self.recorded_at.unwrap_or(now),
        })
    }
}
