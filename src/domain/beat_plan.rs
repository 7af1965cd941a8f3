use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

/// Weekdays on which a route is visited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMask {
    #[serde(default)]
    pub monday: bool,
    #[serde(default)]
    pub tuesday: bool,
    #[serde(default)]
    pub wednesday: bool,
    #[serde(default)]
    pub thursday: bool,
    #[serde(default)]
    pub friday: bool,
    #[serde(default)]
    pub saturday: bool,
    #[serde(default)]
    pub sunday: bool,
}

impl DayMask {
    pub fn includes(&self, day: Weekday) -> bool {
        match day {
            Weekday::Mon => self.monday,
            Weekday::Tue => self.tuesday,
            Weekday::Wed => self.wednesday,
            Weekday::Thu => self.thursday,
            Weekday::Fri => self.friday,
            Weekday::Sat => self.saturday,
            Weekday::Sun => self.sunday,
        }
    }

    pub fn includes_date(&self, date: NaiveDate) -> bool {
        self.includes(date.weekday())
    }

    pub fn is_empty(&self) -> bool {
        !(self.monday
            || self.tuesday
            || self.wednesday
            || self.thursday
            || self.friday
            || self.saturday
            || self.sunday)
    }
}

#[cfg(test)]
impl DayMask {
    pub(crate) fn from_days(days: &[Weekday]) -> Self {
        let mut mask = Self::default();
        for day in days {
            match day {
                Weekday::Mon => mask.monday = true,
                Weekday::Tue => mask.tuesday = true,
                Weekday::Wed => mask.wednesday = true,
                Weekday::Thu => mask.thursday = true,
                Weekday::Fri => mask.friday = true,
                Weekday::Sat => mask.saturday = true,
                Weekday::Sun => mask.sunday = true,
            }
        }
        mask
    }
}

/// Assignment of a route to a field user on selected weekdays.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeatPlan {
    pub id: i32,
    pub user_id: i32,
    pub route_id: i32,
    pub days: DayMask,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Beat plan joined with the route and user names.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BeatPlanDetail {
    #[serde(flatten)]
    pub plan: BeatPlan,
    pub route_code: String,
    pub route_name: String,
    pub user_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewBeatPlan {
    pub user_id: i32,
    pub route_id: i32,
    pub days: DayMask,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateBeatPlan {
    pub user_id: i32,
    pub route_id: i32,
    pub days: DayMask,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_is_detected() {
        assert!(DayMask::default().is_empty());
        assert!(!DayMask::from_days(&[Weekday::Sun]).is_empty());
    }

    #[test]
    fn mask_matches_date_weekday() {
        let mask = DayMask::from_days(&[Weekday::Mon, Weekday::Thu]);
        let monday = NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date");
        let tuesday = NaiveDate::from_ymd_opt(2024, 6, 4).expect("valid date");

        assert!(mask.includes_date(monday));
        assert!(!mask.includes_date(tuesday));
        assert!(mask.includes(Weekday::Thu));
    }

    #[test]
    fn missing_days_deserialize_as_false() {
        let mask: DayMask = serde_json::from_str(r#"{"friday": true}"#).expect("mask parses");
        assert_eq!(mask, DayMask::from_days(&[Weekday::Fri]));
    }
}
