use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::beat_plan::{
    BeatPlan as DomainBeatPlan, DayMask, NewBeatPlan as DomainNewBeatPlan,
    UpdateBeatPlan as DomainUpdateBeatPlan,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::beat_plans)]
pub struct BeatPlan {
    pub id: i32,
    pub user_id: i32,
    pub route_id: i32,
    pub day_monday: bool,
    pub day_tuesday: bool,
    pub day_wednesday: bool,
    pub day_thursday: bool,
    pub day_friday: bool,
    pub day_saturday: bool,
    pub day_sunday: bool,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::beat_plans)]
pub struct NewBeatPlan {
    pub user_id: i32,
    pub route_id: i32,
    pub day_monday: bool,
    pub day_tuesday: bool,
    pub day_wednesday: bool,
    pub day_thursday: bool,
    pub day_friday: bool,
    pub day_saturday: bool,
    pub day_sunday: bool,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::beat_plans)]
pub struct UpdateBeatPlan {
    pub user_id: i32,
    pub route_id: i32,
    pub day_monday: bool,
    pub day_tuesday: bool,
    pub day_wednesday: bool,
    pub day_thursday: bool,
    pub day_friday: bool,
    pub day_saturday: bool,
    pub day_sunday: bool,
    pub is_active: bool,
    pub updated_at: NaiveDateTime,
}

impl From<BeatPlan> for DomainBeatPlan {
    fn from(value: BeatPlan) -> Self {
        Self {
            id: value.id,
            user_id: value.user_id,
            route_id: value.route_id,
            days: DayMask {
                monday: value.day_monday,
                tuesday: value.day_tuesday,
                wednesday: value.day_wednesday,
                thursday: value.day_thursday,
                friday: value.day_friday,
                saturday: value.day_saturday,
                sunday: value.day_sunday,
            },
            is_active: value.is_active,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl From<&DomainNewBeatPlan> for NewBeatPlan {
    fn from(value: &DomainNewBeatPlan) -> Self {
        let days = value.days;
        Self {
            user_id: value.user_id,
            route_id: value.route_id,
            day_monday: days.monday,
            day_tuesday: days.tuesday,
            day_wednesday: days.wednesday,
            day_thursday: days.thursday,
            day_friday: days.friday,
            day_saturday: days.saturday,
            day_sunday: days.sunday,
        }
    }
}

impl From<&DomainUpdateBeatPlan> for UpdateBeatPlan {
    fn from(value: &DomainUpdateBeatPlan) -> Self {
        let days = value.days;
        Self {
            user_id: value.user_id,
            route_id: value.route_id,
            day_monday: days.monday,
            day_tuesday: days.tuesday,
            day_wednesday: days.wednesday,
            day_thursday: days.thursday,
            day_friday: days.friday,
            day_saturday: days.saturday,
            day_sunday: days.sunday,
            is_active: value.is_active,
            updated_at: value.updated_at,
        }
    }
}
