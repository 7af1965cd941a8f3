use serde::Deserialize;

use crate::domain::beat_plan::{DayMask, NewBeatPlan, UpdateBeatPlan};

/// Payload of the create and edit beat plan endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BeatPlanForm {
    pub user_id: i32,
    pub route_id: i32,
    #[serde(default)]
    pub days: DayMask,
    /// Only read on edit.
    pub is_active: Option<bool>,
}

impl BeatPlanForm {
    pub fn into_new_plan(self) -> NewBeatPlan {
        NewBeatPlan {
            user_id: self.user_id,
            route_id: self.route_id,
            days: self.days,
        }
    }

    pub fn into_update(self) -> UpdateBeatPlan {
        UpdateBeatPlan {
            user_id: self.user_id,
            route_id: self.route_id,
            days: self.days,
            is_active: self.is_active.unwrap_or(true),
            updated_at: chrono::Local::now().naive_utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_days_read_as_unset() {
        let form: BeatPlanForm = serde_json::from_str(
            r#"{"user_id": 1, "route_id": 2, "days": {"monday": true}}"#,
        )
        .expect("parses");

        assert!(form.days.monday);
        assert!(!form.days.sunday);
        assert!(!form.into_new_plan().days.is_empty());
    }
}
