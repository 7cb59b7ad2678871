// src/services/analytics_service.rs
// DOCUMENTATION: Admin dashboard figures

use crate::db::AnalyticsRepository;
use crate::errors::ApiError;
use chrono::{Datelike, TimeZone, Utc};
use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    pub total_places: i64,
    pub total_users: i64,
    pub active_users: i64,
    /// New users per month of the current year, January first
    pub monthly_new_users: [i64; 12],
}

/// Spread (month, count) rows over a January..December array
pub fn fill_months(rows: &[(i32, i64)]) -> [i64; 12] {
    let mut months = [0i64; 12];
    for (month, count) in rows {
        if (1..=12).contains(month) {
            months[(*month - 1) as usize] = *count;
        }
    }
    months
}

pub struct AnalyticsService;

impl AnalyticsService {
    pub async fn dashboard(pool: &PgPool) -> Result<DashboardData, ApiError> {
        let year = Utc::now().year();
        let start = Utc
            .with_ymd_and_hms(year, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| ApiError::InternalError("Invalid year start".to_string()))?;
        let end = Utc
            .with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0)
            .single()
            .ok_or_else(|| ApiError::InternalError("Invalid year end".to_string()))?;

        let (totals, monthly) = tokio::try_join!(
            AnalyticsRepository::totals(pool),
            AnalyticsRepository::signups_by_month(pool, start, end),
        )?;

        Ok(DashboardData {
            total_places: totals.total_places,
            total_users: totals.total_users,
            active_users: totals.active_users,
            monthly_new_users: fill_months(&monthly),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_months() {
        let months = fill_months(&[(1, 4), (3, 2), (12, 9)]);
        assert_eq!(months, [4, 0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 9]);
    }

    #[test]
    fn test_fill_months_ignores_out_of_range() {
        assert_eq!(fill_months(&[(0, 5), (13, 1)]), [0; 12]);
    }

    #[test]
    fn test_dashboard_serializes_camel_case() {
        let data = DashboardData {
            total_places: 1,
            total_users: 2,
            active_users: 1,
            monthly_new_users: [0; 12],
        };
        let json = serde_json::to_value(data).unwrap();
        assert_eq!(json["totalPlaces"], 1);
        assert_eq!(json["monthlyNewUsers"].as_array().unwrap().len(), 12);
    }
}
