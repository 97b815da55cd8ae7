//! Cross-table aggregates for the dashboard.

use chrono::NaiveDate;
use serde::Serialize;
use voyage_core::stats::{
    count_by_month, count_by_trailing_days, type_distribution, DayCount, MonthCount, TypeCount,
};

use crate::client::RecordClient;
use crate::config::tables;
use crate::error::StoreError;
use crate::pagination::SUPERSET_CEILING;

/// Number of days covered by the registrations chart, ending today.
pub const REGISTRATION_WINDOW_DAYS: u32 = 7;

/// Row counts per table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub locations: u64,
    pub festivals: u64,
    pub accounts: u64,
    pub items: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCharts {
    pub location_types: Vec<TypeCount>,
    pub festivals_by_month: Vec<MonthCount>,
    pub user_registrations: Vec<DayCount>,
}

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn stats(client: &RecordClient) -> Result<DashboardStats, StoreError> {
        let (locations, festivals, accounts, items) = tokio::try_join!(
            client.count(tables::LOCATIONS, None),
            client.count(tables::FESTIVALS, None),
            client.count(tables::ACCOUNTS, None),
            client.count(tables::ITEMS, None),
        )?;
        Ok(DashboardStats {
            locations,
            festivals,
            accounts,
            items,
        })
    }

    /// Chart series. `today` anchors the registrations window (UTC).
    pub async fn charts(client: &RecordClient, today: NaiveDate) -> Result<DashboardCharts, StoreError> {
        let (locations, festivals, accounts) = tokio::try_join!(
            client.list_all(tables::LOCATIONS, None, None, Some("Id,types"), SUPERSET_CEILING),
            client.list_all(tables::FESTIVALS, None, None, Some("Id,event_time"), SUPERSET_CEILING),
            client.list_all(tables::ACCOUNTS, None, None, Some("Id,CreatedAt"), SUPERSET_CEILING),
        )?;

        Ok(DashboardCharts {
            location_types: type_distribution(&locations.list, "types"),
            festivals_by_month: count_by_month(&festivals.list, "event_time"),
            user_registrations: count_by_trailing_days(
                &accounts.list,
                "CreatedAt",
                today,
                REGISTRATION_WINDOW_DAYS,
            ),
        })
    }
}
