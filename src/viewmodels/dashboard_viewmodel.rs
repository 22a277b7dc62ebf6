// ============================================================================
// DASHBOARD VIEWMODEL - Contadores de la portada
// ============================================================================

use serde_json::Value;

use crate::error::ApiError;
use crate::models::ResourceKind;
use crate::services::ApiClient;
use crate::viewmodels::table_viewmodel::{field_text, normalize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_vehicles: usize,
    pub active_routes: usize,
    pub pending_cargo: usize,
    pub total_users: usize,
}

impl DashboardStats {
    /// Contadores derivados solo filtrando lo que devolvió el servidor
    pub fn from_snapshots(vehicles: &[Value], routes: &[Value], cargo: &[Value], users: &[Value]) -> Self {
        Self {
            total_vehicles: vehicles.len(),
            active_routes: count_with_status(routes, "inprogress"),
            pending_cargo: count_with_status(cargo, "pending"),
            total_users: users.len(),
        }
    }
}

fn count_with_status(records: &[Value], status: &str) -> usize {
    records
        .iter()
        .filter(|record| normalize(&field_text(record, "status")) == status)
        .count()
}

/// ViewModel de la portada
pub struct DashboardViewModel;

impl DashboardViewModel {
    /// Cuatro GET en paralelo. Si cualquiera falla no se muestra nada nuevo.
    pub async fn load(api: &ApiClient) -> Result<DashboardStats, ApiError> {
        let (vehicles, routes, cargo, users) = futures::join!(
            api.list(ResourceKind::Vehicles),
            api.list(ResourceKind::Routes),
            api.list(ResourceKind::Cargo),
            api.list(ResourceKind::Users),
        );
        let (vehicles, routes, cargo, users) = (vehicles?, routes?, cargo?, users?);

        let stats = DashboardStats::from_snapshots(&vehicles, &routes, &cargo, &users);
        log::info!("📊 [DASHBOARD] {:?}", stats);
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_cargo_counts_only_pending() {
        let cargo = vec![
            json!({"status": "pending"}),
            json!({"status": "delivered"}),
            json!({"status": "pending"}),
        ];
        let stats = DashboardStats::from_snapshots(&[], &[], &cargo, &[]);
        assert_eq!(stats.pending_cargo, 2);
    }

    #[test]
    fn counts_totals_and_in_progress_routes() {
        let vehicles = vec![json!({}), json!({}), json!({})];
        let routes = vec![
            json!({"status": "inprogress"}),
            json!({"status": "InProgress"}),
            json!({"status": "planned"}),
            json!({"id": "no-status"}),
        ];
        let users = vec![json!({"role": "Admin"})];
        let stats = DashboardStats::from_snapshots(&vehicles, &routes, &[], &users);
        assert_eq!(
            stats,
            DashboardStats { total_vehicles: 3, active_routes: 2, pending_cargo: 0, total_users: 1 }
        );
    }
}
