pub mod table_viewmodel;
pub mod dashboard_viewmodel;
pub mod form_viewmodel;
pub mod map_viewmodel;
pub mod app_viewmodel;

pub use table_viewmodel::{list_view, Cell, ListView, TableModel};
pub use dashboard_viewmodel::{DashboardStats, DashboardViewModel};
pub use form_viewmodel::{FormFields, RouteFormOptions, SelectOption};
pub use app_viewmodel::AppViewModel;
