pub mod app;
pub mod login;
pub mod layout;
pub mod dashboard;
pub mod resource_list;
pub mod forms;
pub mod tracking;

pub use app::render_app;
pub use login::render_login;
pub use tracking::sync_tracking_panel;
