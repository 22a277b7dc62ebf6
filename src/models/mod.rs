pub mod session;
pub mod resources;
pub mod tracking;

pub use session::{LoginRequest, LoginResponse, Role, Session, SessionUser};
pub use resources::{
    CreateCargoRequest, CreateRouteRequest, CreateUserRequest, CreateVehicleRequest, ResourceKind,
};
pub use tracking::{FeedMessage, LocationUpdate, SampleVehicle, LOCATION_UPDATE, SAMPLE_VEHICLES};
