mod cost;
mod maintenance_error;

pub use cost::Cost;
pub use maintenance_error::MaintenanceError;
