pub mod device;
pub mod record;
pub mod session;

pub use device::{DeviceRegistration, DeviceRegistry, Role};
pub use record::WeightRecord;
pub use session::{Session, SessionState};
