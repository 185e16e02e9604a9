// Radio driver framework
pub mod registry;
pub mod traits;

// Drivers
pub mod icf1010;

pub use icf1010::ICF1010Radio;
pub use registry::{
    get_driver, init_drivers, list_drivers, list_drivers_by_vendor, register_driver, DriverInfo,
};
pub use traits::{
    CloneModeRadio, CloneRange, IcomCloneModeRadio, Radio, RadioError, RadioResult,
};
