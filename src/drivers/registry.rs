// Driver registry: drivers submit themselves statically, hosts look them up

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Information about a radio driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub vendor: &'static str,
    pub model: &'static str,
    pub description: &'static str,
    pub is_clone_mode: bool,
}

impl DriverInfo {
    pub const fn new(
        vendor: &'static str,
        model: &'static str,
        description: &'static str,
        is_clone_mode: bool,
    ) -> Self {
        Self {
            vendor,
            model,
            description,
            is_clone_mode,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.vendor, self.model)
    }

    fn key(&self) -> String {
        registry_key(self.vendor, self.model)
    }
}

inventory::collect!(DriverInfo);

lazy_static::lazy_static! {
    static ref DRIVER_REGISTRY: Mutex<HashMap<String, DriverInfo>> = Mutex::new(HashMap::new());
}

fn registry_key(vendor: &str, model: &str) -> String {
    format!("{}::{}", vendor, model)
}

// The map stays consistent even if a holder panicked, so poisoning is ignored
fn registry() -> MutexGuard<'static, HashMap<String, DriverInfo>> {
    DRIVER_REGISTRY
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Copy every statically submitted driver into the registry
pub fn init_drivers() {
    let mut registry = registry();
    for info in inventory::iter::<DriverInfo> {
        tracing::debug!("Registering driver {}", info.full_name());
        registry.insert(info.key(), info.clone());
    }
}

pub fn register_driver(info: DriverInfo) {
    registry().insert(info.key(), info);
}

pub fn get_driver(vendor: &str, model: &str) -> Option<DriverInfo> {
    registry().get(&registry_key(vendor, model)).cloned()
}

pub fn list_drivers() -> Vec<DriverInfo> {
    registry().values().cloned().collect()
}

/// Drivers grouped by vendor, each group sorted by model
pub fn list_drivers_by_vendor() -> HashMap<&'static str, Vec<DriverInfo>> {
    let mut by_vendor: HashMap<&'static str, Vec<DriverInfo>> = HashMap::new();

    for info in list_drivers() {
        by_vendor.entry(info.vendor).or_default().push(info);
    }

    for drivers in by_vendor.values_mut() {
        drivers.sort_by(|a, b| a.model.cmp(b.model));
    }

    by_vendor
}

/// Submit a driver to the static registry
///
/// ```ignore
/// register_radio_driver!("Icom", "IC-F1010", "VHF handheld", true);
/// ```
#[macro_export]
macro_rules! register_radio_driver {
    ($vendor:expr, $model:expr, $description:expr, $is_clone:expr) => {
        inventory::submit! {
            $crate::drivers::registry::DriverInfo::new(
                $vendor,
                $model,
                $description,
                $is_clone
            )
        }
    };
}
