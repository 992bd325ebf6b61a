use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type RouteId = Arc<str>;
pub type CityId = Arc<str>;

/// Routes longer than this many hours are long-haul.
pub const LONG_HAUL_HOURS: f64 = 6.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub origin: CityId,
    pub destination: CityId,
    pub duration_hours: f64,
}

impl Route {
    pub fn is_long_haul(&self) -> bool {
        self.duration_hours > LONG_HAUL_HOURS
    }
}
