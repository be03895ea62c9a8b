use serde::{Deserialize, Serialize};

/// Circular geofence owned by the company. Optional in the policy file:
/// absent means geofencing is disabled and every point is allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeofenceConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_m: f64,
}

impl GeofenceConfig {
    pub fn center(&self) -> GeoPoint {
        GeoPoint {
            lat: self.center_lat,
            lon: self.center_lon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Who is performing the clock attempt. Admins may bypass the fence,
/// but the event is flagged for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    Public,
    Admin,
}
