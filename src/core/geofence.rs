//! Geofence validation: great-circle distance between the device and
//! the company fence center, gated by caller role.

use crate::models::geofence::{CallerRole, GeoPoint, GeofenceConfig};

const EARTH_RADIUS_M: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeofenceVerdict {
    Allow,
    /// Outside the fence but recorded anyway (admin caller); the event
    /// carries `geofence_ok = false` for later audit.
    AllowWithFlag,
    /// Outside the fence, public caller: attendance is not recorded.
    Block,
}

impl GeofenceVerdict {
    /// Value persisted on the event. `None` when no fence applies.
    pub fn geofence_ok(&self) -> Option<bool> {
        match self {
            GeofenceVerdict::Allow => Some(true),
            GeofenceVerdict::AllowWithFlag => Some(false),
            GeofenceVerdict::Block => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, GeofenceVerdict::Block)
    }
}

/// Haversine distance in meters.
pub fn haversine_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Validate a clock attempt against the company fence.
///
/// No fence configured → always allow. A configured fence with no
/// device coordinates is treated as outside: an unverifiable position
/// must not pass silently.
pub fn validate(
    point: Option<&GeoPoint>,
    fence: Option<&GeofenceConfig>,
    role: CallerRole,
) -> GeofenceVerdict {
    let Some(fence) = fence else {
        return GeofenceVerdict::Allow;
    };

    let inside = match point {
        Some(p) => haversine_m(p, &fence.center()) <= fence.radius_m,
        None => false,
    };

    if inside {
        GeofenceVerdict::Allow
    } else {
        match role {
            CallerRole::Public => GeofenceVerdict::Block,
            CallerRole::Admin => GeofenceVerdict::AllowWithFlag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tegucigalpa_fence() -> GeofenceConfig {
        GeofenceConfig {
            center_lat: 14.0723,
            center_lon: -87.1921,
            radius_m: 5000.0,
        }
    }

    #[test]
    fn no_fence_always_allows() {
        let p = GeoPoint::new(0.0, 0.0);
        assert_eq!(
            validate(Some(&p), None, CallerRole::Public),
            GeofenceVerdict::Allow
        );
    }

    #[test]
    fn center_point_allows_for_any_positive_radius() {
        for radius in [1.0, 50.0, 5000.0] {
            let mut fence = tegucigalpa_fence();
            fence.radius_m = radius;
            let center = fence.center();
            assert_eq!(
                validate(Some(&center), Some(&fence), CallerRole::Public),
                GeofenceVerdict::Allow
            );
        }
    }

    #[test]
    fn nearby_point_is_inside() {
        let fence = tegucigalpa_fence();
        // ~1.2 km north of the center
        let p = GeoPoint::new(14.0833, -87.1921);
        assert!(haversine_m(&p, &fence.center()) < 5000.0);
        assert_eq!(
            validate(Some(&p), Some(&fence), CallerRole::Public),
            GeofenceVerdict::Allow
        );
    }

    #[test]
    fn public_caller_outside_is_blocked() {
        let fence = tegucigalpa_fence();
        // San Pedro Sula, far outside a 5 km fence
        let p = GeoPoint::new(15.1999, -87.7940);
        assert!(haversine_m(&p, &fence.center()) > 6000.0);
        let v = validate(Some(&p), Some(&fence), CallerRole::Public);
        assert_eq!(v, GeofenceVerdict::Block);
        assert!(v.is_blocked());
        assert_eq!(v.geofence_ok(), None);
    }

    #[test]
    fn admin_caller_outside_is_flagged_not_blocked() {
        let fence = tegucigalpa_fence();
        let p = GeoPoint::new(15.1999, -87.7940);
        let v = validate(Some(&p), Some(&fence), CallerRole::Admin);
        assert_eq!(v, GeofenceVerdict::AllowWithFlag);
        assert_eq!(v.geofence_ok(), Some(false));
    }

    #[test]
    fn missing_coordinates_with_fence_count_as_outside() {
        let fence = tegucigalpa_fence();
        assert_eq!(
            validate(None, Some(&fence), CallerRole::Public),
            GeofenceVerdict::Block
        );
        assert_eq!(
            validate(None, Some(&fence), CallerRole::Admin),
            GeofenceVerdict::AllowWithFlag
        );
    }

    #[test]
    fn haversine_is_symmetric() {
        let a = GeoPoint::new(14.0723, -87.1921);
        let b = GeoPoint::new(15.1999, -87.7940);
        let d1 = haversine_m(&a, &b);
        let d2 = haversine_m(&b, &a);
        assert!((d1 - d2).abs() < 1e-6);
    }
}
