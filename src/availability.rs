use crate::aircraft::{Aircraft, AircraftSize};
use crate::employee::Employee;
use crate::route::{CityId, LONG_HAUL_HOURS};
use chrono::NaiveDateTime;

/// Everything the store knows about a resource's whereabouts: where and when
/// it last landed (None if it never flew) and the origins of the flights it
/// is already committed to after the proposed departure.
#[derive(Clone, Debug)]
pub struct ResourceSnapshot {
    pub last_landing: Option<(CityId, NaiveDateTime)>,
    pub commitment_origins: Vec<CityId>,
}

/// The proposed flight, from the candidate's point of view.
#[derive(Clone, Debug)]
pub struct AvailabilityContext {
    pub origin: CityId,
    pub departure: NaiveDateTime,
    pub long_haul: bool,
}

impl AvailabilityContext {
    pub fn new(origin: CityId, departure: NaiveDateTime, duration_hours: f64) -> Self {
        AvailabilityContext {
            origin,
            departure,
            long_haul: duration_hours > LONG_HAUL_HOURS,
        }
    }
}

/// Location/time continuity. The candidate must have last landed at the
/// requested origin no later than the requested departure (never having
/// flown counts as anywhere), and every flight it is already committed to
/// must also leave from that origin. This is not an overlap check: it
/// assumes flights are assigned in sequence and relies on continuity alone.
pub fn is_available(snapshot: &ResourceSnapshot, ctx: &AvailabilityContext) -> bool {
    if let Some((location, landed_at)) = &snapshot.last_landing {
        if *location != ctx.origin || *landed_at > ctx.departure {
            return false;
        }
    }
    snapshot
        .commitment_origins
        .iter()
        .all(|origin| *origin == ctx.origin)
}

/// Continuity plus the size rule: small airframes cannot fly long-haul.
pub fn aircraft_available(
    aircraft: &Aircraft,
    snapshot: &ResourceSnapshot,
    ctx: &AvailabilityContext,
) -> bool {
    if aircraft.size == AircraftSize::Small && ctx.long_haul {
        return false;
    }
    is_available(snapshot, ctx)
}

/// Continuity plus certification: long-haul legs need long-distance-trained
/// crew, short legs take anyone.
pub fn crew_available(
    employee: &Employee,
    snapshot: &ResourceSnapshot,
    ctx: &AvailabilityContext,
) -> bool {
    if ctx.long_haul && !employee.long_dist_certified {
        return false;
    }
    is_available(snapshot, ctx)
}
