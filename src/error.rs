use crate::aircraft::{AircraftId, CabinClass};
use crate::employee::{CrewRole, EmployeeId};
use crate::flight::{FlightKey, FlightStatus};
use crate::order::{OrderId, OrderStatus, Seat};
use crate::route::CityId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AirlineError>;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum AirlineError {
    // not found
    #[error("no route from {origin} to {destination}")]
    NoRoute { origin: CityId, destination: CityId },
    #[error("flight {0} not found")]
    FlightNotFound(FlightKey),
    #[error("order {0} not found")]
    OrderNotFound(OrderId),
    #[error("unknown aircraft {0}")]
    AircraftNotFound(AircraftId),
    #[error("unknown employee {0}")]
    EmployeeNotFound(EmployeeId),

    // validation
    #[error("origin and destination must differ")]
    SameCity,
    #[error("{0} price must be greater than zero")]
    NonPositivePrice(CabinClass),
    #[error("business price is required for large aircraft")]
    BusinessPriceRequired,
    #[error("small aircraft have no business cabin")]
    BusinessPriceNotApplicable,
    #[error("exactly {required} {role}s required, got {supplied}")]
    CrewCountMismatch {
        role: CrewRole,
        required: usize,
        supplied: usize,
    },
    #[error("{0} is not a {1}")]
    RoleMismatch(EmployeeId, CrewRole),
    #[error("an order must contain at least one seat")]
    EmptySeatList,
    #[error("aircraft has no {0} cabin")]
    NoSuchCabin(CabinClass),
    #[error("seat {seat} is outside the {class} cabin")]
    SeatOutOfBounds { seat: Seat, class: CabinClass },
    #[error("invalid cabin layout: {0}")]
    InvalidLayout(String),
    #[error("route duration must be positive")]
    NonPositiveDuration,

    // conflict
    #[error("flight {0} already exists")]
    DuplicateFlight(FlightKey),
    #[error("{employee_id} is already assigned to flight {flight}")]
    DuplicateAssignment {
        employee_id: EmployeeId,
        flight: FlightKey,
    },
    #[error("seat {seat} on flight {flight} is already taken")]
    SeatTaken { flight: FlightKey, seat: Seat },
    #[error("aircraft {0} already exists")]
    DuplicateAircraft(AircraftId),
    #[error("employee {0} already exists")]
    DuplicateEmployee(EmployeeId),

    // state conflict
    #[error("flight {0} is already canceled")]
    AlreadyCanceled(FlightKey),
    #[error("too late to cancel: departure is within {hours} hours")]
    TooLateToCancel { hours: i64 },
    #[error("order {id} is {status}, only active orders can be canceled")]
    OrderNotActive { id: OrderId, status: OrderStatus },
    #[error("order {0} has no tickets")]
    NoTickets(OrderId),
    #[error("illegal flight transition {from} -> {to}")]
    IllegalFlightTransition {
        from: FlightStatus,
        to: FlightStatus,
    },
    #[error("illegal order transition {from} -> {to}")]
    IllegalOrderTransition { from: OrderStatus, to: OrderStatus },

    // unavailable
    #[error("not enough available {role}s: need {required}, found {available}")]
    InsufficientCrew {
        role: CrewRole,
        required: usize,
        available: usize,
    },
}
