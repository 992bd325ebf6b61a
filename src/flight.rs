use crate::aircraft::AircraftId;
use crate::employee::{CrewRole, EmployeeId};
use crate::error::AirlineError;
use crate::route::RouteId;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Natural key of a flight occurrence: one aircraft cannot depart twice at
/// the same instant.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct FlightKey {
    pub aircraft_id: AircraftId,
    pub dep_date: NaiveDate,
    pub dep_time: NaiveTime,
}

impl FlightKey {
    pub fn departure(&self) -> NaiveDateTime {
        self.dep_date.and_time(self.dep_time)
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.aircraft_id,
            self.dep_date,
            self.dep_time.format("%H:%M")
        )
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum FlightStatus {
    Scheduled,
    FullyBooked,
    Completed,
    Canceled,
}

impl FlightStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, FlightStatus::Completed | FlightStatus::Canceled)
    }

    /// The only legal moves. Completed and Canceled are final, and a
    /// completed flight never regresses to FullyBooked.
    pub fn transition(self, to: FlightStatus) -> Result<FlightStatus, AirlineError> {
        use FlightStatus::*;
        match (self, to) {
            (Scheduled, FullyBooked)
            | (Scheduled, Completed)
            | (Scheduled, Canceled)
            | (FullyBooked, Completed)
            | (FullyBooked, Canceled) => Ok(to),
            _ => Err(AirlineError::IllegalFlightTransition { from: self, to }),
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightStatus::Scheduled => write!(f, "Scheduled"),
            FlightStatus::FullyBooked => write!(f, "FullyBooked"),
            FlightStatus::Completed => write!(f, "Completed"),
            FlightStatus::Canceled => write!(f, "Canceled"),
        }
    }
}

impl FromStr for FlightStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scheduled" => Ok(FlightStatus::Scheduled),
            "fullybooked" | "full" => Ok(FlightStatus::FullyBooked),
            "completed" => Ok(FlightStatus::Completed),
            "canceled" => Ok(FlightStatus::Canceled),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Flight {
    pub key: FlightKey,
    pub route_id: RouteId,
    pub arr_date: NaiveDate,
    pub arr_time: NaiveTime,
    pub economy_price: f64,
    pub business_price: Option<f64>,
    pub status: FlightStatus,
}

impl Flight {
    pub fn departure(&self) -> NaiveDateTime {
        self.key.departure()
    }

    pub fn arrival(&self) -> NaiveDateTime {
        self.arr_date.and_time(self.arr_time)
    }
}

/// Links an employee to one flight occurrence. At most one per
/// (employee, occurrence).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CrewAssignment {
    pub employee_id: EmployeeId,
    pub flight: FlightKey,
    pub role: CrewRole,
}
