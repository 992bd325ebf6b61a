use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub type EmployeeId = Arc<str>;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum CrewRole {
    Pilot,
    FlightAttendant,
}

impl fmt::Display for CrewRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrewRole::Pilot => write!(f, "pilot"),
            CrewRole::FlightAttendant => write!(f, "attendant"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub city: String,
    pub street: String,
    pub house_num: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub phone: String,
    pub start_date: NaiveDate,
    pub role: CrewRole,
    pub address: Address,
    pub long_dist_certified: bool,
}
