use crate::aircraft::{Aircraft, AircraftSize, CabinClass, CabinLayout};
use crate::airline::airline::Airline;
use crate::employee::{Address, CrewRole, Employee, EmployeeId};
use crate::order::Seat;
use crate::route::Route;
use crate::store::Store;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

pub fn dt(d: &str, t: &str) -> NaiveDateTime {
    date(d).and_time(time(t))
}

pub fn seat(row: u32, col: u32) -> Seat {
    Seat { row, col }
}

pub fn layout(class: CabinClass, rows: u32, cols: u32) -> CabinLayout {
    CabinLayout { class, rows, cols }
}

pub fn aircraft(aircraft_id: &str, size: AircraftSize, layouts: Vec<CabinLayout>) -> Aircraft {
    Aircraft {
        id: id(aircraft_id),
        manufacturer: "Boeing".to_string(),
        purchase_date: date("2020-01-01"),
        size,
        layouts,
    }
}

/// Small airframe with a 2x2 economy cabin (4 seats).
pub fn small_aircraft(aircraft_id: &str) -> Aircraft {
    aircraft(
        aircraft_id,
        AircraftSize::Small,
        vec![layout(CabinClass::Economy, 2, 2)],
    )
}

/// Large airframe with 3x3 economy and 2x2 business cabins (13 seats).
pub fn large_aircraft(aircraft_id: &str) -> Aircraft {
    aircraft(
        aircraft_id,
        AircraftSize::Large,
        vec![
            layout(CabinClass::Economy, 3, 3),
            layout(CabinClass::Business, 2, 2),
        ],
    )
}

pub fn route(route_id: &str, origin: &str, destination: &str, hours: f64) -> Route {
    Route {
        id: id(route_id),
        origin: id(origin),
        destination: id(destination),
        duration_hours: hours,
    }
}

pub fn employee(emp_id: &str, role: CrewRole, certified: bool) -> Employee {
    Employee {
        id: id(emp_id),
        full_name: "יעל כהן".to_string(),
        phone: "0521234567".to_string(),
        start_date: date("2021-06-01"),
        role,
        address: Address {
            city: "Haifa".to_string(),
            street: "HaNamal".to_string(),
            house_num: "7".to_string(),
        },
        long_dist_certified: certified,
    }
}

pub fn pilot(emp_id: &str, certified: bool) -> Employee {
    employee(emp_id, CrewRole::Pilot, certified)
}

pub fn attendant(emp_id: &str, certified: bool) -> Employee {
    employee(emp_id, CrewRole::FlightAttendant, certified)
}

pub fn pilot_ids(n: usize) -> Vec<EmployeeId> {
    (1..=n).map(|i| id(&format!("P_{i}"))).collect()
}

pub fn attendant_ids(n: usize) -> Vec<EmployeeId> {
    (1..=n).map(|i| id(&format!("A_{i}"))).collect()
}

/// An airline with the given fleet and routes, staffed with `pilots`
/// certified pilots (P_1..) and `attendants` certified attendants (A_1..).
pub fn staffed_airline(
    fleet: Vec<Aircraft>,
    routes: Vec<Route>,
    pilots: usize,
    attendants: usize,
) -> Airline {
    let mut employees: Vec<Employee> = (1..=pilots)
        .map(|i| pilot(&format!("P_{i}"), true))
        .collect();
    employees.extend((1..=attendants).map(|i| attendant(&format!("A_{i}"), true)));
    Airline::new(Store::new(
        fleet,
        routes,
        employees,
        vec![],
        vec![],
        vec![],
        vec![],
    ))
}
