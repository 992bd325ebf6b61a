use crate::aircraft::{Aircraft, AircraftId, AircraftSize, CabinClass};
use crate::availability::ResourceSnapshot;
use crate::employee::{Employee, EmployeeId};
use crate::error::{AirlineError, Result};
use crate::flight::{CrewAssignment, Flight, FlightKey, FlightStatus};
use crate::order::{Order, OrderId, OrderStatus, Seat, Ticket};
use crate::route::{CityId, Route};
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::io;

/// The shared record store. Writes validate every constraint up front and
/// only then mutate, so a failed operation leaves no partial state behind.
#[derive(Default)]
pub struct Store {
    pub aircraft: HashMap<AircraftId, Aircraft>,
    pub routes: Vec<Route>,
    pub employees: HashMap<EmployeeId, Employee>,
    pub flights: HashMap<FlightKey, Flight>,
    pub assignments: Vec<CrewAssignment>,
    pub orders: HashMap<OrderId, Order>,
    pub tickets: Vec<Ticket>,
    next_order_id: OrderId,
}

impl Store {
    pub fn new(
        aircraft: Vec<Aircraft>,
        routes: Vec<Route>,
        employees: Vec<Employee>,
        flights: Vec<Flight>,
        assignments: Vec<CrewAssignment>,
        orders: Vec<Order>,
        tickets: Vec<Ticket>,
    ) -> Store {
        let next_order_id = orders.iter().map(|o| o.id + 1).max().unwrap_or(1);
        Store {
            aircraft: aircraft.into_iter().map(|a| (a.id.clone(), a)).collect(),
            routes,
            employees: employees.into_iter().map(|e| (e.id.clone(), e)).collect(),
            flights: flights.into_iter().map(|f| (f.key.clone(), f)).collect(),
            assignments,
            orders: orders.into_iter().map(|o| (o.id, o)).collect(),
            tickets,
            next_order_id,
        }
    }

    pub fn load_from_file(path: &str) -> io::Result<Self> {
        let data = std::fs::read_to_string(path)?;
        #[derive(Deserialize)]
        struct RawData {
            aircraft: Vec<Aircraft>,
            routes: Vec<Route>,
            employees: Vec<Employee>,
            #[serde(default)]
            flights: Vec<Flight>,
            #[serde(default)]
            assignments: Vec<CrewAssignment>,
            #[serde(default)]
            orders: Vec<Order>,
            #[serde(default)]
            tickets: Vec<Ticket>,
        }
        let raw: RawData = serde_json::from_str(&data)?;

        Ok(Store::new(
            raw.aircraft,
            raw.routes,
            raw.employees,
            raw.flights,
            raw.assignments,
            raw.orders,
            raw.tickets,
        ))
    }

    // --- routes ---

    pub fn route_between(&self, origin: &str, destination: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| &*r.origin == origin && &*r.destination == destination)
    }

    pub fn route_by_id(&self, id: &str) -> Option<&Route> {
        self.routes.iter().find(|r| &*r.id == id)
    }

    pub fn origins(&self) -> Vec<CityId> {
        let set: BTreeSet<CityId> = self.routes.iter().map(|r| r.origin.clone()).collect();
        set.into_iter().collect()
    }

    pub fn destinations(&self) -> Vec<CityId> {
        let set: BTreeSet<CityId> = self.routes.iter().map(|r| r.destination.clone()).collect();
        set.into_iter().collect()
    }

    fn route_of(&self, flight: &Flight) -> Option<&Route> {
        self.route_by_id(&flight.route_id)
    }

    // --- resource query layer ---

    fn last_landing<'a>(
        &self,
        flights: impl Iterator<Item = &'a Flight>,
    ) -> Option<(CityId, NaiveDateTime)> {
        flights
            .filter(|f| f.status != FlightStatus::Canceled)
            .filter_map(|f| self.route_of(f).map(|r| (r.destination.clone(), f.arrival())))
            .max_by_key(|(_, at)| *at)
    }

    fn commitments<'a>(
        &self,
        flights: impl Iterator<Item = &'a Flight>,
        after: NaiveDateTime,
    ) -> Vec<CityId> {
        flights
            .filter(|f| f.status != FlightStatus::Canceled)
            .filter(|f| f.departure() > after)
            .filter_map(|f| self.route_of(f).map(|r| r.origin.clone()))
            .collect()
    }

    fn flights_of_aircraft(&self, aircraft_id: &str) -> impl Iterator<Item = &Flight> {
        self.flights
            .values()
            .filter(move |f| &*f.key.aircraft_id == aircraft_id)
    }

    fn flights_of_employee(&self, employee_id: &str) -> impl Iterator<Item = &Flight> {
        self.assignments
            .iter()
            .filter(move |a| &*a.employee_id == employee_id)
            .filter_map(|a| self.flights.get(&a.flight))
    }

    /// Where the aircraft will be standing right before `departure`.
    pub fn aircraft_snapshot(&self, aircraft_id: &str, departure: NaiveDateTime) -> ResourceSnapshot {
        ResourceSnapshot {
            last_landing: self.last_landing(self.flights_of_aircraft(aircraft_id)),
            commitment_origins: self.commitments(self.flights_of_aircraft(aircraft_id), departure),
        }
    }

    pub fn employee_snapshot(&self, employee_id: &str, departure: NaiveDateTime) -> ResourceSnapshot {
        ResourceSnapshot {
            last_landing: self.last_landing(self.flights_of_employee(employee_id)),
            commitment_origins: self.commitments(self.flights_of_employee(employee_id), departure),
        }
    }

    // --- seats and tickets ---

    /// Seats held by tickets of active orders. Canceled and completed orders
    /// do not occupy seats.
    pub fn taken_seats(&self, flight: &FlightKey) -> BTreeSet<Seat> {
        self.tickets
            .iter()
            .filter(|t| t.flight == *flight)
            .filter(|t| {
                self.orders
                    .get(&t.order_id)
                    .is_some_and(|o| o.status == OrderStatus::Active)
            })
            .map(|t| t.seat)
            .collect()
    }

    pub fn active_ticket_count(&self, flight: &FlightKey) -> usize {
        self.taken_seats(flight).len()
    }

    pub fn tickets_of_order(&self, order_id: OrderId) -> Vec<&Ticket> {
        self.tickets
            .iter()
            .filter(|t| t.order_id == order_id)
            .collect()
    }

    /// Ids of orders holding at least one ticket on the flight.
    pub fn orders_on_flight(&self, flight: &FlightKey) -> Vec<OrderId> {
        let ids: BTreeSet<OrderId> = self
            .tickets
            .iter()
            .filter(|t| t.flight == *flight)
            .map(|t| t.order_id)
            .collect();
        ids.into_iter().collect()
    }

    // --- constraint-checked writes ---

    pub fn add_aircraft(&mut self, aircraft: Aircraft) -> Result<()> {
        if self.aircraft.contains_key(&aircraft.id) {
            return Err(AirlineError::DuplicateAircraft(aircraft.id));
        }
        let mut classes = HashSet::new();
        for layout in &aircraft.layouts {
            if !classes.insert(layout.class) {
                return Err(AirlineError::InvalidLayout(format!(
                    "more than one {} layout",
                    layout.class
                )));
            }
            if layout.rows == 0 || layout.cols == 0 {
                return Err(AirlineError::InvalidLayout(format!(
                    "{} grid must have rows and columns",
                    layout.class
                )));
            }
            if layout.class == CabinClass::Business && aircraft.size == AircraftSize::Small {
                return Err(AirlineError::InvalidLayout(
                    "business cabin on a small aircraft".to_string(),
                ));
            }
        }
        self.aircraft.insert(aircraft.id.clone(), aircraft);
        Ok(())
    }

    pub fn add_employee(&mut self, employee: Employee) -> Result<()> {
        if self.employees.contains_key(&employee.id) {
            return Err(AirlineError::DuplicateEmployee(employee.id));
        }
        self.employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    pub fn add_route(&mut self, route: Route) -> Result<()> {
        if route.duration_hours <= 0.0 {
            return Err(AirlineError::NonPositiveDuration);
        }
        self.routes.push(route);
        Ok(())
    }

    /// Persists a flight with its crew as one unit. Nothing is written
    /// unless every check passes.
    pub fn insert_flight(&mut self, flight: Flight, crew: Vec<CrewAssignment>) -> Result<()> {
        if self.flights.contains_key(&flight.key) {
            return Err(AirlineError::DuplicateFlight(flight.key));
        }
        let mut seen = HashSet::new();
        for assignment in &crew {
            if !self.employees.contains_key(&assignment.employee_id) {
                return Err(AirlineError::EmployeeNotFound(assignment.employee_id.clone()));
            }
            let duplicate_in_batch = !seen.insert(assignment.employee_id.clone());
            let duplicate_existing = self
                .assignments
                .iter()
                .any(|a| a.employee_id == assignment.employee_id && a.flight == assignment.flight);
            if duplicate_in_batch || duplicate_existing {
                return Err(AirlineError::DuplicateAssignment {
                    employee_id: assignment.employee_id.clone(),
                    flight: assignment.flight.clone(),
                });
            }
        }
        self.flights.insert(flight.key.clone(), flight);
        self.assignments.extend(crew);
        Ok(())
    }

    /// Persists an order with its tickets as one unit. Seat collisions with
    /// active orders, or within the batch, reject the whole order.
    pub fn insert_order(&mut self, order: Order, tickets: Vec<Ticket>) -> Result<OrderId> {
        let mut claimed: HashMap<&FlightKey, BTreeSet<Seat>> = HashMap::new();
        for ticket in &tickets {
            let taken = claimed
                .entry(&ticket.flight)
                .or_insert_with(|| self.taken_seats(&ticket.flight));
            if !taken.insert(ticket.seat) {
                return Err(AirlineError::SeatTaken {
                    flight: ticket.flight.clone(),
                    seat: ticket.seat,
                });
            }
        }
        let id = order.id;
        self.orders.insert(id, order);
        self.tickets.extend(tickets);
        Ok(id)
    }

    pub fn next_order_id(&mut self) -> OrderId {
        let id = self.next_order_id;
        self.next_order_id += 1;
        id
    }
}
