use crate::aircraft::{Aircraft, AircraftId, AircraftSize, CabinClass};
use crate::availability::{AvailabilityContext, aircraft_available, crew_available};
use crate::employee::{CrewRole, Employee, EmployeeId};
use crate::error::{AirlineError, Result};
use crate::flight::{CrewAssignment, Flight, FlightKey, FlightStatus};
use crate::order::{Order, OrderId, OrderStatus, Seat, Ticket, retained_fee};
use crate::route::{CityId, Route};
use crate::store::Store;
use crate::time::arrival_after;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;
use std::io;
use std::sync::Arc;

/// Flights may only be canceled at least this long before departure.
pub const FLIGHT_CANCEL_WINDOW_HOURS: i64 = 72;

/// Orders may only be canceled strictly more than this long before the
/// earliest linked departure.
pub const ORDER_CANCEL_WINDOW_HOURS: i64 = 36;

#[derive(Clone, Copy, Debug)]
pub struct Pricing {
    pub economy: f64,
    pub business: Option<f64>,
}

/// The operations engine: crew/aircraft allocation, the flight lifecycle
/// and the order book, all over one shared [`Store`]. Every method takes
/// `now`/`today` explicitly; the engine never reads the clock itself.
pub struct Airline {
    pub store: Store,
}

impl Airline {
    pub fn new(store: Store) -> Airline {
        Airline { store }
    }

    pub fn load_from_file(path: &str) -> io::Result<Airline> {
        Ok(Airline::new(Store::load_from_file(path)?))
    }

    // --- allocation ---

    fn compatible_aircraft(&self, ctx: &AvailabilityContext) -> Vec<Aircraft> {
        let mut ids: Vec<&AircraftId> = self.store.aircraft.keys().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| self.store.aircraft.get(id))
            .filter(|a| {
                let snapshot = self.store.aircraft_snapshot(&a.id, ctx.departure);
                aircraft_available(a, &snapshot, ctx)
            })
            .cloned()
            .collect()
    }

    fn qualified_crew(&self, role: CrewRole, ctx: &AvailabilityContext) -> Vec<Employee> {
        let mut ids: Vec<&EmployeeId> = self.store.employees.keys().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| self.store.employees.get(id))
            .filter(|e| e.role == role)
            .filter(|e| {
                let snapshot = self.store.employee_snapshot(&e.id, ctx.departure);
                crew_available(e, &snapshot, ctx)
            })
            .cloned()
            .collect()
    }

    /// Bulk exploration: every aircraft that could fly the route with the
    /// crew pools computed once up front. The first-N crew picks are
    /// advisory only; the same person may back several candidate aircraft
    /// and nothing here is committed.
    pub fn find_available_resources(
        &self,
        origin: &str,
        destination: &str,
        dep_date: NaiveDate,
        dep_time: NaiveTime,
    ) -> (Vec<Aircraft>, Vec<Employee>, Vec<Employee>) {
        let Some(route) = self.store.route_between(origin, destination) else {
            return (vec![], vec![], vec![]);
        };
        let ctx = AvailabilityContext::new(
            route.origin.clone(),
            dep_date.and_time(dep_time),
            route.duration_hours,
        );

        let pilots = self.qualified_crew(CrewRole::Pilot, &ctx);
        let attendants = self.qualified_crew(CrewRole::FlightAttendant, &ctx);

        let mut feasible = Vec::new();
        let mut selected_pilots = Vec::new();
        let mut selected_attendants = Vec::new();
        for aircraft in self.compatible_aircraft(&ctx) {
            let need_pilots = aircraft.size.required_pilots();
            let need_attendants = aircraft.size.required_attendants();
            if pilots.len() >= need_pilots && attendants.len() >= need_attendants {
                selected_pilots.extend(pilots[..need_pilots].iter().cloned());
                selected_attendants.extend(attendants[..need_attendants].iter().cloned());
                feasible.push(aircraft);
            }
        }
        (feasible, selected_pilots, selected_attendants)
    }

    /// Guided mode, step one: aircraft that can fly this concrete leg.
    pub fn find_compatible_aircraft(
        &self,
        origin: &str,
        destination: &str,
        dep_date: NaiveDate,
        dep_time: NaiveTime,
    ) -> Result<Vec<Aircraft>> {
        let route = self
            .store
            .route_between(origin, destination)
            .ok_or_else(|| AirlineError::NoRoute {
                origin: Arc::from(origin),
                destination: Arc::from(destination),
            })?;
        let ctx = AvailabilityContext::new(
            route.origin.clone(),
            dep_date.and_time(dep_time),
            route.duration_hours,
        );
        Ok(self.compatible_aircraft(&ctx))
    }

    /// Guided mode, step two: the crew of one role free to work the leg.
    pub fn find_available_crew(
        &self,
        origin: &str,
        dep_date: NaiveDate,
        dep_time: NaiveTime,
        long_haul: bool,
        role: CrewRole,
    ) -> Vec<Employee> {
        let ctx = AvailabilityContext {
            origin: Arc::from(origin),
            departure: dep_date.and_time(dep_time),
            long_haul,
        };
        self.qualified_crew(role, &ctx)
    }

    /// Both crew pools for one chosen aircraft, failing when a pool cannot
    /// cover the complement.
    pub fn crew_pool_for(
        &self,
        aircraft_id: &str,
        origin: &str,
        destination: &str,
        dep_date: NaiveDate,
        dep_time: NaiveTime,
    ) -> Result<(Vec<Employee>, Vec<Employee>)> {
        let aircraft = self
            .store
            .aircraft
            .get(aircraft_id)
            .ok_or_else(|| AirlineError::AircraftNotFound(Arc::from(aircraft_id)))?;
        let route = self
            .store
            .route_between(origin, destination)
            .ok_or_else(|| AirlineError::NoRoute {
                origin: Arc::from(origin),
                destination: Arc::from(destination),
            })?;
        let long_haul = route.is_long_haul();
        let pilots = self.find_available_crew(origin, dep_date, dep_time, long_haul, CrewRole::Pilot);
        let attendants =
            self.find_available_crew(origin, dep_date, dep_time, long_haul, CrewRole::FlightAttendant);
        if pilots.len() < aircraft.size.required_pilots() {
            return Err(AirlineError::InsufficientCrew {
                role: CrewRole::Pilot,
                required: aircraft.size.required_pilots(),
                available: pilots.len(),
            });
        }
        if attendants.len() < aircraft.size.required_attendants() {
            return Err(AirlineError::InsufficientCrew {
                role: CrewRole::FlightAttendant,
                required: aircraft.size.required_attendants(),
                available: attendants.len(),
            });
        }
        Ok((pilots, attendants))
    }

    // --- flight lifecycle ---

    pub fn create_flight(
        &mut self,
        aircraft_id: &str,
        origin: &str,
        destination: &str,
        dep_date: NaiveDate,
        dep_time: NaiveTime,
        economy_price: f64,
        business_price: Option<f64>,
        pilot_ids: &[EmployeeId],
        attendant_ids: &[EmployeeId],
    ) -> Result<FlightKey> {
        if origin == destination {
            return Err(AirlineError::SameCity);
        }
        let aircraft = self
            .store
            .aircraft
            .get(aircraft_id)
            .ok_or_else(|| AirlineError::AircraftNotFound(Arc::from(aircraft_id)))?;
        let (aircraft_id, size) = (aircraft.id.clone(), aircraft.size);
        let route = self
            .store
            .route_between(origin, destination)
            .ok_or_else(|| AirlineError::NoRoute {
                origin: Arc::from(origin),
                destination: Arc::from(destination),
            })?;
        let (route_id, duration_hours) = (route.id.clone(), route.duration_hours);

        if economy_price <= 0.0 {
            return Err(AirlineError::NonPositivePrice(CabinClass::Economy));
        }
        match (size, business_price) {
            (AircraftSize::Large, None) => return Err(AirlineError::BusinessPriceRequired),
            (AircraftSize::Large, Some(p)) if p <= 0.0 => {
                return Err(AirlineError::NonPositivePrice(CabinClass::Business));
            }
            (AircraftSize::Small, Some(_)) => {
                return Err(AirlineError::BusinessPriceNotApplicable);
            }
            _ => {}
        }

        self.check_crew(pilot_ids, CrewRole::Pilot, size.required_pilots())?;
        self.check_crew(attendant_ids, CrewRole::FlightAttendant, size.required_attendants())?;

        let departure = dep_date.and_time(dep_time);
        let arrival = arrival_after(departure, duration_hours);
        let key = FlightKey {
            aircraft_id,
            dep_date,
            dep_time,
        };
        let flight = Flight {
            key: key.clone(),
            route_id,
            arr_date: arrival.date(),
            arr_time: arrival.time(),
            economy_price,
            business_price,
            status: FlightStatus::Scheduled,
        };
        let crew = pilot_ids
            .iter()
            .map(|id| (id, CrewRole::Pilot))
            .chain(attendant_ids.iter().map(|id| (id, CrewRole::FlightAttendant)))
            .map(|(id, role)| CrewAssignment {
                employee_id: id.clone(),
                flight: key.clone(),
                role,
            })
            .collect();
        self.store.insert_flight(flight, crew)?;
        Ok(key)
    }

    fn check_crew(&self, ids: &[EmployeeId], role: CrewRole, required: usize) -> Result<()> {
        if ids.len() != required {
            return Err(AirlineError::CrewCountMismatch {
                role,
                required,
                supplied: ids.len(),
            });
        }
        for id in ids {
            let employee = self
                .store
                .employees
                .get(id)
                .ok_or_else(|| AirlineError::EmployeeNotFound(id.clone()))?;
            if employee.role != role {
                return Err(AirlineError::RoleMismatch(id.clone(), role));
            }
        }
        Ok(())
    }

    /// Cancels one flight and force-cancels every order ticketed on it with
    /// a full refund. Only allowed while departure is at least 72 hours out.
    pub fn cancel_flight(
        &mut self,
        aircraft_id: &str,
        dep_date: NaiveDate,
        dep_time: NaiveTime,
        origin: &str,
        destination: &str,
        now: NaiveDateTime,
    ) -> Result<FlightKey> {
        let key = FlightKey {
            aircraft_id: Arc::from(aircraft_id),
            dep_date,
            dep_time,
        };
        let flight = self
            .store
            .flights
            .get(&key)
            .ok_or_else(|| AirlineError::FlightNotFound(key.clone()))?;
        let on_route = self
            .store
            .route_by_id(&flight.route_id)
            .is_some_and(|r| &*r.origin == origin && &*r.destination == destination);
        if !on_route {
            return Err(AirlineError::FlightNotFound(key));
        }
        if flight.status == FlightStatus::Canceled {
            return Err(AirlineError::AlreadyCanceled(key));
        }
        if flight.departure() - now < Duration::hours(FLIGHT_CANCEL_WINDOW_HOURS) {
            return Err(AirlineError::TooLateToCancel {
                hours: FLIGHT_CANCEL_WINDOW_HOURS,
            });
        }
        let next = flight.status.transition(FlightStatus::Canceled)?;

        let affected = self.store.orders_on_flight(&key);
        if let Some(flight) = self.store.flights.get_mut(&key) {
            flight.status = next;
        }
        for order_id in affected {
            if let Some(order) = self.store.orders.get_mut(&order_id) {
                if order.status != OrderStatus::SystemCanceled {
                    order.status = OrderStatus::SystemCanceled;
                    order.total_paid = 0.0;
                }
            }
        }
        Ok(key)
    }

    /// Walks every open flight and order forward. Landings are applied
    /// before the capacity check so a full flight past its arrival ends up
    /// Completed, never back at FullyBooked. Safe to call repeatedly.
    pub fn refresh_statuses(&mut self, now: NaiveDateTime) {
        let landed: Vec<FlightKey> = self
            .store
            .flights
            .values()
            .filter(|f| !f.status.is_terminal())
            .filter(|f| now >= f.arrival())
            .map(|f| f.key.clone())
            .collect();
        for key in landed {
            if let Some(flight) = self.store.flights.get_mut(&key) {
                if let Ok(next) = flight.status.transition(FlightStatus::Completed) {
                    flight.status = next;
                }
            }
        }

        let full: Vec<FlightKey> = self
            .store
            .flights
            .values()
            .filter(|f| f.status == FlightStatus::Scheduled)
            .filter(|f| {
                let capacity = self
                    .store
                    .aircraft
                    .get(&f.key.aircraft_id)
                    .map(Aircraft::capacity)
                    .unwrap_or(0);
                capacity > 0 && self.store.active_ticket_count(&f.key) as u32 == capacity
            })
            .map(|f| f.key.clone())
            .collect();
        for key in full {
            if let Some(flight) = self.store.flights.get_mut(&key) {
                if let Ok(next) = flight.status.transition(FlightStatus::FullyBooked) {
                    flight.status = next;
                }
            }
        }

        let done: Vec<OrderId> = self
            .store
            .orders
            .values()
            .filter(|o| o.status == OrderStatus::Active)
            .filter(|o| {
                let tickets = self.store.tickets_of_order(o.id);
                !tickets.is_empty()
                    && tickets.iter().all(|t| {
                        self.store
                            .flights
                            .get(&t.flight)
                            .is_some_and(|f| f.status == FlightStatus::Completed)
                    })
            })
            .map(|o| o.id)
            .collect();
        for order_id in done {
            if let Some(order) = self.store.orders.get_mut(&order_id) {
                if let Ok(next) = order.status.transition(OrderStatus::Completed) {
                    order.status = next;
                }
            }
        }
    }

    // --- orders ---

    /// Books seats on one flight occurrence as a single order. Seat
    /// collisions with other active orders reject the whole booking.
    pub fn create_order(
        &mut self,
        email: &str,
        flight: &FlightKey,
        economy_seats: &[Seat],
        business_seats: &[Seat],
        pricing: Pricing,
        today: NaiveDate,
    ) -> Result<OrderId> {
        let flight_rec = self
            .store
            .flights
            .get(flight)
            .ok_or_else(|| AirlineError::FlightNotFound(flight.clone()))?;
        let aircraft = self
            .store
            .aircraft
            .get(&flight_rec.key.aircraft_id)
            .ok_or_else(|| AirlineError::AircraftNotFound(flight_rec.key.aircraft_id.clone()))?;

        if economy_seats.is_empty() && business_seats.is_empty() {
            return Err(AirlineError::EmptySeatList);
        }
        Self::check_seats(aircraft, CabinClass::Economy, economy_seats)?;
        Self::check_seats(aircraft, CabinClass::Business, business_seats)?;

        if pricing.economy <= 0.0 {
            return Err(AirlineError::NonPositivePrice(CabinClass::Economy));
        }
        let business_each = match (business_seats.is_empty(), pricing.business) {
            (true, _) => 0.0,
            (false, None) => return Err(AirlineError::BusinessPriceRequired),
            (false, Some(p)) if p <= 0.0 => {
                return Err(AirlineError::NonPositivePrice(CabinClass::Business));
            }
            (false, Some(p)) => p,
        };

        let total = economy_seats.len() as f64 * pricing.economy
            + business_seats.len() as f64 * business_each;
        let id = self.store.next_order_id();
        let order = Order {
            id,
            email: email.to_string(),
            created: today,
            status: OrderStatus::Active,
            total_paid: total,
        };
        let tickets = economy_seats
            .iter()
            .map(|seat| (*seat, pricing.economy))
            .chain(business_seats.iter().map(|seat| (*seat, business_each)))
            .map(|(seat, price)| Ticket {
                order_id: id,
                flight: flight.clone(),
                seat,
                price,
            })
            .collect();
        self.store.insert_order(order, tickets)
    }

    fn check_seats(aircraft: &Aircraft, class: CabinClass, seats: &[Seat]) -> Result<()> {
        if seats.is_empty() {
            return Ok(());
        }
        let layout = aircraft
            .layout(class)
            .ok_or(AirlineError::NoSuchCabin(class))?;
        for seat in seats {
            if !layout.contains(*seat) {
                return Err(AirlineError::SeatOutOfBounds { seat: *seat, class });
            }
        }
        Ok(())
    }

    /// Customer-initiated cancellation: allowed strictly more than 36 hours
    /// before the earliest linked departure, retaining a 5% fee.
    pub fn cancel_order(&mut self, order_id: OrderId, email: &str, now: NaiveDateTime) -> Result<f64> {
        let order = self
            .store
            .orders
            .get(&order_id)
            .filter(|o| o.email == email)
            .ok_or(AirlineError::OrderNotFound(order_id))?;
        if order.status.is_terminal() {
            return Err(AirlineError::OrderNotActive {
                id: order_id,
                status: order.status,
            });
        }
        let tickets = self.store.tickets_of_order(order_id);
        let earliest = tickets
            .iter()
            .map(|t| t.flight.departure())
            .min()
            .ok_or(AirlineError::NoTickets(order_id))?;
        if earliest - now <= Duration::hours(ORDER_CANCEL_WINDOW_HOURS) {
            return Err(AirlineError::TooLateToCancel {
                hours: ORDER_CANCEL_WINDOW_HOURS,
            });
        }
        let next = order.status.transition(OrderStatus::CustomerCanceled)?;
        let retained = retained_fee(order.total_paid);
        if let Some(order) = self.store.orders.get_mut(&order_id) {
            order.status = next;
            order.total_paid = retained;
        }
        Ok(retained)
    }

    pub fn taken_seats(&self, flight: &FlightKey) -> BTreeSet<Seat> {
        self.store.taken_seats(flight)
    }

    // --- fleet, crew and catalog management ---

    pub fn add_aircraft(&mut self, aircraft: Aircraft) -> Result<()> {
        self.store.add_aircraft(aircraft)
    }

    pub fn add_employee(&mut self, employee: Employee) -> Result<()> {
        self.store.add_employee(employee)
    }

    pub fn add_route(&mut self, route: Route) -> Result<()> {
        self.store.add_route(route)
    }

    pub fn origins(&self) -> Vec<CityId> {
        self.store.origins()
    }

    pub fn destinations(&self) -> Vec<CityId> {
        self.store.destinations()
    }

    /// Flight board for the console, with optional filters.
    pub fn flights_filtered(
        &self,
        date: Option<NaiveDate>,
        origin: Option<&str>,
        destination: Option<&str>,
        status: Option<FlightStatus>,
    ) -> Vec<(&Flight, &Route)> {
        let mut rows: Vec<(&Flight, &Route)> = self
            .store
            .flights
            .values()
            .filter_map(|f| self.store.route_by_id(&f.route_id).map(|r| (f, r)))
            .filter(|(f, _)| date.is_none_or(|d| f.key.dep_date == d))
            .filter(|(_, r)| origin.is_none_or(|o| &*r.origin == o))
            .filter(|(_, r)| destination.is_none_or(|d| &*r.destination == d))
            .filter(|(f, _)| status.is_none_or(|s| f.status == s))
            .collect();
        rows.sort_by_key(|(f, _)| (f.departure(), f.key.aircraft_id.clone()));
        rows
    }
}
