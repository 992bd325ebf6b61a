use crate::aircraft::{Aircraft, AircraftSize, CabinClass, CabinLayout};
use crate::airline::airline::{Airline, Pricing};
use crate::employee::{Address, CrewRole, Employee};
use crate::flight::{Flight, FlightKey, FlightStatus};
use crate::order::Seat;
use crate::route::Route;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use clap::Parser;
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::{Context, Editor, Helper, Highlighter, Hinter, Validator};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::Arc;
use tabled::settings::Style;
use tabled::Tabled;

mod aircraft;
mod airline;
mod availability;
mod employee;
mod error;
mod flight;
mod order;
mod route;
mod store;
mod time;

#[derive(Parser)]
struct Args {
    /// Path to the JSON scenario file
    #[arg(short, long, value_name = "FILE", default_value = "data/default.json")]
    scenario: PathBuf,
}

#[derive(Helper, Hinter, Highlighter, Validator)]
pub struct CompleteHelper {
    pub commands: Vec<String>,
}

impl Completer for CompleteHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let mut candidates = Vec::new();

        for cmd in &self.commands {
            if cmd.starts_with(line) {
                candidates.push(Pair {
                    display: cmd.clone(),
                    replacement: format!("{} ", cmd),
                });
            }
        }

        Ok((0, candidates))
    }
}

fn paginate(content: String) {
    let mut pager = Command::new("less")
        .arg("-R")
        .stdin(Stdio::piped())
        .spawn()
        // Fallback to 'more' if 'less' isn't available
        .or_else(|_| Command::new("more").stdin(Stdio::piped()).spawn())
        .expect("Failed to spawn pager");

    let mut stdin = pager.stdin.take().expect("Failed to open stdin for pager");

    if let Err(e) = stdin.write_all(content.as_bytes()) {
        // Broken pipe is common if the user quits the pager early
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            eprintln!("Error writing to pager: {}", e);
        }
    }

    // Wait for the user to close the pager before returning to the ">> " prompt
    let _ = pager.wait();
}

fn show_table<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        println!("Nothing to show.");
        return;
    }
    let mut table = tabled::Table::new(rows);
    table.with(Style::rounded());
    table.with(tabled::settings::Alignment::left());
    if rows.len() > 20 {
        paginate(table.to_string());
    } else {
        println!("{}", table);
    }
}

#[derive(Tabled)]
struct FlightRow {
    aircraft: String,
    date: String,
    dep: String,
    from: String,
    to: String,
    arr: String,
    status: String,
    economy: String,
    business: String,
}

impl FlightRow {
    fn new(flight: &Flight, route: &Route) -> FlightRow {
        FlightRow {
            aircraft: flight.key.aircraft_id.to_string(),
            date: flight.key.dep_date.to_string(),
            dep: flight.key.dep_time.format("%H:%M").to_string(),
            from: route.origin.to_string(),
            to: route.destination.to_string(),
            arr: format!("{} {}", flight.arr_date, flight.arr_time.format("%H:%M")),
            status: flight.status.to_string(),
            economy: format!("{:.2}", flight.economy_price),
            business: flight
                .business_price
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "-".to_string()),
        }
    }
}

#[derive(Tabled)]
struct AircraftRow {
    id: String,
    manufacturer: String,
    size: String,
    purchased: String,
    seats: u32,
    cabins: String,
}

impl AircraftRow {
    fn new(aircraft: &Aircraft) -> AircraftRow {
        let cabins = aircraft
            .layouts
            .iter()
            .map(|l| format!("{} {}x{}", l.class, l.rows, l.cols))
            .collect::<Vec<_>>()
            .join(", ");
        AircraftRow {
            id: aircraft.id.to_string(),
            manufacturer: aircraft.manufacturer.clone(),
            size: aircraft.size.to_string(),
            purchased: aircraft.purchase_date.to_string(),
            seats: aircraft.capacity(),
            cabins,
        }
    }
}

#[derive(Tabled)]
struct EmployeeRow {
    id: String,
    name: String,
    role: String,
    phone: String,
    started: String,
    long_haul: String,
}

impl EmployeeRow {
    fn new(employee: &Employee) -> EmployeeRow {
        EmployeeRow {
            id: employee.id.to_string(),
            name: employee.full_name.clone(),
            role: employee.role.to_string(),
            phone: employee.phone.clone(),
            started: employee.start_date.to_string(),
            long_haul: if employee.long_dist_certified { "yes" } else { "no" }.to_string(),
        }
    }
}

#[derive(Tabled)]
struct RouteRow {
    id: String,
    from: String,
    to: String,
    hours: f64,
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    time::parse_time_of_day(s)
}

/// `1:2,3:1` -> seats; `-` -> none.
fn parse_seats(s: &str) -> Option<Vec<Seat>> {
    if s == "-" {
        return Some(vec![]);
    }
    s.split(',').map(|part| part.parse().ok()).collect()
}

fn parse_ids(s: &str) -> Vec<Arc<str>> {
    if s == "-" {
        return vec![];
    }
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(Arc::from)
        .collect()
}

/// `3x3` -> cabin grid.
fn parse_grid(s: &str, class: CabinClass) -> Option<CabinLayout> {
    let (rows, cols) = s.split_once('x')?;
    Some(CabinLayout {
        class,
        rows: rows.parse().ok()?,
        cols: cols.parse().ok()?,
    })
}

fn ok(message: String) {
    println!("{}", message.as_str().green());
}

fn fail(message: String) {
    println!("{}", message.as_str().red());
}

fn flight_board(airline: &Airline, filters: &[&str]) {
    let mut date = None;
    let mut origin = None;
    let mut destination = None;
    let mut status = None;
    for filter in filters {
        match filter.split_once('=') {
            Some(("date", v)) => date = parse_date(v),
            Some(("from", v)) => origin = Some(v),
            Some(("to", v)) => destination = Some(v),
            Some(("status", v)) => status = v.parse::<FlightStatus>().ok(),
            _ => {
                fail(format!("Unknown filter: {}", filter));
                return;
            }
        }
    }
    let rows: Vec<FlightRow> = airline
        .flights_filtered(date, origin, destination, status)
        .into_iter()
        .map(|(f, r)| FlightRow::new(f, r))
        .collect();
    show_table(&rows);
}

fn resources(airline: &Airline, parts: &[&str]) {
    let (Some(from), Some(to), Some(date), Some(time)) = (
        parts.first(),
        parts.get(1),
        parts.get(2).and_then(|s| parse_date(s)),
        parts.get(3).and_then(|s| parse_time(s)),
    ) else {
        fail("Usage: resources <from> <to> <YYYY-MM-DD> <HH:MM>".to_string());
        return;
    };
    let (aircraft, pilots, attendants) = airline.find_available_resources(from, to, date, time);
    if aircraft.is_empty() {
        println!("No aircraft can fly {} -> {} at that time.", from, to);
        return;
    }
    println!("Feasible aircraft:");
    show_table(&aircraft.iter().map(AircraftRow::new).collect::<Vec<_>>());
    println!("Advisory pilot picks (first of the pool per aircraft):");
    show_table(&pilots.iter().map(EmployeeRow::new).collect::<Vec<_>>());
    println!("Advisory attendant picks:");
    show_table(&attendants.iter().map(EmployeeRow::new).collect::<Vec<_>>());
}

fn schedule_flight(airline: &mut Airline, parts: &[&str]) {
    let (
        Some(aircraft_id),
        Some(from),
        Some(to),
        Some(date),
        Some(time),
        Some(economy),
        Some(business),
        Some(pilots),
        Some(attendants),
    ) = (
        parts.first(),
        parts.get(1),
        parts.get(2),
        parts.get(3).and_then(|s| parse_date(s)),
        parts.get(4).and_then(|s| parse_time(s)),
        parts.get(5).and_then(|s| s.parse::<f64>().ok()),
        parts.get(6),
        parts.get(7),
        parts.get(8),
    )
    else {
        fail(
            "Usage: schedule <aircraft> <from> <to> <YYYY-MM-DD> <HH:MM> <econ> <bus|-> <p1,p2,..> <a1,a2,..>"
                .to_string(),
        );
        return;
    };
    let business = if *business == "-" {
        None
    } else {
        match business.parse::<f64>() {
            Ok(p) => Some(p),
            Err(_) => {
                fail(format!("Bad business price: {}", business));
                return;
            }
        }
    };
    match airline.create_flight(
        aircraft_id,
        from,
        to,
        date,
        time,
        economy,
        business,
        &parse_ids(pilots),
        &parse_ids(attendants),
    ) {
        Ok(key) => ok(format!("Scheduled flight {}.", key)),
        Err(e) => fail(format!("Cannot schedule: {}", e)),
    }
}

fn book(airline: &mut Airline, parts: &[&str], today: NaiveDate) {
    let (Some(email), Some(aircraft_id), Some(date), Some(time), Some(econ), Some(bus)) = (
        parts.first(),
        parts.get(1),
        parts.get(2).and_then(|s| parse_date(s)),
        parts.get(3).and_then(|s| parse_time(s)),
        parts.get(4).and_then(|s| parse_seats(s)),
        parts.get(5).and_then(|s| parse_seats(s)),
    ) else {
        fail("Usage: book <email> <aircraft> <YYYY-MM-DD> <HH:MM> <econ r:c,..|-> <bus r:c,..|->".to_string());
        return;
    };
    let key = FlightKey {
        aircraft_id: Arc::from(*aircraft_id),
        dep_date: date,
        dep_time: time,
    };
    let Some(flight) = airline.store.flights.get(&key) else {
        fail(format!("Flight {} not found.", key));
        return;
    };
    let pricing = Pricing {
        economy: flight.economy_price,
        business: flight.business_price,
    };
    match airline.create_order(email, &key, &econ, &bus, pricing, today) {
        Ok(id) => ok(format!("Order {} confirmed.", id)),
        Err(e) => fail(format!("Cannot book: {}", e)),
    }
}

fn hire(airline: &mut Airline, parts: &[&str]) {
    let (
        Some(role),
        Some(id),
        Some(name),
        Some(phone),
        Some(start),
        Some(certified),
        Some(city),
        Some(street),
        Some(house),
    ) = (
        parts.first(),
        parts.get(1),
        parts.get(2),
        parts.get(3),
        parts.get(4).and_then(|s| parse_date(s)),
        parts.get(5),
        parts.get(6),
        parts.get(7),
        parts.get(8),
    )
    else {
        fail(
            "Usage: hire <pilot|crew> <id> <name> <phone> <YYYY-MM-DD> <y|n> <city> <street> <house>"
                .to_string(),
        );
        return;
    };
    let role = match *role {
        "pilot" => CrewRole::Pilot,
        "crew" => CrewRole::FlightAttendant,
        other => {
            fail(format!("Unknown role: {}", other));
            return;
        }
    };
    let employee = Employee {
        id: Arc::from(*id),
        full_name: name.to_string(),
        phone: phone.to_string(),
        start_date: start,
        role,
        address: Address {
            city: city.to_string(),
            street: street.to_string(),
            house_num: house.to_string(),
        },
        long_dist_certified: *certified == "y",
    };
    match airline.add_employee(employee) {
        Ok(()) => ok(format!("Employee {} hired.", id)),
        Err(e) => fail(format!("Cannot hire: {}", e)),
    }
}

fn add_route(airline: &mut Airline, parts: &[&str]) {
    let (Some(id), Some(from), Some(to), Some(hours)) = (
        parts.first(),
        parts.get(1),
        parts.get(2),
        parts.get(3).and_then(|s| s.parse::<f64>().ok()),
    ) else {
        fail("Usage: addroute <id> <from> <to> <hours>".to_string());
        return;
    };
    let route = Route {
        id: Arc::from(*id),
        origin: Arc::from(*from),
        destination: Arc::from(*to),
        duration_hours: hours,
    };
    match airline.add_route(route) {
        Ok(()) => ok(format!("Route {} registered.", id)),
        Err(e) => fail(format!("Cannot register: {}", e)),
    }
}

fn add_aircraft(airline: &mut Airline, parts: &[&str]) {
    let (Some(id), Some(manufacturer), Some(size), Some(purchased), Some(econ)) = (
        parts.first(),
        parts.get(1),
        parts.get(2),
        parts.get(3).and_then(|s| parse_date(s)),
        parts.get(4).and_then(|s| parse_grid(s, CabinClass::Economy)),
    ) else {
        fail("Usage: addcraft <id> <manufacturer> <small|large> <YYYY-MM-DD> <RxC> [RxC]".to_string());
        return;
    };
    let size = match *size {
        "small" => AircraftSize::Small,
        "large" => AircraftSize::Large,
        other => {
            fail(format!("Unknown size: {}", other));
            return;
        }
    };
    let mut layouts = vec![econ];
    if let Some(bus) = parts.get(5) {
        match parse_grid(bus, CabinClass::Business) {
            Some(layout) => layouts.push(layout),
            None => {
                fail(format!("Bad business grid: {}", bus));
                return;
            }
        }
    }
    let aircraft = Aircraft {
        id: Arc::from(*id),
        manufacturer: manufacturer.to_string(),
        purchase_date: purchased,
        size,
        layouts,
    };
    match airline.add_aircraft(aircraft) {
        Ok(()) => ok(format!("Aircraft {} registered.", id)),
        Err(e) => fail(format!("Cannot register: {}", e)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    println!("Desk online. Loaded records from {}", args.scenario.display());

    let mut airline = Airline::load_from_file(args.scenario.to_str().unwrap())?;
    airline.refresh_statuses(Local::now().naive_local());

    let config = rustyline::Config::builder()
        .history_ignore_space(true)
        .completion_type(rustyline::CompletionType::List)
        .build();

    let helper = CompleteHelper {
        commands: vec![
            "ls".to_string(),
            "fleet".to_string(),
            "crew".to_string(),
            "routes".to_string(),
            "resources".to_string(),
            "scout".to_string(),
            "pool".to_string(),
            "staff".to_string(),
            "schedule".to_string(),
            "cancelflight".to_string(),
            "book".to_string(),
            "cancelorder".to_string(),
            "seats".to_string(),
            "refresh".to_string(),
            "hire".to_string(),
            "addcraft".to_string(),
            "addroute".to_string(),
            "help".to_string(),
            "exit".to_string(),
        ],
    };

    let mut rl = Editor::with_config(config)?;
    rl.set_helper(Some(helper));

    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                let now: NaiveDateTime = Local::now().naive_local();
                let parts: Vec<&str> = trimmed.split_whitespace().collect();
                match parts[0] {
                    "ls" => {
                        airline.refresh_statuses(now);
                        flight_board(&airline, &parts[1..]);
                    }
                    "fleet" => {
                        let mut rows: Vec<AircraftRow> =
                            airline.store.aircraft.values().map(AircraftRow::new).collect();
                        rows.sort_by(|a, b| a.id.cmp(&b.id));
                        show_table(&rows);
                    }
                    "crew" => {
                        let mut rows: Vec<EmployeeRow> =
                            airline.store.employees.values().map(EmployeeRow::new).collect();
                        rows.sort_by(|a, b| a.id.cmp(&b.id));
                        show_table(&rows);
                    }
                    "routes" => {
                        let rows: Vec<RouteRow> = airline
                            .store
                            .routes
                            .iter()
                            .map(|r| RouteRow {
                                id: r.id.to_string(),
                                from: r.origin.to_string(),
                                to: r.destination.to_string(),
                                hours: r.duration_hours,
                            })
                            .collect();
                        show_table(&rows);
                        println!(
                            "Origins: {}",
                            airline
                                .origins()
                                .iter()
                                .map(|c| c.to_string())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                        println!(
                            "Destinations: {}",
                            airline
                                .destinations()
                                .iter()
                                .map(|c| c.to_string())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                    }
                    "resources" => {
                        airline.refresh_statuses(now);
                        resources(&airline, &parts[1..]);
                    }
                    "scout" => {
                        let (Some(from), Some(to), Some(date), Some(time)) = (
                            parts.get(1),
                            parts.get(2),
                            parts.get(3).and_then(|s| parse_date(s)),
                            parts.get(4).and_then(|s| parse_time(s)),
                        ) else {
                            fail("Usage: scout <from> <to> <YYYY-MM-DD> <HH:MM>".to_string());
                            continue;
                        };
                        match airline.find_compatible_aircraft(from, to, date, time) {
                            Ok(aircraft) => {
                                show_table(&aircraft.iter().map(AircraftRow::new).collect::<Vec<_>>())
                            }
                            Err(e) => fail(format!("Cannot scout: {}", e)),
                        }
                    }
                    "pool" => {
                        let (Some(role), Some(from), Some(date), Some(time), Some(haul)) = (
                            parts.get(1),
                            parts.get(2),
                            parts.get(3).and_then(|s| parse_date(s)),
                            parts.get(4).and_then(|s| parse_time(s)),
                            parts.get(5),
                        ) else {
                            fail("Usage: pool <pilot|attendant> <from> <YYYY-MM-DD> <HH:MM> <long|short>".to_string());
                            continue;
                        };
                        let role = match *role {
                            "pilot" => CrewRole::Pilot,
                            "attendant" => CrewRole::FlightAttendant,
                            other => {
                                fail(format!("Unknown role: {}", other));
                                continue;
                            }
                        };
                        let pool =
                            airline.find_available_crew(from, date, time, *haul == "long", role);
                        show_table(&pool.iter().map(EmployeeRow::new).collect::<Vec<_>>());
                    }
                    "staff" => {
                        let (Some(aircraft_id), Some(from), Some(to), Some(date), Some(time)) = (
                            parts.get(1),
                            parts.get(2),
                            parts.get(3),
                            parts.get(4).and_then(|s| parse_date(s)),
                            parts.get(5).and_then(|s| parse_time(s)),
                        ) else {
                            fail("Usage: staff <aircraft> <from> <to> <YYYY-MM-DD> <HH:MM>".to_string());
                            continue;
                        };
                        match airline.crew_pool_for(aircraft_id, from, to, date, time) {
                            Ok((pilots, attendants)) => {
                                println!("Pilots free for this leg:");
                                show_table(&pilots.iter().map(EmployeeRow::new).collect::<Vec<_>>());
                                println!("Attendants free for this leg:");
                                show_table(
                                    &attendants.iter().map(EmployeeRow::new).collect::<Vec<_>>(),
                                );
                            }
                            Err(e) => fail(format!("Cannot staff: {}", e)),
                        }
                    }
                    "schedule" => schedule_flight(&mut airline, &parts[1..]),
                    "cancelflight" => {
                        let (Some(aircraft_id), Some(date), Some(time), Some(from), Some(to)) = (
                            parts.get(1),
                            parts.get(2).and_then(|s| parse_date(s)),
                            parts.get(3).and_then(|s| parse_time(s)),
                            parts.get(4),
                            parts.get(5),
                        ) else {
                            fail("Usage: cancelflight <aircraft> <YYYY-MM-DD> <HH:MM> <from> <to>".to_string());
                            continue;
                        };
                        match airline.cancel_flight(aircraft_id, date, time, from, to, now) {
                            Ok(key) => ok(format!("Flight {} canceled; ticketed orders refunded in full.", key)),
                            Err(e) => fail(format!("Cannot cancel: {}", e)),
                        }
                    }
                    "book" => book(&mut airline, &parts[1..], now.date()),
                    "cancelorder" => {
                        let (Some(order_id), Some(email)) =
                            (parts.get(1).and_then(|s| s.parse::<u64>().ok()), parts.get(2))
                        else {
                            fail("Usage: cancelorder <id> <email>".to_string());
                            continue;
                        };
                        match airline.cancel_order(order_id, email, now) {
                            Ok(total) => ok(format!(
                                "Order {} canceled; retained fee {:.2}.",
                                order_id, total
                            )),
                            Err(e) => fail(format!("Cannot cancel: {}", e)),
                        }
                    }
                    "seats" => {
                        let (Some(aircraft_id), Some(date), Some(time)) = (
                            parts.get(1),
                            parts.get(2).and_then(|s| parse_date(s)),
                            parts.get(3).and_then(|s| parse_time(s)),
                        ) else {
                            fail("Usage: seats <aircraft> <YYYY-MM-DD> <HH:MM>".to_string());
                            continue;
                        };
                        let key = FlightKey {
                            aircraft_id: Arc::from(*aircraft_id),
                            dep_date: date,
                            dep_time: time,
                        };
                        let taken = airline.taken_seats(&key);
                        if taken.is_empty() {
                            println!("No seats taken on {}.", key);
                        } else {
                            println!(
                                "Taken: {}",
                                taken
                                    .iter()
                                    .map(|s| s.to_string())
                                    .collect::<Vec<_>>()
                                    .join(", ")
                            );
                        }
                    }
                    "refresh" => {
                        airline.refresh_statuses(now);
                        ok("Statuses rolled forward.".to_string());
                    }
                    "hire" => hire(&mut airline, &parts[1..]),
                    "addcraft" => add_aircraft(&mut airline, &parts[1..]),
                    "addroute" => add_route(&mut airline, &parts[1..]),
                    "help" | "?" => {
                        println!("\nAvailable Commands:");
                        println!("  ls [date=|from=|to=|status=]   - Flight board with optional filters");
                        println!("  fleet / crew / routes          - List aircraft, employees, routes");
                        println!("  resources <f> <t> <d> <hh:mm>  - Bulk availability for a leg");
                        println!("  scout <f> <t> <d> <hh:mm>      - Aircraft able to fly a leg");
                        println!("  pool <role> <f> <d> <hh:mm> <long|short> - Free crew of one role");
                        println!("  staff <ac> <f> <t> <d> <hh:mm> - Crew pools for a chosen aircraft");
                        println!("  schedule <ac> <f> <t> <d> <hh:mm> <econ> <bus|-> <pilots> <attendants>");
                        println!("  cancelflight <ac> <d> <hh:mm> <f> <t>");
                        println!("  book <email> <ac> <d> <hh:mm> <econ seats|-> <bus seats|->");
                        println!("  cancelorder <id> <email>");
                        println!("  seats <ac> <d> <hh:mm>         - Taken seats on a flight");
                        println!("  refresh                        - Roll statuses forward");
                        println!("  hire / addcraft / addroute     - Onboard an employee, aircraft or route");
                        println!("  help / ?                       - Show this help menu");
                        println!("  exit / quit                    - Leave the desk\n");
                    }
                    "exit" | "quit" => break,
                    _ => println!("Unknown command: {}", parts[0]),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}
