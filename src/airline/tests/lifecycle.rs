use crate::aircraft::{AircraftSize, CabinClass};
use crate::airline::airline::{Airline, Pricing};
use crate::airline::tests::utils::{
    aircraft, attendant_ids, date, dt, id, large_aircraft, layout, pilot_ids, route, seat,
    small_aircraft, staffed_airline, time,
};
use crate::employee::CrewRole;
use crate::error::AirlineError;
use crate::flight::{FlightKey, FlightStatus};
use crate::order::OrderStatus;

fn airline_with_leg() -> Airline {
    staffed_airline(
        vec![small_aircraft("AC_1")],
        vec![route("R_1", "TLV", "LHR", 5.5)],
        2,
        3,
    )
}

fn schedule_leg(airline: &mut Airline, d: &str, t: &str) -> FlightKey {
    airline
        .create_flight(
            "AC_1",
            "TLV",
            "LHR",
            date(d),
            time(t),
            350.0,
            None,
            &pilot_ids(2),
            &attendant_ids(3),
        )
        .unwrap()
}

fn book_all_four_seats(airline: &mut Airline, key: &FlightKey) {
    let pricing = Pricing {
        economy: 350.0,
        business: None,
    };
    airline
        .create_order(
            "dana@example.com",
            key,
            &[seat(1, 1), seat(1, 2)],
            &[],
            pricing,
            date("2026-08-01"),
        )
        .unwrap();
    airline
        .create_order(
            "omer@example.com",
            key,
            &[seat(2, 1), seat(2, 2)],
            &[],
            pricing,
            date("2026-08-01"),
        )
        .unwrap();
}

#[test]
fn test_create_flight_derives_arrival_and_persists_crew() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-01", "10:00");

    let flight = airline.store.flights.get(&key).unwrap();
    assert_eq!(flight.status, FlightStatus::Scheduled);
    assert_eq!(flight.arr_date, date("2026-09-01"));
    assert_eq!(flight.arr_time, time("15:30"));

    assert_eq!(airline.store.assignments.len(), 5);
    let pilots = airline
        .store
        .assignments
        .iter()
        .filter(|a| a.role == CrewRole::Pilot)
        .count();
    assert_eq!(pilots, 2);
}

#[test]
fn test_create_flight_rejects_duplicate_departure() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-01", "10:00");

    let result = airline.create_flight(
        "AC_1",
        "TLV",
        "LHR",
        date("2026-09-01"),
        time("10:00"),
        350.0,
        None,
        &pilot_ids(2),
        &attendant_ids(3),
    );
    assert_eq!(result, Err(AirlineError::DuplicateFlight(key)));
}

#[test]
fn test_create_flight_validation() {
    let mut airline = staffed_airline(
        vec![small_aircraft("AC_1"), large_aircraft("AC_2")],
        vec![route("R_1", "TLV", "LHR", 5.5)],
        3,
        6,
    );
    let d = date("2026-09-01");
    let t = time("10:00");

    assert_eq!(
        airline.create_flight("AC_1", "TLV", "TLV", d, t, 350.0, None, &pilot_ids(2), &attendant_ids(3)),
        Err(AirlineError::SameCity)
    );
    assert_eq!(
        airline.create_flight("AC_1", "TLV", "CDG", d, t, 350.0, None, &pilot_ids(2), &attendant_ids(3)),
        Err(AirlineError::NoRoute {
            origin: id("TLV"),
            destination: id("CDG"),
        })
    );
    assert!(matches!(
        airline.create_flight("AC_1", "TLV", "LHR", d, t, 0.0, None, &pilot_ids(2), &attendant_ids(3)),
        Err(AirlineError::NonPositivePrice(_))
    ));
    assert_eq!(
        airline.create_flight("AC_2", "TLV", "LHR", d, t, 350.0, None, &pilot_ids(3), &attendant_ids(6)),
        Err(AirlineError::BusinessPriceRequired)
    );
    assert_eq!(
        airline.create_flight("AC_1", "TLV", "LHR", d, t, 350.0, Some(900.0), &pilot_ids(2), &attendant_ids(3)),
        Err(AirlineError::BusinessPriceNotApplicable)
    );
    assert_eq!(
        airline.create_flight("AC_1", "TLV", "LHR", d, t, 350.0, None, &pilot_ids(1), &attendant_ids(3)),
        Err(AirlineError::CrewCountMismatch {
            role: CrewRole::Pilot,
            required: 2,
            supplied: 1,
        })
    );
    assert_eq!(
        airline.create_flight(
            "AC_1",
            "TLV",
            "LHR",
            d,
            t,
            350.0,
            None,
            &[id("A_1"), id("P_1")],
            &attendant_ids(3)
        ),
        Err(AirlineError::RoleMismatch(id("A_1"), CrewRole::Pilot))
    );
    // nothing was persisted along the way
    assert!(airline.store.flights.is_empty());
    assert!(airline.store.assignments.is_empty());
}

#[test]
fn test_create_flight_rejects_double_assignment() {
    let mut airline = airline_with_leg();
    let result = airline.create_flight(
        "AC_1",
        "TLV",
        "LHR",
        date("2026-09-01"),
        time("10:00"),
        350.0,
        None,
        &[id("P_1"), id("P_1")],
        &attendant_ids(3),
    );
    assert!(matches!(
        result,
        Err(AirlineError::DuplicateAssignment { .. })
    ));
    assert!(airline.store.flights.is_empty());
}

#[test]
fn test_cancel_flight_at_the_72h_boundary_succeeds() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-10", "10:00");
    book_all_four_seats(&mut airline, &key);

    airline
        .cancel_flight(
            "AC_1",
            date("2026-09-10"),
            time("10:00"),
            "TLV",
            "LHR",
            dt("2026-09-07", "10:00"),
        )
        .unwrap();

    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::Canceled
    );
    for order in airline.store.orders.values() {
        assert_eq!(order.status, OrderStatus::SystemCanceled);
        assert_eq!(order.total_paid, 0.0);
    }
}

#[test]
fn test_cancel_flight_inside_72h_fails() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-10", "10:00");

    let result = airline.cancel_flight(
        "AC_1",
        date("2026-09-10"),
        time("10:00"),
        "TLV",
        "LHR",
        dt("2026-09-07", "10:01"),
    );
    assert_eq!(result, Err(AirlineError::TooLateToCancel { hours: 72 }));
    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::Scheduled
    );
}

#[test]
fn test_cancel_flight_not_found() {
    let mut airline = airline_with_leg();
    schedule_leg(&mut airline, "2026-09-10", "10:00");

    assert!(matches!(
        airline.cancel_flight(
            "AC_1",
            date("2026-09-11"),
            time("10:00"),
            "TLV",
            "LHR",
            dt("2026-09-01", "10:00"),
        ),
        Err(AirlineError::FlightNotFound(_))
    ));
    // the key exists but the route does not match
    assert!(matches!(
        airline.cancel_flight(
            "AC_1",
            date("2026-09-10"),
            time("10:00"),
            "LHR",
            "TLV",
            dt("2026-09-01", "10:00"),
        ),
        Err(AirlineError::FlightNotFound(_))
    ));
}

#[test]
fn test_cancel_flight_twice_fails() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-10", "10:00");
    let now = dt("2026-09-01", "10:00");

    airline
        .cancel_flight("AC_1", date("2026-09-10"), time("10:00"), "TLV", "LHR", now)
        .unwrap();
    assert_eq!(
        airline.cancel_flight("AC_1", date("2026-09-10"), time("10:00"), "TLV", "LHR", now),
        Err(AirlineError::AlreadyCanceled(key))
    );
}

#[test]
fn test_refresh_marks_full_flight() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-10", "10:00");
    book_all_four_seats(&mut airline, &key);

    airline.refresh_statuses(dt("2026-09-01", "10:00"));
    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::FullyBooked
    );
}

#[test]
fn test_refresh_leaves_partially_booked_flight_scheduled() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-10", "10:00");
    airline
        .create_order(
            "dana@example.com",
            &key,
            &[seat(1, 1)],
            &[],
            Pricing {
                economy: 350.0,
                business: None,
            },
            date("2026-08-01"),
        )
        .unwrap();

    airline.refresh_statuses(dt("2026-09-01", "10:00"));
    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::Scheduled
    );
}

#[test]
fn test_refresh_completes_landed_flight() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-01", "10:00");

    // 15:30 arrival; one minute past
    airline.refresh_statuses(dt("2026-09-01", "15:31"));
    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::Completed
    );
}

#[test]
fn test_completed_wins_over_fully_booked() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-01", "10:00");
    book_all_four_seats(&mut airline, &key);

    airline.refresh_statuses(dt("2026-09-02", "00:00"));
    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::Completed
    );
}

#[test]
fn test_refresh_is_idempotent() {
    let mut airline = airline_with_leg();
    let key = schedule_leg(&mut airline, "2026-09-01", "10:00");
    book_all_four_seats(&mut airline, &key);

    let now = dt("2026-09-02", "00:00");
    airline.refresh_statuses(now);
    airline.refresh_statuses(now);
    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::Completed
    );
    for order in airline.store.orders.values() {
        assert_eq!(order.status, OrderStatus::Completed);
    }
}

#[test]
fn test_full_board_end_to_end() {
    // 3x3 economy grid, nine seats, five-hour leg
    let mut airline = staffed_airline(
        vec![aircraft(
            "AC_1",
            AircraftSize::Large,
            vec![layout(CabinClass::Economy, 3, 3)],
        )],
        vec![route("R_1", "TLV", "ATH", 5.0)],
        3,
        6,
    );
    let key = airline
        .create_flight(
            "AC_1",
            "TLV",
            "ATH",
            date("2026-09-01"),
            time("08:00"),
            120.0,
            Some(480.0),
            &pilot_ids(3),
            &attendant_ids(6),
        )
        .unwrap();

    let pricing = Pricing {
        economy: 120.0,
        business: Some(480.0),
    };
    let mut seats = Vec::new();
    for row in 1..=3 {
        for col in 1..=3 {
            seats.push(seat(row, col));
        }
    }
    airline
        .create_order("dana@example.com", &key, &seats[..5], &[], pricing, date("2026-08-01"))
        .unwrap();
    airline
        .create_order("omer@example.com", &key, &seats[5..], &[], pricing, date("2026-08-01"))
        .unwrap();

    airline.refresh_statuses(dt("2026-09-01", "08:30"));
    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::FullyBooked
    );

    // past the 13:00 arrival the board flips to Completed and the orders
    // close out with it
    airline.refresh_statuses(dt("2026-09-01", "13:00"));
    assert_eq!(
        airline.store.flights.get(&key).unwrap().status,
        FlightStatus::Completed
    );
    for order in airline.store.orders.values() {
        assert_eq!(order.status, OrderStatus::Completed);
    }
}
