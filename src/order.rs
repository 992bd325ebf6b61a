use crate::error::AirlineError;
use crate::flight::FlightKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type OrderId = u64;

/// Share of the original total retained when a customer cancels.
pub const CANCELLATION_FEE_RATE: f64 = 0.05;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum OrderStatus {
    Active,
    Completed,
    CustomerCanceled,
    SystemCanceled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        self != OrderStatus::Active
    }

    /// Orders only ever move out of Active; everything else is final.
    pub fn transition(self, to: OrderStatus) -> Result<OrderStatus, AirlineError> {
        match (self, to) {
            (OrderStatus::Active, _) if to != OrderStatus::Active => Ok(to),
            _ => Err(AirlineError::IllegalOrderTransition { from: self, to }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Active => write!(f, "Active"),
            OrderStatus::Completed => write!(f, "Completed"),
            OrderStatus::CustomerCanceled => write!(f, "CustomerCanceled"),
            OrderStatus::SystemCanceled => write!(f, "SystemCanceled"),
        }
    }
}

/// One physical seat, numbered from 1. Rendered as `row:col`.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Seat {
    pub row: u32,
    pub col: u32,
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

impl FromStr for Seat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (row, col) = s.split_once(':').ok_or(())?;
        Ok(Seat {
            row: row.trim().parse().map_err(|_| ())?,
            col: col.trim().parse().map_err(|_| ())?,
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub email: String,
    pub created: NaiveDate,
    pub status: OrderStatus,
    pub total_paid: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Ticket {
    pub order_id: OrderId,
    pub flight: FlightKey,
    pub seat: Seat,
    pub price: f64,
}

/// Round half-up to two decimals.
pub fn round_half_up(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

/// The amount retained on a customer cancellation.
pub fn retained_fee(total: f64) -> f64 {
    round_half_up(total * CANCELLATION_FEE_RATE)
}
