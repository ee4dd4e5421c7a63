//! Booking channels and the payment status each one implies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a Lodgify booking came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Airbnb,
    BookingCom,
    Manual,
    Website,
    Other,
}

impl Channel {
    /// Trimmed, case-insensitive match on the channel label.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "airbnb" => Channel::Airbnb,
            "booking.com" => Channel::BookingCom,
            "manuel" => Channel::Manual,
            "site web" => Channel::Website,
            _ => Channel::Other,
        }
    }

    /// Status of a booking that has no Airbnb payout.
    pub fn unmatched_status(self) -> PaymentStatus {
        match self {
            Channel::BookingCom => PaymentStatus::CardPayment,
            Channel::Manual | Channel::Website => PaymentStatus::BankTransfer,
            Channel::Airbnb | Channel::Other => PaymentStatus::AwaitingAirbnb,
        }
    }
}

/// Payment status of a reconciled row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    #[serde(rename = "PAYÉ")]
    Paid,
    #[serde(rename = "PAIEMENT CB")]
    CardPayment,
    #[serde(rename = "VIREMENT")]
    BankTransfer,
    #[serde(rename = "EN ATTENTE AIRBNB")]
    AwaitingAirbnb,
    #[serde(rename = "ABSENT DE LODGIFY")]
    MissingFromBookings,
    #[serde(rename = "AUCUN DÉTAIL")]
    NoDetail,
}

impl PaymentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "PAYÉ",
            PaymentStatus::CardPayment => "PAIEMENT CB",
            PaymentStatus::BankTransfer => "VIREMENT",
            PaymentStatus::AwaitingAirbnb => "EN ATTENTE AIRBNB",
            PaymentStatus::MissingFromBookings => "ABSENT DE LODGIFY",
            PaymentStatus::NoDetail => "AUCUN DÉTAIL",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
