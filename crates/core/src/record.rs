use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{CoreError, Money, OrderCount};

/// Customer region. Travels on the wire as its integer code.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum Region {
    #[default]
    Central,
    East,
    West,
    South,
}

impl Region {
    pub const ALL: [Region; 4] = [Region::Central, Region::East, Region::West, Region::South];

    pub fn code(self) -> u8 {
        match self {
            Region::Central => 0,
            Region::East => 1,
            Region::West => 2,
            Region::South => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Region::Central => "Central Region",
            Region::East => "East Region",
            Region::West => "West Region",
            Region::South => "South Region",
        }
    }
}

impl From<Region> for u8 {
    fn from(region: Region) -> Self {
        region.code()
    }
}

impl TryFrom<u8> for Region {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Region::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or(CoreError::UnknownRegion(code))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The input record scored by the prediction service.
///
/// Two invariants hold for every record a form hands out:
/// `product_diversity <= total_orders`, and `average_order_value` equals
/// `round2(total_spent / total_orders)` once `total_orders` has been positive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct CustomerMetricsRecord {
    pub total_orders: OrderCount,
    pub total_spent: Money,
    pub printer_purchases_last_6m: u64,
    pub return_rate: f64,
    pub average_order_value: Money,
    pub product_diversity: u64,
    pub region: Region,
    pub high_value_customer: bool,
}

impl CustomerMetricsRecord {
    /// All quantities zero, central region, not high value.
    pub const BASELINE: Self = Self {
        total_orders: 0,
        total_spent: 0.0,
        printer_purchases_last_6m: 0,
        return_rate: 0.0,
        average_order_value: 0.0,
        product_diversity: 0,
        region: Region::Central,
        high_value_customer: false,
    };

    /// The record a fresh form is pre-filled with.
    pub const SAMPLE: Self = Self {
        total_orders: 10,
        total_spent: 500.0,
        printer_purchases_last_6m: 1,
        return_rate: 0.1,
        average_order_value: 50.0,
        product_diversity: 5,
        region: Region::East,
        high_value_customer: false,
    };
}

impl Default for CustomerMetricsRecord {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Addressable keys of [`CustomerMetricsRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    TotalOrders,
    TotalSpent,
    PrinterPurchasesLast6m,
    ReturnRate,
    AverageOrderValue,
    ProductDiversity,
    Region,
    HighValueCustomer,
}

impl Field {
    pub const ALL: [Field; 8] = [
        Field::TotalOrders,
        Field::TotalSpent,
        Field::PrinterPurchasesLast6m,
        Field::ReturnRate,
        Field::AverageOrderValue,
        Field::ProductDiversity,
        Field::Region,
        Field::HighValueCustomer,
    ];

    /// Wire name, identical to the JSON key.
    pub fn name(self) -> &'static str {
        match self {
            Field::TotalOrders => "total_orders",
            Field::TotalSpent => "total_spent",
            Field::PrinterPurchasesLast6m => "printer_purchases_last_6m",
            Field::ReturnRate => "return_rate",
            Field::AverageOrderValue => "average_order_value",
            Field::ProductDiversity => "product_diversity",
            Field::Region => "region",
            Field::HighValueCustomer => "high_value_customer",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::TotalOrders => "Total Orders",
            Field::TotalSpent => "Total Spent ($)",
            Field::PrinterPurchasesLast6m => "Recent Printer Purchases",
            Field::ReturnRate => "Return Rate",
            Field::AverageOrderValue => "Average Order Value ($)",
            Field::ProductDiversity => "Product Diversity",
            Field::Region => "Region",
            Field::HighValueCustomer => "High Value Customer",
        }
    }

    pub fn tooltip(self) -> &'static str {
        match self {
            Field::TotalOrders => "Total number of orders placed by the customer (whole number)",
            Field::TotalSpent => "Total amount spent by the customer in USD",
            Field::PrinterPurchasesLast6m => {
                "Number of printers purchased in the last 6 months (whole number)"
            }
            Field::ReturnRate => "Share of items returned, between 0 and 1 (0.5 = 50%)",
            Field::AverageOrderValue => "Auto-calculated: Total Spent / Total Orders",
            Field::ProductDiversity => {
                "Number of different product categories purchased (cannot exceed total orders)"
            }
            Field::Region => "Geographical region of the customer",
            Field::HighValueCustomer => "Whether the customer is flagged as high value",
        }
    }

    /// Derived fields are shown but never accept input.
    pub fn is_editable(self) -> bool {
        !matches!(self, Field::AverageOrderValue)
    }

    /// Current value of this field in `record`, rendered for display.
    pub fn display_value(self, record: &CustomerMetricsRecord) -> String {
        match self {
            Field::TotalOrders => record.total_orders.to_string(),
            Field::TotalSpent => format!("{:.2}", record.total_spent),
            Field::PrinterPurchasesLast6m => record.printer_purchases_last_6m.to_string(),
            Field::ReturnRate => format!("{:.2}", record.return_rate),
            Field::AverageOrderValue => format!("{:.2}", record.average_order_value),
            Field::ProductDiversity => record.product_diversity.to_string(),
            Field::Region => record.region.label().to_string(),
            Field::HighValueCustomer => {
                let answer = if record.high_value_customer { "Yes" } else { "No" };
                answer.to_string()
            }
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Field::ALL
            .into_iter()
            .find(|f| f.name() == key)
            .ok_or_else(|| CoreError::UnknownField(key.to_string()))
    }
}
