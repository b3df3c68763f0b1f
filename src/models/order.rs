use serde::{Deserialize, Serialize};

/// A frozen order line: product id, name and unit price copied at placement
/// time, independent of any later product mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: i32,

    pub product_name: String,

    pub quantity: i32,

    pub price: f64,
}

/// A requested (product, quantity) pair on the order placement path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: i32,

    pub quantity: i32,
}

/// Order status. Orders are immutable once placed, so the only states are
/// the terminal ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Completed,
    Cancelled,
}

impl OrderStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}
