use forneria_core::Money;
use serde::{Deserialize, Serialize};

/// Names that identify a cart line as a drink.
const DRINK_WORDS: &[&str] = &[
    "coca",
    "guaraná",
    "suco",
    "cerveja",
    "refri",
    "água",
    "fanta",
    "sprite",
    "soda",
    "bebida",
    "h2oh",
    "schweppes",
];

/// One line in the cart. Quantity is expressed by repetition, the same
/// way the kitchen reads order slips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub name: String,
    /// Display price, e.g. `R$ 59,90`.
    #[serde(rename = "price")]
    pub price_text: String,
}

impl CartLine {
    #[must_use]
    pub fn new(name: impl Into<String>, price_text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price_text: price_text.into(),
        }
    }

    /// Parsed price. Text that is not a price counts as zero.
    #[must_use]
    pub fn price(&self) -> Money {
        Money::parse_brl(&self.price_text).unwrap_or(Money::ZERO)
    }

    /// Whether the line looks like a drink.
    #[must_use]
    pub fn is_drink(&self) -> bool {
        let lower = self.name.to_lowercase();
        DRINK_WORDS.iter().any(|word| lower.contains(word))
    }
}

/// The items a customer has picked so far.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn add(&mut self, line: CartLine) {
        self.lines.push(line);
    }

    /// Removes the line at `index`, returning it when in bounds.
    pub fn remove(&mut self, index: usize) -> Option<CartLine> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of all line prices before fees and discounts.
    #[must_use]
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(CartLine::price).sum()
    }

    #[must_use]
    pub fn has_drink(&self) -> bool {
        self.lines.iter().any(CartLine::is_drink)
    }
}
