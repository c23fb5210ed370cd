use forneria_core::Money;

/// A dish or drink as advertised on the menu.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem {
    pub name: String,
    pub description: String,
    /// Price as the kitchen formats it, e.g. `R$ 59,90`.
    pub price_text: String,
    pub photo: Option<String>,
    pub visible: bool,
    pub sold_out: bool,
}

impl MenuItem {
    /// Parsed price. Text that is not a price counts as zero.
    #[must_use]
    pub fn price(&self) -> Money {
        Money::parse_brl(&self.price_text).unwrap_or(Money::ZERO)
    }

    /// Whether the item can be offered right now.
    #[must_use]
    pub fn available(&self) -> bool {
        self.visible && !self.sold_out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuCategory {
    pub name: String,
    pub items: Vec<MenuItem>,
}

/// The published menu, grouped by category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Menu {
    pub categories: Vec<MenuCategory>,
}

impl Menu {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.iter().all(|cat| cat.items.is_empty())
    }

    #[must_use]
    pub fn category(&self, name: &str) -> Option<&MenuCategory> {
        self.categories.iter().find(|cat| cat.name == name)
    }

    /// Items that can be suggested: visible and not sold out.
    #[must_use]
    pub fn available_items(&self) -> Vec<&MenuItem> {
        self.categories
            .iter()
            .flat_map(|cat| cat.items.iter())
            .filter(|item| item.available())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, visible: bool, sold_out: bool) -> MenuItem {
        MenuItem {
            name: name.to_owned(),
            description: String::new(),
            price_text: "R$ 59,90".to_owned(),
            photo: None,
            visible,
            sold_out,
        }
    }

    #[test]
    fn available_items_skip_hidden_and_sold_out() {
        let menu = Menu {
            categories: vec![MenuCategory {
                name: "Pizzas Salgadas".to_owned(),
                items: vec![
                    item("Calabresa", true, false),
                    item("Quatro Queijos", true, true),
                    item("Portuguesa", false, false),
                ],
            }],
        };

        let names: Vec<&str> = menu
            .available_items()
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        assert_eq!(names, vec!["Calabresa"]);
    }

    #[test]
    fn category_lookup_is_exact() {
        let menu = Menu {
            categories: vec![MenuCategory {
                name: "Bebidas".to_owned(),
                items: vec![item("Coca-Cola 2L", true, false)],
            }],
        };

        assert!(menu.category("Bebidas").is_some());
        assert!(menu.category("bebidas").is_none());
    }

    #[test]
    fn menu_with_empty_categories_counts_as_empty() {
        let menu = Menu {
            categories: vec![MenuCategory {
                name: "Pizzas Salgadas".to_owned(),
                items: Vec::new(),
            }],
        };

        assert!(menu.is_empty());
    }
}
