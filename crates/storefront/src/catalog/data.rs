//! The restaurant's reference menu.

use delizio_core::{MenuItemId, Money};
use rust_decimal::Decimal;

use super::{Coupon, MenuCategory, MenuItem, OptionChoice, OptionGroup};

const IMAGE_BASE: &str = "https://images.unsplash.com";

fn category(id: &str, name: &str) -> MenuCategory {
    MenuCategory {
        id: id.to_string(),
        name: name.to_string(),
    }
}

/// Option group from `(choice, delta in cents)` pairs.
fn group(name: &str, choices: &[(&str, i64)]) -> OptionGroup {
    OptionGroup {
        name: name.to_string(),
        choices: choices
            .iter()
            .map(|(choice, cents)| OptionChoice {
                name: (*choice).to_string(),
                price_delta: Money::from_cents(*cents),
            })
            .collect(),
    }
}

struct Dish<'a> {
    id: i64,
    name: &'a str,
    category: &'a str,
    cents: i64,
    photo: &'a str,
    description: &'a str,
    vegan: bool,
    popular: bool,
}

impl Dish<'_> {
    fn with_options(self, options: Vec<OptionGroup>) -> MenuItem {
        MenuItem {
            id: MenuItemId::new(self.id),
            name: self.name.to_string(),
            category: self.category.to_string(),
            price: Money::from_cents(self.cents),
            image: format!("{IMAGE_BASE}/{}?w=400&h=300&fit=crop", self.photo),
            description: self.description.to_string(),
            options,
            is_vegan: self.vegan,
            is_popular: self.popular,
        }
    }
}

pub(super) fn categories() -> Vec<MenuCategory> {
    vec![
        category("starters", "Starters"),
        category("mains", "Main Course"),
        category("desserts", "Desserts"),
        category("beverages", "Beverages"),
        category("vegan", "Vegan Options"),
    ]
}

pub(super) fn coupons() -> Vec<Coupon> {
    let coupon = |code: &str, percent: i64, min_dollars: i64, description: &str| Coupon {
        code: code.to_string(),
        discount_percent: Decimal::from(percent),
        min_order: Money::from_dollars(min_dollars),
        description: description.to_string(),
    };
    vec![
        coupon("WELCOME10", 10, 25, "10% off your first order"),
        coupon("SAVE15", 15, 50, "15% off orders over $50"),
        coupon("DELIZIO20", 20, 75, "20% off orders over $75"),
    ]
}

#[allow(clippy::too_many_lines)]
pub(super) fn menu_items() -> Vec<MenuItem> {
    vec![
        // Starters
        Dish {
            id: 1,
            name: "Bruschetta Classica",
            category: "starters",
            cents: 1299,
            photo: "photo-1572695157366-5e585ab2b69f",
            description: "Fresh tomatoes, basil, garlic, and mozzarella on toasted bread",
            vegan: false,
            popular: true,
        }
        .with_options(vec![group("size", &[("Regular", 0), ("Large", 300)])]),
        Dish {
            id: 2,
            name: "Antipasto Platter",
            category: "starters",
            cents: 1899,
            photo: "photo-1544025162-d76694265947",
            description: "Selection of Italian cured meats, cheeses, and marinated vegetables",
            vegan: false,
            popular: false,
        }
        .with_options(vec![group("size", &[("For 2", 0), ("For 4", 1200)])]),
        Dish {
            id: 3,
            name: "Caprese Salad",
            category: "starters",
            cents: 1499,
            photo: "photo-1592417817098-8fd3d9eb14a5",
            description: "Fresh mozzarella, tomatoes, and basil with balsamic glaze",
            vegan: false,
            popular: true,
        }
        .with_options(vec![group(
            "extras",
            &[("Extra Mozzarella", 300), ("Avocado", 200)],
        )]),
        Dish {
            id: 4,
            name: "Arancini",
            category: "starters",
            cents: 1199,
            photo: "photo-1574484284002-952d92456975",
            description: "Crispy risotto balls stuffed with mozzarella and served with marinara",
            vegan: false,
            popular: false,
        }
        .with_options(vec![group(
            "filling",
            &[("Mozzarella", 0), ("Mushroom", 100), ("Spinach", 100)],
        )]),
        // Main course
        Dish {
            id: 5,
            name: "Spaghetti Carbonara",
            category: "mains",
            cents: 2299,
            photo: "photo-1621996346565-e3dbc353d2e5",
            description: "Classic Roman pasta with eggs, pecorino cheese, pancetta, and black pepper",
            vegan: false,
            popular: true,
        }
        .with_options(vec![
            group("size", &[("Regular", 0), ("Large", 500)]),
            group("extras", &[("Extra Pancetta", 400), ("Extra Cheese", 200)]),
        ]),
        Dish {
            id: 6,
            name: "Margherita Pizza",
            category: "mains",
            cents: 1999,
            photo: "photo-1574071318508-1cdbab80d002",
            description: "Traditional pizza with tomato sauce, mozzarella, and fresh basil",
            vegan: false,
            popular: true,
        }
        .with_options(vec![
            group("size", &[("12 inch", 0), ("16 inch", 600)]),
            group("crust", &[("Thin", 0), ("Thick", 200)]),
        ]),
        Dish {
            id: 7,
            name: "Osso Buco",
            category: "mains",
            cents: 3299,
            photo: "photo-1546833999-b9f581a1996d",
            description: "Braised veal shanks with vegetables, white wine, and broth",
            vegan: false,
            popular: false,
        }
        .with_options(vec![group(
            "side",
            &[("Risotto", 0), ("Polenta", 0), ("Pasta", 200)],
        )]),
        Dish {
            id: 8,
            name: "Chicken Parmigiana",
            category: "mains",
            cents: 2699,
            photo: "photo-1632778149955-e80f8ceca2e8",
            description: "Breaded chicken breast with marinara sauce and melted mozzarella",
            vegan: false,
            popular: true,
        }
        .with_options(vec![group(
            "side",
            &[("Spaghetti", 0), ("Vegetables", 0), ("Salad", 200)],
        )]),
        Dish {
            id: 9,
            name: "Seafood Risotto",
            category: "mains",
            cents: 2899,
            photo: "photo-1476124369491-e7addf5db371",
            description: "Creamy risotto with mixed seafood, saffron, and white wine",
            vegan: false,
            popular: false,
        }
        .with_options(vec![group(
            "spice",
            &[("Mild", 0), ("Medium", 0), ("Spicy", 0)],
        )]),
        // Desserts
        Dish {
            id: 10,
            name: "Tiramisu",
            category: "desserts",
            cents: 899,
            photo: "photo-1571877227200-a0d98ea607e9",
            description: "Classic Italian dessert with coffee-soaked ladyfingers and mascarpone",
            vegan: false,
            popular: true,
        }
        .with_options(vec![group("size", &[("Individual", 0), ("Large", 400)])]),
        Dish {
            id: 11,
            name: "Panna Cotta",
            category: "desserts",
            cents: 799,
            photo: "photo-1488477181946-6428a0291777",
            description: "Silky smooth vanilla custard with berry compote",
            vegan: false,
            popular: false,
        }
        .with_options(vec![group(
            "flavor",
            &[("Vanilla", 0), ("Chocolate", 100), ("Strawberry", 100)],
        )]),
        Dish {
            id: 12,
            name: "Cannoli",
            category: "desserts",
            cents: 699,
            photo: "photo-1578985545062-69928b1d9587",
            description: "Crispy pastry shells filled with sweet ricotta cream",
            vegan: false,
            popular: true,
        }
        .with_options(vec![group(
            "quantity",
            &[("2 pieces", 0), ("4 pieces", 400)],
        )]),
        Dish {
            id: 13,
            name: "Gelato",
            category: "desserts",
            cents: 599,
            photo: "photo-1567206563064-6f60f40a2b57",
            description: "Authentic Italian gelato in various flavors",
            vegan: false,
            popular: true,
        }
        .with_options(vec![
            group(
                "flavor",
                &[
                    ("Vanilla", 0),
                    ("Chocolate", 0),
                    ("Strawberry", 0),
                    ("Pistachio", 100),
                ],
            ),
            group("size", &[("Single Scoop", 0), ("Double Scoop", 300)]),
        ]),
        // Beverages
        Dish {
            id: 14,
            name: "Espresso",
            category: "beverages",
            cents: 399,
            photo: "photo-1510591509098-f4fdc6d0ff04",
            description: "Strong Italian coffee served in a small cup",
            vegan: true,
            popular: true,
        }
        .with_options(vec![group("size", &[("Single", 0), ("Double", 200)])]),
        Dish {
            id: 15,
            name: "Cappuccino",
            category: "beverages",
            cents: 499,
            photo: "photo-1572442388796-11668a67e53d",
            description: "Espresso with steamed milk and foam",
            vegan: false,
            popular: true,
        }
        .with_options(vec![
            group("size", &[("Regular", 0), ("Large", 150)]),
            group(
                "milk",
                &[("Whole", 0), ("Skim", 0), ("Oat", 50), ("Almond", 50)],
            ),
        ]),
        Dish {
            id: 16,
            name: "Italian Soda",
            category: "beverages",
            cents: 349,
            photo: "photo-1544145945-f90425340c7e",
            description: "Refreshing sparkling water with Italian syrup",
            vegan: true,
            popular: false,
        }
        .with_options(vec![group(
            "flavor",
            &[("Lemon", 0), ("Orange", 0), ("Cherry", 0), ("Vanilla", 0)],
        )]),
        Dish {
            id: 17,
            name: "House Wine",
            category: "beverages",
            cents: 799,
            photo: "photo-1506377247377-2a5b3b417ebb",
            description: "Our selection of Italian wines by the glass",
            vegan: true,
            popular: false,
        }
        .with_options(vec![group(
            "type",
            &[("Red", 0), ("White", 0), ("Rosé", 0)],
        )]),
        // Vegan options
        Dish {
            id: 18,
            name: "Vegan Margherita",
            category: "vegan",
            cents: 1899,
            photo: "photo-1565299624946-b28f40a0ca4b",
            description: "Pizza with vegan cheese, tomato sauce, and fresh basil",
            vegan: true,
            popular: true,
        }
        .with_options(vec![group("size", &[("12 inch", 0), ("16 inch", 600)])]),
        Dish {
            id: 19,
            name: "Pasta Arrabbiata",
            category: "vegan",
            cents: 1699,
            photo: "photo-1621996346565-e3dbc353d2e5",
            description: "Spicy tomato sauce with garlic, chili, and herbs",
            vegan: true,
            popular: false,
        }
        .with_options(vec![group(
            "spice",
            &[("Mild", 0), ("Medium", 0), ("Hot", 0)],
        )]),
        Dish {
            id: 20,
            name: "Vegan Tiramisu",
            category: "vegan",
            cents: 999,
            photo: "photo-1571877227200-a0d98ea607e9",
            description: "Plant-based version of the classic Italian dessert",
            vegan: true,
            popular: true,
        }
        .with_options(vec![group("size", &[("Individual", 0), ("Large", 400)])]),
    ]
}
