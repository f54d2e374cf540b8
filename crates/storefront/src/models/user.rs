//! Customer accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use delizio_core::{OrderId, UserId};

use super::order::{DeliveryInfo, Order};

/// Contact and address fields supplied at registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub zip_code: String,
}

/// Partial profile edit. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

/// A signed-in customer with their order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(flatten)]
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
    /// Oldest first.
    #[serde(default)]
    pub orders: Vec<Order>,
    /// One point per whole dollar of each order total.
    #[serde(default)]
    pub loyalty_points: i64,
}

impl User {
    /// A new user with no history.
    #[must_use]
    pub fn new(id: UserId, profile: Profile, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            profile,
            created_at,
            orders: Vec::new(),
            loyalty_points: 0,
        }
    }

    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
            .trim()
            .to_string()
    }

    /// Delivery details pre-filled from the saved address.
    #[must_use]
    pub fn delivery_defaults(&self) -> DeliveryInfo {
        DeliveryInfo {
            address: self.profile.address.clone(),
            city: self.profile.city.clone(),
            zip_code: self.profile.zip_code.clone(),
            phone: self.profile.phone.clone(),
            instructions: String::new(),
        }
    }

    /// Apply the fields set in `update`.
    pub fn apply(&mut self, update: ProfileUpdate) {
        let ProfileUpdate {
            first_name,
            last_name,
            phone,
            address,
            city,
            zip_code,
        } = update;
        let profile = &mut self.profile;
        for (field, value) in [
            (&mut profile.first_name, first_name),
            (&mut profile.last_name, last_name),
            (&mut profile.phone, phone),
            (&mut profile.address, address),
            (&mut profile.city, city),
            (&mut profile.zip_code, zip_code),
        ] {
            if let Some(value) = value {
                *field = value;
            }
        }
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|order| order.id == id)
    }
}
