/* ===============================================================================
Mobile food ordering core.
Customer profile. 15 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::sync::Arc;
use chrono::{DateTime, Utc};
use smart_default::SmartDefault;
use strum::{AsRefStr, EnumString};

use crate::error::{Error, Result};
use crate::storage::Storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString, SmartDefault)]
pub enum Delivery {
   #[default]
   #[strum(to_string = "courier")]
   Courier, // delivery by courier
   #[strum(to_string = "pickup")]
   Pickup, // delivery by customer
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString, SmartDefault)]
pub enum UserKind {
   #[default]
   #[strum(to_string = "user")]
   Eater,
   #[strum(to_string = "provider")]
   Provider, // may create and manage menu items
}

// The user id comes from the external identity provider and is trusted as given
#[derive(Debug, Clone)]
pub struct Customer {
   pub user_id: String,
   pub name: String,
   pub email: String,
   pub mobile: String,
   pub kind: UserKind,
   pub address: String,
   pub delivery: Delivery,
   pub created_at: DateTime<Utc>,
}

// Partial update, None leaves the field untouched
#[derive(Default)]
pub struct CustomerUpdate {
   pub name: Option<String>,
   pub email: Option<String>,
   pub mobile: Option<String>,
   pub address: Option<String>,
   pub delivery: Option<Delivery>,
}

// ============================================================================
// [Profile operations]
// ============================================================================

pub struct ProfileService {
   store: Arc<dyn Storage>,
}

impl ProfileService {
   pub fn new(store: Arc<dyn Storage>) -> Self {
      Self { store }
   }

   pub async fn register(&self, customer: Customer) -> Result<()> {
      if customer.user_id.is_empty() {
         return Err(Error::Validation(String::from("User ID is required")));
      }
      self.store.customer_insert(&customer).await
   }

   pub async fn profile(&self, user_id: &str) -> Result<Customer> {
      self.store.customer(user_id)
      .await?
      .ok_or_else(|| Error::not_found("User", user_id))
   }

   pub async fn update(&self, user_id: &str, update: CustomerUpdate) -> Result<()> {
      // Surface a proper error for an unknown user
      self.profile(user_id).await?;
      self.store.customer_update(user_id, &update).await
   }

   pub async fn unregister(&self, user_id: &str) -> Result<()> {
      self.store.customer_delete(user_id).await
   }
}
