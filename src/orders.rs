/* ===============================================================================
Mobile food ordering core.
Placed orders and their lifecycle. 20 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::sync::Arc;
use chrono::{DateTime, Utc};
use futures::future;
use smart_default::SmartDefault;
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::cart::CartLine;
use crate::error::{Error, Result};
use crate::food::FoodItem;
use crate::storage::Storage;

// ============================================================================
// [Order status]
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum OrderStatus {
   #[strum(to_string = "processing")]
   Processing,
   #[strum(to_string = "shipped")]
   Shipped,
   #[strum(to_string = "delivered")]
   Delivered,
   #[strum(to_string = "cancelled")]
   Cancelled,
}

impl OrderStatus {
   // Delivered and cancelled orders never change again
   pub fn is_terminal(self) -> bool {
      matches!(self, Self::Delivered | Self::Cancelled)
   }

   pub fn can_change_to(self, next: Self) -> bool {
      matches!((self, next),
         (Self::Processing, Self::Shipped)
         | (Self::Shipped, Self::Delivered)
         | (Self::Processing, Self::Cancelled)
         | (Self::Shipped, Self::Cancelled)
      )
   }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString, SmartDefault)]
pub enum PaymentMethod {
   #[default]
   #[strum(to_string = "card")]
   Card,
   #[strum(to_string = "cash")]
   Cash,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryAddress {
   pub label: String,
   pub street: String,
   pub city: String,
   pub phone: String,
}

// ============================================================================
// [Order]
// ============================================================================

// Copy of a cart line frozen at checkout, no live link to the menu item
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
   pub food_id: String,
   pub title: String,
   pub price: f64,
   pub amount: u32,
   pub image: String,
}

impl From<&CartLine> for OrderLine {
   fn from(line: &CartLine) -> Self {
      Self {
         food_id: line.food_id.clone(),
         title: line.title.clone(),
         price: line.price,
         amount: line.amount,
         image: line.image.clone(),
      }
   }
}

// Immutable after creation except the status
#[derive(Debug, Clone)]
pub struct Order {
   pub id: String,
   pub user_id: String,
   pub lines: Vec<OrderLine>,
   pub subtotal: f64,
   pub delivery_fee: f64,
   pub tax: f64,
   pub total: f64,
   pub status: OrderStatus,
   pub address: DeliveryAddress,
   pub payment: PaymentMethod,
   pub created_at: DateTime<Utc>,
   pub updated_at: DateTime<Utc>,
}

// Order plus a live menu lookup per line, for display only.
// foods[i] belongs to order.lines[i], None when the item is gone.
pub struct OrderDetails {
   pub order: Order,
   pub foods: Vec<Option<FoodItem>>,
}

// ============================================================================
// [Order operations]
// ============================================================================

pub struct OrderService {
   store: Arc<dyn Storage>,
}

impl OrderService {
   pub fn new(store: Arc<dyn Storage>) -> Self {
      Self { store }
   }

   // Snapshots the cart into a new order and empties the cart.
   // Both happen in one storage commit, a failed order leaves the cart intact.
   pub async fn place(&self, user_id: &str, address: DeliveryAddress, payment: PaymentMethod) -> Result<String> {
      if user_id.is_empty() {
         return Err(Error::Validation(String::from("User ID is required")));
      }

      let cart = self.store.cart(user_id).await?;
      let cart = match cart {
         Some(cart) if !cart.is_empty() => cart,
         _ => return Err(Error::EmptyCart),
      };

      let totals = cart.totals();
      let now = Utc::now();
      let order = Order {
         id: Uuid::new_v4().to_string(),
         user_id: user_id.to_string(),
         lines: cart.lines().map(OrderLine::from).collect(),
         subtotal: totals.subtotal,
         delivery_fee: totals.delivery_fee,
         tax: totals.tax,
         total: totals.total,
         status: OrderStatus::Processing,
         address,
         payment,
         created_at: now,
         updated_at: now,
      };

      self.store.order_commit(&order).await?;

      log::info!("Order {} placed by {}: {}", order.id, user_id, totals.summary());
      Ok(order.id)
   }

   // The stored snapshot is returned as-is, the lookups only decorate it.
   // Only a vanished item reads as None, a failed lookup is an error.
   pub async fn details(&self, order_id: &str) -> Result<OrderDetails> {
      let order = self.store.order(order_id)
      .await?
      .ok_or_else(|| Error::not_found("Order", order_id))?;

      let lookups = order.lines.iter()
      .map(|line| self.store.food(&line.food_id));

      let foods = future::try_join_all(lookups).await?;

      Ok(OrderDetails { order, foods })
   }

   // Newest first
   pub async fn user_orders(&self, user_id: &str) -> Result<Vec<Order>> {
      self.store.orders_by_user(user_id).await
   }

   pub async fn advance(&self, order_id: &str, next: OrderStatus) -> Result<()> {
      let order = self.store.order(order_id)
      .await?
      .ok_or_else(|| Error::not_found("Order", order_id))?;

      if !order.status.can_change_to(next) {
         return Err(Error::InvalidTransition {
            from: order.status.as_ref().to_string(),
            to: next.as_ref().to_string(),
         });
      }

      // Conditional write, a concurrent change between the read above and
      // the write lands as a rejection instead of an overwrite
      if !self.store.order_set_status(order_id, order.status, next).await? {
         let fresh = self.store.order(order_id)
         .await?
         .ok_or_else(|| Error::not_found("Order", order_id))?;

         return Err(Error::InvalidTransition {
            from: fresh.status.as_ref().to_string(),
            to: next.as_ref().to_string(),
         });
      }
      Ok(())
   }
}
