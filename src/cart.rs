/* ===============================================================================
Mobile food ordering core.
Shopping cart, one per user. 18 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Utc};

use crate::environment as env;
use crate::error::{Error, Result};
use crate::food::FoodItem;
use crate::storage::Storage;

// Shown when an item carries no picture
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

// ============================================================================
// [Cart line]
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
   pub food_id: String,
   pub title: String,
   pub price: f64, // unit price at the moment of the first add, never re-fetched
   pub amount: u32,
   pub image: String,
}

impl CartLine {
   pub fn cost(&self) -> f64 {
      self.price * self.amount as f64
   }
}

// ============================================================================
// [Cart]
// ============================================================================

// Per-user cart, at most one line per food id
#[derive(Debug, Clone)]
pub struct Cart {
   pub user_id: String,
   lines: HashMap<String, CartLine>,
   pub created_at: DateTime<Utc>,
   pub updated_at: DateTime<Utc>,
}

impl Cart {
   pub fn empty(user_id: &str) -> Self {
      let now = Utc::now();
      Self {
         user_id: user_id.to_string(),
         lines: HashMap::new(),
         created_at: now,
         updated_at: now,
      }
   }

   pub fn with_lines(user_id: &str, lines: Vec<CartLine>, created_at: DateTime<Utc>, updated_at: DateTime<Utc>) -> Self {
      let lines = lines.into_iter()
      .map(|line| (line.food_id.clone(), line))
      .collect();

      Self { user_id: user_id.to_string(), lines, created_at, updated_at }
   }

   pub fn is_empty(&self) -> bool {
      self.lines.is_empty()
   }

   pub fn len(&self) -> usize {
      self.lines.len()
   }

   pub fn line(&self, food_id: &str) -> Option<&CartLine> {
      self.lines.get(food_id)
   }

   pub fn lines(&self) -> impl Iterator<Item = &CartLine> {
      self.lines.values()
   }

   // Same food id adds up, the original price and picture are kept
   pub fn merge(&mut self, line: CartLine) {
      match self.lines.get_mut(&line.food_id) {
         Some(existing) => existing.amount += line.amount,
         None => { self.lines.insert(line.food_id.clone(), line); }
      }
      self.updated_at = Utc::now();
   }

   // Returns false if there is no such line
   pub fn set_amount(&mut self, food_id: &str, amount: u32) -> bool {
      if amount < 1 {
         return self.remove(food_id);
      }

      match self.lines.get_mut(food_id) {
         Some(line) => {
            line.amount = amount;
            self.updated_at = Utc::now();
            true
         }
         None => false,
      }
   }

   pub fn remove(&mut self, food_id: &str) -> bool {
      let removed = self.lines.remove(food_id).is_some();
      if removed {
         self.updated_at = Utc::now();
      }
      removed
   }

   pub fn clear(&mut self) {
      self.lines.clear();
      self.updated_at = Utc::now();
   }

   // Pure, safe to call repeatedly for display
   pub fn totals(&self) -> CartTotals {
      let subtotal = self.lines.values()
      .fold(0.0, |acc, line| acc + line.cost());

      let subtotal = env::round2(subtotal);
      let tax = env::round2(subtotal * env::TAX_RATE);
      CartTotals {
         subtotal,
         delivery_fee: env::DELIVERY_FEE,
         tax,
         total: env::round2(subtotal + env::DELIVERY_FEE + tax),
      }
   }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
   pub subtotal: f64,
   pub delivery_fee: f64,
   pub tax: f64,
   pub total: f64,
}

impl CartTotals {
   pub fn summary(&self) -> String {
      format!("subtotal {}, delivery {}, tax {}, total {}",
         env::price_with_unit(self.subtotal),
         env::price_with_unit(self.delivery_fee),
         env::price_with_unit(self.tax),
         env::price_with_unit(self.total),
      )
   }
}

// ============================================================================
// [Cart operations]
// ============================================================================

pub struct CartService {
   store: Arc<dyn Storage>,
}

impl CartService {
   pub fn new(store: Arc<dyn Storage>) -> Self {
      Self { store }
   }

   // Adds N more of the item, merging with an existing line by food id.
   // The cart document is created lazily on the first add.
   pub async fn add(&self, user_id: &str, food: &FoodItem, amount: u32) -> Result<Cart> {
      if user_id.is_empty() {
         return Err(Error::Validation(String::from("User ID is required")));
      }
      if amount < 1 {
         return Err(Error::Validation(format!("Invalid quantity {}", amount)));
      }

      let line = CartLine {
         food_id: food.id.clone(),
         title: food.title.clone(),
         price: food.price,
         amount,
         image: if food.image.is_empty() { String::from(PLACEHOLDER_IMAGE) } else { food.image.clone() },
      };

      // Single atomic upsert at the store, no read-modify-write
      self.store.cart_merge(user_id, &line).await?;
      self.cart(user_id).await
   }

   // Zero amount removes the line, the caller confirms intent upstream
   pub async fn set_amount(&self, user_id: &str, food_id: &str, amount: u32) -> Result<Cart> {
      if amount < 1 {
         self.store.cart_remove(user_id, food_id).await?;
      } else {
         let updated = self.store.cart_set_amount(user_id, food_id, amount).await?;
         if !updated {
            return Err(Error::not_found("Cart line", food_id));
         }
      }
      self.cart(user_id).await
   }

   // No-op when the line is absent
   pub async fn remove(&self, user_id: &str, food_id: &str) -> Result<Cart> {
      self.store.cart_remove(user_id, food_id).await?;
      self.cart(user_id).await
   }

   pub async fn clear(&self, user_id: &str) -> Result<()> {
      self.store.cart_clear(user_id).await
   }

   // A missing cart reads as an empty one, absence is not an error
   pub async fn cart(&self, user_id: &str) -> Result<Cart> {
      let cart = self.store.cart(user_id)
      .await?
      .unwrap_or_else(|| Cart::empty(user_id));

      Ok(cart)
   }
}
