/* ===============================================================================
Mobile food ordering core.
Persistence client interface. 13 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use async_trait::async_trait;

use crate::cart::{Cart, CartLine};
use crate::customer::{Customer, CustomerUpdate};
use crate::error::Result;
use crate::food::{FoodItem, FoodUpdate};
use crate::orders::{Order, OrderStatus};

/// Document store behind every service. Constructed explicitly and passed in,
/// so an in-memory stand-in can replace the real database in tests.
///
/// Mutations that race between sessions (cart merges, rating folds, favorite
/// flips) must be atomic inside a single call, not read-modify-write across
/// calls.
#[async_trait]
pub trait Storage: Send + Sync {
   // ------------------------------------------------------------------------
   // Menu items
   // ------------------------------------------------------------------------
   async fn food_insert(&self, item: &FoodItem) -> Result<()>;

   async fn food(&self, id: &str) -> Result<Option<FoodItem>>;

   /// Items not soft-deleted.
   async fn foods_active(&self) -> Result<Vec<FoodItem>>;

   /// Applies the set fields, replaces keywords when given.
   async fn food_update(&self, id: &str, update: &FoodUpdate, keywords: Option<Vec<String>>) -> Result<()>;

   async fn food_set_active(&self, id: &str, active: bool) -> Result<()>;

   /// Folds the rating into the running mean; mean and count change together
   /// or not at all. Returns the new pair.
   async fn food_rate(&self, id: &str, value: f64) -> Result<(f64, u32)>;

   /// Atomic set membership change, no whole-array rewrite.
   async fn food_set_favorite(&self, id: &str, user_id: &str, favorite: bool) -> Result<()>;

   /// Active items the user has favorited.
   async fn foods_favorited(&self, user_id: &str) -> Result<Vec<FoodItem>>;

   /// Active items whose keywords contain any of the tokens.
   async fn food_search(&self, tokens: &[String]) -> Result<Vec<FoodItem>>;

   // ------------------------------------------------------------------------
   // Carts
   // ------------------------------------------------------------------------
   /// None when the user has never written a cart.
   async fn cart(&self, user_id: &str) -> Result<Option<Cart>>;

   /// Adds the line or bumps the amount of an existing one in a single atomic
   /// upsert. The price of the first add wins.
   async fn cart_merge(&self, user_id: &str, line: &CartLine) -> Result<()>;

   /// False when there is no such line.
   async fn cart_set_amount(&self, user_id: &str, food_id: &str, amount: u32) -> Result<bool>;

   async fn cart_remove(&self, user_id: &str, food_id: &str) -> Result<()>;

   async fn cart_clear(&self, user_id: &str) -> Result<()>;

   // ------------------------------------------------------------------------
   // Orders
   // ------------------------------------------------------------------------
   /// Persists the order and empties the owner's cart in one transaction.
   /// On failure the cart is left untouched.
   async fn order_commit(&self, order: &Order) -> Result<()>;

   async fn order(&self, id: &str) -> Result<Option<Order>>;

   /// Newest first.
   async fn orders_by_user(&self, user_id: &str) -> Result<Vec<Order>>;

   /// Conditional write: lands only while the stored status still equals
   /// `from`. False when another session changed it first.
   async fn order_set_status(&self, id: &str, from: OrderStatus, to: OrderStatus) -> Result<bool>;

   // ------------------------------------------------------------------------
   // Customers
   // ------------------------------------------------------------------------
   async fn customer_insert(&self, customer: &Customer) -> Result<()>;

   async fn customer(&self, user_id: &str) -> Result<Option<Customer>>;

   async fn customer_update(&self, user_id: &str, update: &CustomerUpdate) -> Result<()>;

   async fn customer_delete(&self, user_id: &str) -> Result<()>;
}
