/* ===============================================================================
Mobile food ordering core.
In-memory store for tests and embedding. 22 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;

use crate::cart::{Cart, CartLine};
use crate::customer::{Customer, CustomerUpdate};
use crate::error::{Error, Result};
use crate::food::{self, FoodItem, FoodUpdate};
use crate::orders::{Order, OrderStatus};
use crate::storage::Storage;

// Every operation takes one lock, so each call is atomic on its own
#[derive(Default)]
pub struct MemStorage {
   foods: RwLock<HashMap<String, FoodItem>>,
   carts: RwLock<HashMap<String, Cart>>,
   orders: RwLock<HashMap<String, Order>>,
   customers: RwLock<HashMap<String, Customer>>,

   // When set, every call fails the way a lost connection would
   offline: AtomicBool,
}

impl MemStorage {
   pub fn new() -> Self {
      Self::default()
   }

   pub fn set_offline(&self, offline: bool) {
      self.offline.store(offline, Ordering::SeqCst);
   }

   fn ensure_online(&self) -> Result<()> {
      if self.offline.load(Ordering::SeqCst) {
         Err(Error::persistence(String::from("memory storage offline")))
      } else {
         Ok(())
      }
   }
}

#[async_trait]
impl Storage for MemStorage {
   // ------------------------------------------------------------------------
   // Menu items
   // ------------------------------------------------------------------------
   async fn food_insert(&self, item: &FoodItem) -> Result<()> {
      self.ensure_online()?;
      self.foods.write().insert(item.id.clone(), item.clone());
      Ok(())
   }

   async fn food(&self, id: &str) -> Result<Option<FoodItem>> {
      self.ensure_online()?;
      Ok(self.foods.read().get(id).cloned())
   }

   async fn foods_active(&self) -> Result<Vec<FoodItem>> {
      self.ensure_online()?;
      let mut res: Vec<FoodItem> = self.foods.read()
      .values()
      .filter(|item| item.active)
      .cloned()
      .collect();

      res.sort_by(|a, b| b.created_at.cmp(&a.created_at));
      Ok(res)
   }

   async fn food_update(&self, id: &str, update: &FoodUpdate, keywords: Option<Vec<String>>) -> Result<()> {
      self.ensure_online()?;
      let mut foods = self.foods.write();
      let item = foods.get_mut(id)
      .ok_or_else(|| Error::not_found("Food item", id))?;

      if let Some(title) = &update.title { item.title = title.clone(); }
      if let Some(descr) = &update.descr { item.descr = descr.clone(); }
      if let Some(price) = update.price { item.price = price; }
      if let Some(prep_time) = update.prep_time { item.prep_time = prep_time; }
      if let Some(category) = update.category { item.category = category; }
      if let Some(image) = &update.image { item.image = image.clone(); }
      if let Some(keywords) = keywords { item.keywords = keywords; }
      item.updated_at = Utc::now();
      Ok(())
   }

   async fn food_set_active(&self, id: &str, active: bool) -> Result<()> {
      self.ensure_online()?;
      let mut foods = self.foods.write();
      let item = foods.get_mut(id)
      .ok_or_else(|| Error::not_found("Food item", id))?;

      item.active = active;
      item.updated_at = Utc::now();
      Ok(())
   }

   async fn food_rate(&self, id: &str, value: f64) -> Result<(f64, u32)> {
      self.ensure_online()?;
      let mut foods = self.foods.write();
      let item = foods.get_mut(id)
      .ok_or_else(|| Error::not_found("Food item", id))?;

      // Mean and count change under one lock, readers never see a half-update
      let (rating, count) = food::fold_rating(item.rating, item.rating_count, value);
      item.rating = rating;
      item.rating_count = count;
      item.updated_at = Utc::now();
      Ok((rating, count))
   }

   async fn food_set_favorite(&self, id: &str, user_id: &str, favorite: bool) -> Result<()> {
      self.ensure_online()?;
      let mut foods = self.foods.write();
      let item = foods.get_mut(id)
      .ok_or_else(|| Error::not_found("Food item", id))?;

      if favorite {
         item.favorites.insert(user_id.to_string());
      } else {
         item.favorites.remove(user_id);
      }
      item.updated_at = Utc::now();
      Ok(())
   }

   async fn foods_favorited(&self, user_id: &str) -> Result<Vec<FoodItem>> {
      self.ensure_online()?;
      let res = self.foods.read()
      .values()
      .filter(|item| item.active && item.is_favorite(user_id))
      .cloned()
      .collect();

      Ok(res)
   }

   async fn food_search(&self, tokens: &[String]) -> Result<Vec<FoodItem>> {
      self.ensure_online()?;
      let res = self.foods.read()
      .values()
      .filter(|item| {
         item.active && tokens.iter().any(|token| item.keywords.contains(token))
      })
      .cloned()
      .collect();

      Ok(res)
   }

   // ------------------------------------------------------------------------
   // Carts
   // ------------------------------------------------------------------------
   async fn cart(&self, user_id: &str) -> Result<Option<Cart>> {
      self.ensure_online()?;
      Ok(self.carts.read().get(user_id).cloned())
   }

   async fn cart_merge(&self, user_id: &str, line: &CartLine) -> Result<()> {
      self.ensure_online()?;
      self.carts.write()
      .entry(user_id.to_string())
      .or_insert_with(|| Cart::empty(user_id))
      .merge(line.clone());

      Ok(())
   }

   async fn cart_set_amount(&self, user_id: &str, food_id: &str, amount: u32) -> Result<bool> {
      self.ensure_online()?;
      let mut carts = self.carts.write();
      match carts.get_mut(user_id) {
         Some(cart) => Ok(cart.set_amount(food_id, amount)),
         None => Ok(false),
      }
   }

   async fn cart_remove(&self, user_id: &str, food_id: &str) -> Result<()> {
      self.ensure_online()?;
      if let Some(cart) = self.carts.write().get_mut(user_id) {
         cart.remove(food_id);
      }
      Ok(())
   }

   async fn cart_clear(&self, user_id: &str) -> Result<()> {
      self.ensure_online()?;
      if let Some(cart) = self.carts.write().get_mut(user_id) {
         cart.clear();
      }
      Ok(())
   }

   // ------------------------------------------------------------------------
   // Orders
   // ------------------------------------------------------------------------
   async fn order_commit(&self, order: &Order) -> Result<()> {
      self.ensure_online()?;

      // Both locks held together make the pair atomic for other callers
      let mut orders = self.orders.write();
      let mut carts = self.carts.write();

      orders.insert(order.id.clone(), order.clone());
      if let Some(cart) = carts.get_mut(&order.user_id) {
         cart.clear();
      }
      Ok(())
   }

   async fn order(&self, id: &str) -> Result<Option<Order>> {
      self.ensure_online()?;
      Ok(self.orders.read().get(id).cloned())
   }

   async fn orders_by_user(&self, user_id: &str) -> Result<Vec<Order>> {
      self.ensure_online()?;
      let mut res: Vec<Order> = self.orders.read()
      .values()
      .filter(|order| order.user_id == user_id)
      .cloned()
      .collect();

      res.sort_by(|a, b| b.created_at.cmp(&a.created_at));
      Ok(res)
   }

   async fn order_set_status(&self, id: &str, from: OrderStatus, to: OrderStatus) -> Result<bool> {
      self.ensure_online()?;
      let mut orders = self.orders.write();
      let order = orders.get_mut(id)
      .ok_or_else(|| Error::not_found("Order", id))?;

      // Check and write stay under one lock, a stale caller gets a refusal
      if order.status != from {
         return Ok(false);
      }
      order.status = to;
      order.updated_at = Utc::now();
      Ok(true)
   }

   // ------------------------------------------------------------------------
   // Customers
   // ------------------------------------------------------------------------
   async fn customer_insert(&self, customer: &Customer) -> Result<()> {
      self.ensure_online()?;
      self.customers.write().insert(customer.user_id.clone(), customer.clone());
      Ok(())
   }

   async fn customer(&self, user_id: &str) -> Result<Option<Customer>> {
      self.ensure_online()?;
      Ok(self.customers.read().get(user_id).cloned())
   }

   async fn customer_update(&self, user_id: &str, update: &CustomerUpdate) -> Result<()> {
      self.ensure_online()?;
      let mut customers = self.customers.write();
      let customer = customers.get_mut(user_id)
      .ok_or_else(|| Error::not_found("User", user_id))?;

      if let Some(name) = &update.name { customer.name = name.clone(); }
      if let Some(email) = &update.email { customer.email = email.clone(); }
      if let Some(mobile) = &update.mobile { customer.mobile = mobile.clone(); }
      if let Some(address) = &update.address { customer.address = address.clone(); }
      if let Some(delivery) = update.delivery { customer.delivery = delivery; }
      Ok(())
   }

   async fn customer_delete(&self, user_id: &str) -> Result<()> {
      self.ensure_online()?;
      self.customers.write().remove(user_id);
      Ok(())
   }
}
