/* ===============================================================================
Mobile food ordering core.
Service tests over the in-memory store. 30 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::collections::HashSet;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;

use foodcourt::cart::{Cart, CartLine, CartService};
use foodcourt::customer::{Customer, CustomerUpdate};
use foodcourt::error::{Error, Result};
use foodcourt::food::{Category, FoodItem, FoodService, FoodUpdate, NewFood};
use foodcourt::media::MediaHost;
use foodcourt::memory::MemStorage;
use foodcourt::orders::{DeliveryAddress, Order, OrderService, OrderStatus, PaymentMethod};
use foodcourt::storage::Storage;

// Media host that never leaves the process
struct FakeMediaHost;

#[async_trait]
impl MediaHost for FakeMediaHost {
   async fn upload(&self, _bytes: Vec<u8>, filename: &str) -> Result<String> {
      Ok(format!("https://media.test/{}", filename))
   }
}

// Store whose item lookups always fail, everything else passes through
struct FlakyFoodStore {
   inner: Arc<MemStorage>,
}

#[async_trait]
impl Storage for FlakyFoodStore {
   async fn food(&self, _id: &str) -> Result<Option<FoodItem>> {
      Err(Error::Persistence(String::from("food table unreachable")))
   }

   async fn food_insert(&self, item: &FoodItem) -> Result<()> { self.inner.food_insert(item).await }
   async fn foods_active(&self) -> Result<Vec<FoodItem>> { self.inner.foods_active().await }
   async fn food_update(&self, id: &str, update: &FoodUpdate, keywords: Option<Vec<String>>) -> Result<()> { self.inner.food_update(id, update, keywords).await }
   async fn food_set_active(&self, id: &str, active: bool) -> Result<()> { self.inner.food_set_active(id, active).await }
   async fn food_rate(&self, id: &str, value: f64) -> Result<(f64, u32)> { self.inner.food_rate(id, value).await }
   async fn food_set_favorite(&self, id: &str, user_id: &str, favorite: bool) -> Result<()> { self.inner.food_set_favorite(id, user_id, favorite).await }
   async fn foods_favorited(&self, user_id: &str) -> Result<Vec<FoodItem>> { self.inner.foods_favorited(user_id).await }
   async fn food_search(&self, tokens: &[String]) -> Result<Vec<FoodItem>> { self.inner.food_search(tokens).await }
   async fn cart(&self, user_id: &str) -> Result<Option<Cart>> { self.inner.cart(user_id).await }
   async fn cart_merge(&self, user_id: &str, line: &CartLine) -> Result<()> { self.inner.cart_merge(user_id, line).await }
   async fn cart_set_amount(&self, user_id: &str, food_id: &str, amount: u32) -> Result<bool> { self.inner.cart_set_amount(user_id, food_id, amount).await }
   async fn cart_remove(&self, user_id: &str, food_id: &str) -> Result<()> { self.inner.cart_remove(user_id, food_id).await }
   async fn cart_clear(&self, user_id: &str) -> Result<()> { self.inner.cart_clear(user_id).await }
   async fn order_commit(&self, order: &Order) -> Result<()> { self.inner.order_commit(order).await }
   async fn order(&self, id: &str) -> Result<Option<Order>> { self.inner.order(id).await }
   async fn orders_by_user(&self, user_id: &str) -> Result<Vec<Order>> { self.inner.orders_by_user(user_id).await }
   async fn order_set_status(&self, id: &str, from: OrderStatus, to: OrderStatus) -> Result<bool> { self.inner.order_set_status(id, from, to).await }
   async fn customer_insert(&self, customer: &Customer) -> Result<()> { self.inner.customer_insert(customer).await }
   async fn customer(&self, user_id: &str) -> Result<Option<Customer>> { self.inner.customer(user_id).await }
   async fn customer_update(&self, user_id: &str, update: &CustomerUpdate) -> Result<()> { self.inner.customer_update(user_id, update).await }
   async fn customer_delete(&self, user_id: &str) -> Result<()> { self.inner.customer_delete(user_id).await }
}

fn food(id: &str, title: &str, price: f64) -> FoodItem {
   let now = Utc::now();
   FoodItem {
      id: id.to_string(),
      title: title.to_string(),
      descr: String::from("descr"),
      price,
      prep_time: 15,
      category: Category::MainCourse,
      image: String::new(),
      owner: String::from("provider1"),
      active: true,
      favorites: HashSet::new(),
      keywords: foodcourt::food::keywords_for(title, Category::MainCourse),
      rating: 0.0,
      rating_count: 0,
      created_at: now,
      updated_at: now,
   }
}

async fn seed(store: &Arc<MemStorage>, items: &[FoodItem]) {
   for item in items {
      store.food_insert(item).await.unwrap();
   }
}

// ============================================================================
// [Cart]
// ============================================================================

#[tokio::test]
async fn add_merges_amount_and_keeps_the_price_snapshot() {
   let store = Arc::new(MemStorage::new());
   let mut soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup.clone()]).await;

   let carts = CartService::new(store.clone());
   carts.add("u1", &soup, 2).await.unwrap();

   // The menu price changes between the adds
   soup.price = 9.99;
   let cart = carts.add("u1", &soup, 3).await.unwrap();

   assert_eq!(cart.len(), 1);
   let line = cart.line("f1").unwrap();
   assert_eq!(line.amount, 5);
   assert_eq!(line.price, 4.50);
}

#[tokio::test]
async fn missing_cart_reads_as_empty() {
   let store = Arc::new(MemStorage::new());
   let carts = CartService::new(store);

   let cart = carts.cart("nobody").await.unwrap();
   assert!(cart.is_empty());
   assert_eq!(cart.user_id, "nobody");
}

#[tokio::test]
async fn set_amount_to_zero_removes_and_unknown_line_errors() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup.clone()]).await;

   let carts = CartService::new(store);
   carts.add("u1", &soup, 2).await.unwrap();

   let cart = carts.set_amount("u1", "f1", 0).await.unwrap();
   assert!(cart.is_empty());

   let res = carts.set_amount("u1", "ghost", 3).await;
   assert!(matches!(res, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn concurrent_adds_both_survive() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   let cake = food("f2", "Cheesecake", 6.00);
   seed(&store, &[soup.clone(), cake.clone()]).await;

   let carts = Arc::new(CartService::new(store));
   let first = {
      let carts = Arc::clone(&carts);
      let soup = soup.clone();
      tokio::spawn(async move { carts.add("u1", &soup, 1).await })
   };
   let second = {
      let carts = Arc::clone(&carts);
      let cake = cake.clone();
      tokio::spawn(async move { carts.add("u1", &cake, 2).await })
   };

   first.await.unwrap().unwrap();
   second.await.unwrap().unwrap();

   let cart = carts.cart("u1").await.unwrap();
   assert_eq!(cart.len(), 2);
   assert_eq!(cart.line("f1").unwrap().amount, 1);
   assert_eq!(cart.line("f2").unwrap().amount, 2);
}

// ============================================================================
// [Orders]
// ============================================================================

#[tokio::test]
async fn place_order_snapshots_totals_and_empties_the_cart() {
   let store = Arc::new(MemStorage::new());
   let a = food("f1", "Pad Thai", 10.0);
   let b = food("f2", "Spring Rolls", 5.0);
   seed(&store, &[a.clone(), b.clone()]).await;

   let carts = CartService::new(store.clone());
   carts.add("u1", &a, 2).await.unwrap();
   carts.add("u1", &b, 1).await.unwrap();

   let orders = OrderService::new(store.clone());
   let order_id = orders.place("u1", DeliveryAddress::default(), PaymentMethod::Card).await.unwrap();

   let order = store.order(&order_id).await.unwrap().unwrap();
   assert_eq!(order.subtotal, 25.0);
   assert_eq!(order.delivery_fee, 2.99);
   assert_eq!(order.tax, 2.0); // 8% of the subtotal
   assert_eq!(order.total, 29.99);
   assert_eq!(order.status, OrderStatus::Processing);
   assert_eq!(order.lines.len(), 2);

   // The cart is emptied in the same commit
   let cart = carts.cart("u1").await.unwrap();
   assert!(cart.is_empty());
}

#[tokio::test]
async fn empty_cart_cannot_be_ordered() {
   let store = Arc::new(MemStorage::new());
   let orders = OrderService::new(store.clone());

   let res = orders.place("u1", DeliveryAddress::default(), PaymentMethod::Cash).await;
   assert!(matches!(res, Err(Error::EmptyCart)));
   assert!(store.orders_by_user("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn failed_commit_leaves_the_cart_intact() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup.clone()]).await;

   let carts = CartService::new(store.clone());
   carts.add("u1", &soup, 2).await.unwrap();

   store.set_offline(true);
   let orders = OrderService::new(store.clone());
   let res = orders.place("u1", DeliveryAddress::default(), PaymentMethod::Card).await;
   assert!(matches!(res, Err(Error::Persistence(_))));
   store.set_offline(false);

   let cart = carts.cart("u1").await.unwrap();
   assert_eq!(cart.line("f1").unwrap().amount, 2);
   assert!(store.orders_by_user("u1").await.unwrap().is_empty());
}

#[tokio::test]
async fn terminal_status_rejects_any_transition() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup.clone()]).await;

   let carts = CartService::new(store.clone());
   carts.add("u1", &soup, 1).await.unwrap();

   let orders = OrderService::new(store.clone());
   let order_id = orders.place("u1", DeliveryAddress::default(), PaymentMethod::Card).await.unwrap();

   orders.advance(&order_id, OrderStatus::Shipped).await.unwrap();
   orders.advance(&order_id, OrderStatus::Delivered).await.unwrap();

   let res = orders.advance(&order_id, OrderStatus::Cancelled).await;
   assert!(matches!(res, Err(Error::InvalidTransition { .. })));
}

#[tokio::test]
async fn stale_status_write_cannot_overwrite_a_terminal_order() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup.clone()]).await;

   let carts = CartService::new(store.clone());
   carts.add("u1", &soup, 1).await.unwrap();

   let orders = OrderService::new(store.clone());
   let order_id = orders.place("u1", DeliveryAddress::default(), PaymentMethod::Card).await.unwrap();

   orders.advance(&order_id, OrderStatus::Shipped).await.unwrap();
   orders.advance(&order_id, OrderStatus::Delivered).await.unwrap();

   // A session that still believes the order is shipped tries to cancel it
   let updated = store.order_set_status(&order_id, OrderStatus::Shipped, OrderStatus::Cancelled).await.unwrap();
   assert!(!updated);

   let order = store.order(&order_id).await.unwrap().unwrap();
   assert_eq!(order.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn details_distinguish_missing_items_from_failures() {
   let store = Arc::new(MemStorage::new());
   let carts = CartService::new(store.clone());

   // The cart line refers to an item the store never held
   let ghost = food("ghost", "Ghost Pepper Stew", 7.0);
   carts.add("u1", &ghost, 1).await.unwrap();

   let orders = OrderService::new(store.clone());
   let order_id = orders.place("u1", DeliveryAddress::default(), PaymentMethod::Card).await.unwrap();

   // A vanished item is a None, not an error
   let details = orders.details(&order_id).await.unwrap();
   assert!(details.foods[0].is_none());

   // A failing lookup surfaces as an error, never as a None
   let flaky = Arc::new(FlakyFoodStore { inner: Arc::clone(&store) });
   let orders = OrderService::new(flaky);
   let res = orders.details(&order_id).await;
   assert!(matches!(res, Err(Error::Persistence(_))));
}

#[tokio::test]
async fn details_decorate_lines_with_live_items() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup.clone()]).await;

   let carts = CartService::new(store.clone());
   carts.add("u1", &soup, 1).await.unwrap();

   let orders = OrderService::new(store.clone());
   let order_id = orders.place("u1", DeliveryAddress::default(), PaymentMethod::Card).await.unwrap();

   let details = orders.details(&order_id).await.unwrap();
   assert_eq!(details.foods.len(), details.order.lines.len());
   assert_eq!(details.foods[0].as_ref().unwrap().id, "f1");
}

// ============================================================================
// [Ratings and favorites]
// ============================================================================

#[tokio::test]
async fn rating_folds_and_rounds_to_one_decimal() {
   let store = Arc::new(MemStorage::new());
   let mut soup = food("f1", "Tom Yum", 4.50);
   soup.rating = 4.0;
   soup.rating_count = 2;
   seed(&store, &[soup]).await;

   let foods = FoodService::new(store.clone(), Arc::new(FakeMediaHost));
   let (rating, count) = foods.rate("f1", 5.0).await.unwrap();
   assert_eq!(rating, 4.3);
   assert_eq!(count, 3);
}

#[tokio::test]
async fn out_of_range_rating_changes_nothing() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup]).await;

   let foods = FoodService::new(store.clone(), Arc::new(FakeMediaHost));
   let res = foods.rate("f1", 6.0).await;
   assert!(matches!(res, Err(Error::Validation(_))));

   let item = store.food("f1").await.unwrap().unwrap();
   assert_eq!(item.rating, 0.0);
   assert_eq!(item.rating_count, 0);
}

#[tokio::test]
async fn toggle_favorite_is_a_self_inverse() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup]).await;

   let foods = FoodService::new(store.clone(), Arc::new(FakeMediaHost));
   assert!(foods.toggle_favorite("f1", "u1").await.unwrap());
   assert_eq!(foods.favorites("u1").await.unwrap().len(), 1);

   assert!(!foods.toggle_favorite("f1", "u1").await.unwrap());
   assert!(foods.favorites("u1").await.unwrap().is_empty());
}

// ============================================================================
// [Catalog]
// ============================================================================

#[tokio::test]
async fn create_uploads_the_picture_and_derives_keywords() {
   let store = Arc::new(MemStorage::new());
   let foods = FoodService::new(store.clone(), Arc::new(FakeMediaHost));

   let id = foods.create("provider1", NewFood {
      title: String::from("Pad Thai"),
      descr: String::from("Stir-fried noodles"),
      price: 11.50,
      prep_time: 20,
      category: Category::MainCourse,
      image: Some(vec![0xFF, 0xD8]),
   }).await.unwrap();

   let item = store.food(&id).await.unwrap().unwrap();
   assert!(item.image.starts_with("https://media.test/food_"));
   assert_eq!(item.keywords, vec!["pad", "thai", "main", "course"]);
   assert!(item.active);
   assert_eq!(item.rating_count, 0);
}

#[tokio::test]
async fn only_the_owner_may_remove_and_removal_is_soft() {
   let store = Arc::new(MemStorage::new());
   let soup = food("f1", "Tom Yum", 4.50);
   seed(&store, &[soup]).await;

   let foods = FoodService::new(store.clone(), Arc::new(FakeMediaHost));
   let res = foods.remove("f1", "stranger").await;
   assert!(matches!(res, Err(Error::Unauthorized(_))));

   foods.remove("f1", "provider1").await.unwrap();

   // Gone from the listing but still loadable by id
   assert!(foods.active_foods().await.unwrap().is_empty());
   assert!(store.food("f1").await.unwrap().is_some());
}

#[tokio::test]
async fn search_matches_any_keyword_case_insensitively() {
   let store = Arc::new(MemStorage::new());
   let a = food("f1", "Pad Thai", 10.0);
   let b = food("f2", "Green Curry", 9.0);
   seed(&store, &[a, b]).await;

   let foods = FoodService::new(store.clone(), Arc::new(FakeMediaHost));
   let found = foods.search("THAI").await.unwrap();
   assert_eq!(found.len(), 1);
   assert_eq!(found[0].id, "f1");

   assert!(foods.search("   ").await.unwrap().is_empty());
}
