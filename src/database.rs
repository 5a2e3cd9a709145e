/* ===============================================================================
Mobile food ordering core.
Postgres-backed store. 25 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::collections::HashSet;
use std::str::FromStr;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Client, Pool};
use tokio_postgres::{types::ToSql, Row};

use crate::cart::{Cart, CartLine};
use crate::customer::{Customer, CustomerUpdate, Delivery, UserKind};
use crate::error::{Error, Result};
use crate::food::{Category, FoodItem, FoodUpdate};
use crate::orders::{DeliveryAddress, Order, OrderLine, OrderStatus, PaymentMethod};
use crate::storage::Storage;

pub type Params<'a> = &'a [&'a (dyn ToSql + Sync)];

const FOOD_SELECT: &str = "SELECT id, title, descr, price, prep_time, category, image, owner, \
   active, favorites, keywords, rating, rating_count, created_at, updated_at FROM foods";

const ORDER_SELECT: &str = "SELECT id, user_id, subtotal, delivery_fee, tax, total, status, \
   addr_label, addr_street, addr_city, addr_phone, payment, created_at, updated_at FROM orders";

// The pool is owned here and handed to services explicitly, there is no
// process-wide database global
pub struct PgStorage {
   pool: Pool,
}

impl PgStorage {
   pub fn new(pool: Pool) -> Self {
      Self { pool }
   }

   // Wrapper, returns a client from the pool
   async fn client(&self) -> Result<Client> {
      self.pool.get()
      .await
      .map_err(|err| Error::persistence(format!("No db client: {}", err)))
   }

   async fn execute_one(&self, sql_text: &str, params: Params<'_>) -> Result<()> {
      let affected = self.execute_prepared(sql_text, params).await?;

      // Only one record has to be affected
      if affected == 1 { Ok(()) }
      else { Err(Error::persistence(format!("execute_one {}: affected {} records instead one", sql_text, affected))) }
   }

   async fn execute_prepared(&self, sql_text: &str, params: Params<'_>) -> Result<u64> {
      let client = self.client().await?;

      let statement = client.prepare(sql_text)
      .await
      .map_err(|err| Error::persistence(format!("execute_prepared {} prepare: {}", sql_text, err)))?;

      client.execute(&statement, params)
      .await
      .map_err(|err| Error::persistence(format!("execute_prepared {} execute: {}", sql_text, err)))
   }

   async fn query_prepared(&self, sql_text: &str, params: Params<'_>) -> Result<Vec<Row>> {
      let client = self.client().await?;

      let statement = client.prepare(sql_text)
      .await
      .map_err(|err| Error::persistence(format!("query_prepared {} prepare: {}", sql_text, err)))?;

      client.query(&statement, params)
      .await
      .map_err(|err| Error::persistence(format!("query_prepared {} query: {}", sql_text, err)))
   }

   // ========================================================================
   // [Misc]
   // ========================================================================

   pub async fn is_tables_exist(&self) -> bool {
      let client = match self.client().await {
         Ok(client) => client,
         Err(_) => return false,
      };

      // Check that one of tables exists
      let rows = client
      .query("SELECT table_name FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME='foods'", &[])
      .await;

      match rows {
         Ok(data) => !data.is_empty(),
         _ => false,
      }
   }

   pub async fn create_tables(&self) -> bool {
      let client = match self.client().await {
         Ok(client) => client,
         Err(_) => return false,
      };

      let query = client
      .batch_execute("CREATE TABLE foods (
            PRIMARY KEY (id),
            id             VARCHAR          NOT NULL,
            title          VARCHAR          NOT NULL,
            descr          VARCHAR          NOT NULL,
            price          DOUBLE PRECISION NOT NULL,
            prep_time      INTEGER          NOT NULL,
            category       VARCHAR          NOT NULL,
            image          VARCHAR          NOT NULL,
            owner          VARCHAR          NOT NULL,
            active         BOOLEAN          NOT NULL,
            favorites      VARCHAR[]        NOT NULL,
            keywords       VARCHAR[]        NOT NULL,
            rating         DOUBLE PRECISION NOT NULL,
            rating_count   INTEGER          NOT NULL,
            created_at     TIMESTAMPTZ      NOT NULL,
            updated_at     TIMESTAMPTZ      NOT NULL);

         CREATE TABLE cart_lines (
            PRIMARY KEY (user_id, food_id),
            user_id        VARCHAR          NOT NULL,
            food_id        VARCHAR          NOT NULL,
            title          VARCHAR          NOT NULL,
            price          DOUBLE PRECISION NOT NULL,
            amount         INTEGER          NOT NULL,
            image          VARCHAR          NOT NULL,
            created_at     TIMESTAMPTZ      NOT NULL,
            updated_at     TIMESTAMPTZ      NOT NULL);

         CREATE TABLE orders (
            PRIMARY KEY (id),
            id             VARCHAR          NOT NULL,
            user_id        VARCHAR          NOT NULL,
            subtotal       DOUBLE PRECISION NOT NULL,
            delivery_fee   DOUBLE PRECISION NOT NULL,
            tax            DOUBLE PRECISION NOT NULL,
            total          DOUBLE PRECISION NOT NULL,
            status         VARCHAR          NOT NULL,
            addr_label     VARCHAR          NOT NULL,
            addr_street    VARCHAR          NOT NULL,
            addr_city      VARCHAR          NOT NULL,
            addr_phone     VARCHAR          NOT NULL,
            payment        VARCHAR          NOT NULL,
            created_at     TIMESTAMPTZ      NOT NULL,
            updated_at     TIMESTAMPTZ      NOT NULL);

         CREATE TABLE order_lines (
            PRIMARY KEY (order_id, food_id),
            order_id       VARCHAR          NOT NULL,
            food_id        VARCHAR          NOT NULL,
            title          VARCHAR          NOT NULL,
            price          DOUBLE PRECISION NOT NULL,
            amount         INTEGER          NOT NULL,
            image          VARCHAR          NOT NULL);

         CREATE TABLE customers (
            PRIMARY KEY (user_id),
            user_id        VARCHAR          NOT NULL,
            name           VARCHAR          NOT NULL,
            email          VARCHAR          NOT NULL,
            mobile         VARCHAR          NOT NULL,
            kind           VARCHAR          NOT NULL,
            address        VARCHAR          NOT NULL,
            delivery       VARCHAR          NOT NULL,
            created_at     TIMESTAMPTZ      NOT NULL);
      ")
      .await;

      match query {
         Ok(_) => true,
         Err(err) => {
            log::error!("Error create_tables: {}", err);
            false
         }
      }
   }
}

// Convert bool to text
pub fn is_success(flag: bool) -> &'static str {
   if flag { "success" } else { "error" }
}

// ============================================================================
// [Row conversions]
// ============================================================================

fn food_from_row(row: &Row) -> Result<FoodItem> {
   let category: String = row.get(5);
   let category = Category::from_str(&category)
   .map_err(|err| Error::persistence(format!("food_from_row category '{}': {}", category, err)))?;

   let favorites: Vec<String> = row.get(9);

   Ok(FoodItem {
      id: row.get(0),
      title: row.get(1),
      descr: row.get(2),
      price: row.get(3),
      prep_time: row.get::<_, i32>(4) as u32,
      category,
      image: row.get(6),
      owner: row.get(7),
      active: row.get(8),
      favorites: favorites.into_iter().collect::<HashSet<String>>(),
      keywords: row.get(10),
      rating: row.get(11),
      rating_count: row.get::<_, i32>(12) as u32,
      created_at: row.get(13),
      updated_at: row.get(14),
   })
}

fn order_from_row(row: &Row, lines: Vec<OrderLine>) -> Result<Order> {
   let status: String = row.get(6);
   let status = OrderStatus::from_str(&status)
   .map_err(|err| Error::persistence(format!("order_from_row status '{}': {}", status, err)))?;

   let payment: String = row.get(11);
   let payment = PaymentMethod::from_str(&payment)
   .map_err(|err| Error::persistence(format!("order_from_row payment '{}': {}", payment, err)))?;

   Ok(Order {
      id: row.get(0),
      user_id: row.get(1),
      lines,
      subtotal: row.get(2),
      delivery_fee: row.get(3),
      tax: row.get(4),
      total: row.get(5),
      status,
      address: DeliveryAddress {
         label: row.get(7),
         street: row.get(8),
         city: row.get(9),
         phone: row.get(10),
      },
      payment,
      created_at: row.get(12),
      updated_at: row.get(13),
   })
}

fn order_line_from_row(row: &Row) -> OrderLine {
   OrderLine {
      food_id: row.get(0),
      title: row.get(1),
      price: row.get(2),
      amount: row.get::<_, i32>(3) as u32,
      image: row.get(4),
   }
}

fn customer_from_row(row: &Row) -> Result<Customer> {
   let kind: String = row.get(4);
   let kind = UserKind::from_str(&kind)
   .map_err(|err| Error::persistence(format!("customer_from_row kind '{}': {}", kind, err)))?;

   let delivery: String = row.get(6);
   let delivery = Delivery::from_str(&delivery)
   .map_err(|err| Error::persistence(format!("customer_from_row delivery '{}': {}", delivery, err)))?;

   Ok(Customer {
      user_id: row.get(0),
      name: row.get(1),
      email: row.get(2),
      mobile: row.get(3),
      kind,
      address: row.get(5),
      delivery,
      created_at: row.get(7),
   })
}

async fn load_order_lines(client: &Client, order_id: &str) -> Result<Vec<OrderLine>> {
   let sql_text = "SELECT food_id, title, price, amount, image FROM order_lines WHERE order_id = $1::VARCHAR";

   let statement = client.prepare(sql_text)
   .await
   .map_err(|err| Error::persistence(format!("load_order_lines prepare: {}", err)))?;

   let query = client.query(&statement, &[&order_id])
   .await
   .map_err(|err| Error::persistence(format!("load_order_lines query: {}", err)))?;

   Ok(query.iter().map(order_line_from_row).collect())
}

// ============================================================================
// [Storage]
// ============================================================================

#[async_trait]
impl Storage for PgStorage {
   // ------------------------------------------------------------------------
   // Menu items
   // ------------------------------------------------------------------------
   async fn food_insert(&self, item: &FoodItem) -> Result<()> {
      let sql_text = "INSERT INTO foods (id, title, descr, price, prep_time, category, image, owner, \
         active, favorites, keywords, rating, rating_count, created_at, updated_at) \
         VALUES ($1::VARCHAR, $2::VARCHAR, $3::VARCHAR, $4::DOUBLE PRECISION, $5::INTEGER, $6::VARCHAR, \
         $7::VARCHAR, $8::VARCHAR, $9::BOOLEAN, $10::VARCHAR[], $11::VARCHAR[], $12::DOUBLE PRECISION, \
         $13::INTEGER, $14::TIMESTAMPTZ, $15::TIMESTAMPTZ)";

      let prep_time = item.prep_time as i32;
      let rating_count = item.rating_count as i32;
      let category = item.category.as_ref();
      let favorites: Vec<String> = item.favorites.iter().cloned().collect();
      let params: Params = &[&item.id,
         &item.title,
         &item.descr,
         &item.price,
         &prep_time,
         &category,
         &item.image,
         &item.owner,
         &item.active,
         &favorites,
         &item.keywords,
         &item.rating,
         &rating_count,
         &item.created_at,
         &item.updated_at];

      self.execute_one(sql_text, params).await
   }

   async fn food(&self, id: &str) -> Result<Option<FoodItem>> {
      let sql_text = format!("{} WHERE id = $1::VARCHAR", FOOD_SELECT);
      let query = self.query_prepared(&sql_text, &[&id]).await?;

      match query.first() {
         Some(row) => Ok(Some(food_from_row(row)?)),
         None => Ok(None),
      }
   }

   async fn foods_active(&self) -> Result<Vec<FoodItem>> {
      let sql_text = format!("{} WHERE active = TRUE ORDER BY created_at DESC", FOOD_SELECT);
      let query = self.query_prepared(&sql_text, &[]).await?;

      query.iter().map(food_from_row).collect()
   }

   async fn food_update(&self, id: &str, update: &FoodUpdate, keywords: Option<Vec<String>>) -> Result<()> {
      // One statement, absent fields fall back to the stored value
      let sql_text = "UPDATE foods SET \
         title = COALESCE($2::VARCHAR, title), \
         descr = COALESCE($3::VARCHAR, descr), \
         price = COALESCE($4::DOUBLE PRECISION, price), \
         prep_time = COALESCE($5::INTEGER, prep_time), \
         category = COALESCE($6::VARCHAR, category), \
         image = COALESCE($7::VARCHAR, image), \
         keywords = COALESCE($8::VARCHAR[], keywords), \
         updated_at = NOW() \
         WHERE id = $1::VARCHAR";

      let prep_time = update.prep_time.map(|minutes| minutes as i32);
      let category = update.category.map(|category| category.as_ref().to_string());
      let params: Params = &[&id,
         &update.title,
         &update.descr,
         &update.price,
         &prep_time,
         &category,
         &update.image,
         &keywords];

      self.execute_one(sql_text, params).await
   }

   async fn food_set_active(&self, id: &str, active: bool) -> Result<()> {
      let sql_text = "UPDATE foods SET active = $2::BOOLEAN, updated_at = NOW() WHERE id = $1::VARCHAR";
      self.execute_one(sql_text, &[&id, &active]).await
   }

   async fn food_rate(&self, id: &str, value: f64) -> Result<(f64, u32)> {
      // The fold runs server-side, mean and count move in one statement
      let sql_text = "UPDATE foods SET \
         rating = (round(((rating * rating_count + $2::DOUBLE PRECISION) / (rating_count + 1))::NUMERIC, 1))::DOUBLE PRECISION, \
         rating_count = rating_count + 1, \
         updated_at = NOW() \
         WHERE id = $1::VARCHAR \
         RETURNING rating, rating_count";

      let query = self.query_prepared(sql_text, &[&id, &value]).await?;

      match query.first() {
         Some(row) => Ok((row.get(0), row.get::<_, i32>(1) as u32)),
         None => Err(Error::not_found("Food item", id)),
      }
   }

   async fn food_set_favorite(&self, id: &str, user_id: &str, favorite: bool) -> Result<()> {
      // Server-side array ops, concurrent flips by different users don't clash
      let sql_text = if favorite {
         "UPDATE foods SET favorites = array_append(favorites, $2::VARCHAR), updated_at = NOW() \
            WHERE id = $1::VARCHAR AND NOT (favorites @> ARRAY[$2::VARCHAR])"
      } else {
         "UPDATE foods SET favorites = array_remove(favorites, $2::VARCHAR), updated_at = NOW() \
            WHERE id = $1::VARCHAR"
      };

      // Zero affected rows means the membership already was as requested
      self.execute_prepared(sql_text, &[&id, &user_id]).await?;
      Ok(())
   }

   async fn foods_favorited(&self, user_id: &str) -> Result<Vec<FoodItem>> {
      let sql_text = format!("{} WHERE active = TRUE AND favorites @> ARRAY[$1::VARCHAR]", FOOD_SELECT);
      let query = self.query_prepared(&sql_text, &[&user_id]).await?;

      query.iter().map(food_from_row).collect()
   }

   async fn food_search(&self, tokens: &[String]) -> Result<Vec<FoodItem>> {
      let sql_text = format!("{} WHERE active = TRUE AND keywords && $1::VARCHAR[]", FOOD_SELECT);
      let tokens = tokens.to_vec();
      let query = self.query_prepared(&sql_text, &[&tokens]).await?;

      query.iter().map(food_from_row).collect()
   }

   // ------------------------------------------------------------------------
   // Carts
   // ------------------------------------------------------------------------
   async fn cart(&self, user_id: &str) -> Result<Option<Cart>> {
      let sql_text = "SELECT food_id, title, price, amount, image, created_at, updated_at \
         FROM cart_lines WHERE user_id = $1::VARCHAR";

      let query = self.query_prepared(sql_text, &[&user_id]).await?;
      if query.is_empty() {
         return Ok(None);
      }

      // The cart timestamps are recovered from its lines
      let mut created_at: DateTime<Utc> = query[0].get(5);
      let mut updated_at: DateTime<Utc> = query[0].get(6);
      let lines = query.iter()
      .map(|row| {
         created_at = created_at.min(row.get(5));
         updated_at = updated_at.max(row.get(6));
         CartLine {
            food_id: row.get(0),
            title: row.get(1),
            price: row.get(2),
            amount: row.get::<_, i32>(3) as u32,
            image: row.get(4),
         }
      })
      .collect();

      Ok(Some(Cart::with_lines(user_id, lines, created_at, updated_at)))
   }

   async fn cart_merge(&self, user_id: &str, line: &CartLine) -> Result<()> {
      // Upsert keeps the stored price and picture, only the amount grows
      let sql_text = "INSERT INTO cart_lines AS c (user_id, food_id, title, price, amount, image, created_at, updated_at) \
         VALUES ($1::VARCHAR, $2::VARCHAR, $3::VARCHAR, $4::DOUBLE PRECISION, $5::INTEGER, $6::VARCHAR, NOW(), NOW()) \
         ON CONFLICT ON CONSTRAINT cart_lines_pkey DO \
         UPDATE SET amount = c.amount + EXCLUDED.amount, updated_at = NOW()";

      let amount = line.amount as i32;
      let params: Params = &[&user_id,
         &line.food_id,
         &line.title,
         &line.price,
         &amount,
         &line.image];

      self.execute_one(sql_text, params).await
   }

   async fn cart_set_amount(&self, user_id: &str, food_id: &str, amount: u32) -> Result<bool> {
      let sql_text = "UPDATE cart_lines SET amount = $3::INTEGER, updated_at = NOW() \
         WHERE user_id = $1::VARCHAR AND food_id = $2::VARCHAR";

      let amount = amount as i32;
      let updated = self.execute_prepared(sql_text, &[&user_id, &food_id, &amount]).await?;
      Ok(updated == 1)
   }

   async fn cart_remove(&self, user_id: &str, food_id: &str) -> Result<()> {
      let sql_text = "DELETE FROM cart_lines WHERE user_id = $1::VARCHAR AND food_id = $2::VARCHAR";
      self.execute_prepared(sql_text, &[&user_id, &food_id]).await?;
      Ok(())
   }

   async fn cart_clear(&self, user_id: &str) -> Result<()> {
      let sql_text = "DELETE FROM cart_lines WHERE user_id = $1::VARCHAR";
      self.execute_prepared(sql_text, &[&user_id]).await?;
      Ok(())
   }

   // ------------------------------------------------------------------------
   // Orders
   // ------------------------------------------------------------------------
   async fn order_commit(&self, order: &Order) -> Result<()> {
      let mut client = self.client().await?;

      // Order insert and cart clear commit or roll back together
      let trans = client.transaction()
      .await
      .map_err(|err| Error::persistence(format!("order_commit begin: {}", err)))?;

      let sql_text = "INSERT INTO orders (id, user_id, subtotal, delivery_fee, tax, total, status, \
         addr_label, addr_street, addr_city, addr_phone, payment, created_at, updated_at) \
         VALUES ($1::VARCHAR, $2::VARCHAR, $3::DOUBLE PRECISION, $4::DOUBLE PRECISION, $5::DOUBLE PRECISION, \
         $6::DOUBLE PRECISION, $7::VARCHAR, $8::VARCHAR, $9::VARCHAR, $10::VARCHAR, $11::VARCHAR, \
         $12::VARCHAR, $13::TIMESTAMPTZ, $14::TIMESTAMPTZ)";

      let status = order.status.as_ref();
      let payment = order.payment.as_ref();
      let params: Params = &[&order.id,
         &order.user_id,
         &order.subtotal,
         &order.delivery_fee,
         &order.tax,
         &order.total,
         &status,
         &order.address.label,
         &order.address.street,
         &order.address.city,
         &order.address.phone,
         &payment,
         &order.created_at,
         &order.updated_at];

      trans.execute(sql_text, params)
      .await
      .map_err(|err| Error::persistence(format!("order_commit insert: {}", err)))?;

      let sql_text = "INSERT INTO order_lines (order_id, food_id, title, price, amount, image) \
         VALUES ($1::VARCHAR, $2::VARCHAR, $3::VARCHAR, $4::DOUBLE PRECISION, $5::INTEGER, $6::VARCHAR)";
      for line in &order.lines {
         let amount = line.amount as i32;
         let params: Params = &[&order.id,
            &line.food_id,
            &line.title,
            &line.price,
            &amount,
            &line.image];

         trans.execute(sql_text, params)
         .await
         .map_err(|err| Error::persistence(format!("order_commit line: {}", err)))?;
      }

      let sql_text = "DELETE FROM cart_lines WHERE user_id = $1::VARCHAR";
      trans.execute(sql_text, &[&order.user_id])
      .await
      .map_err(|err| Error::persistence(format!("order_commit clear: {}", err)))?;

      trans.commit()
      .await
      .map_err(|err| Error::persistence(format!("order_commit commit: {}", err)))
   }

   async fn order(&self, id: &str) -> Result<Option<Order>> {
      let client = self.client().await?;

      let sql_text = format!("{} WHERE id = $1::VARCHAR", ORDER_SELECT);
      let statement = client.prepare(&sql_text)
      .await
      .map_err(|err| Error::persistence(format!("order prepare: {}", err)))?;

      let query = client.query(&statement, &[&id])
      .await
      .map_err(|err| Error::persistence(format!("order query: {}", err)))?;

      match query.first() {
         Some(row) => {
            let lines = load_order_lines(&client, id).await?;
            Ok(Some(order_from_row(row, lines)?))
         }
         None => Ok(None),
      }
   }

   async fn orders_by_user(&self, user_id: &str) -> Result<Vec<Order>> {
      let client = self.client().await?;

      let sql_text = format!("{} WHERE user_id = $1::VARCHAR ORDER BY created_at DESC", ORDER_SELECT);
      let statement = client.prepare(&sql_text)
      .await
      .map_err(|err| Error::persistence(format!("orders_by_user prepare: {}", err)))?;

      let query = client.query(&statement, &[&user_id])
      .await
      .map_err(|err| Error::persistence(format!("orders_by_user query: {}", err)))?;

      let mut res = Vec::with_capacity(query.len());
      for row in &query {
         let id: String = row.get(0);
         let lines = load_order_lines(&client, &id).await?;
         res.push(order_from_row(row, lines)?);
      }
      Ok(res)
   }

   async fn order_set_status(&self, id: &str, from: OrderStatus, to: OrderStatus) -> Result<bool> {
      // Conditional on the expected pre-state, a racing change turns this
      // into a no-op instead of an overwrite
      let sql_text = "UPDATE orders SET status = $2::VARCHAR, updated_at = NOW() \
         WHERE id = $1::VARCHAR AND status = $3::VARCHAR";

      let to = to.as_ref();
      let from = from.as_ref();
      let updated = self.execute_prepared(sql_text, &[&id, &to, &from]).await?;
      Ok(updated == 1)
   }

   // ------------------------------------------------------------------------
   // Customers
   // ------------------------------------------------------------------------
   async fn customer_insert(&self, customer: &Customer) -> Result<()> {
      let sql_text = "INSERT INTO customers (user_id, name, email, mobile, kind, address, delivery, created_at) \
         VALUES ($1::VARCHAR, $2::VARCHAR, $3::VARCHAR, $4::VARCHAR, $5::VARCHAR, $6::VARCHAR, $7::VARCHAR, $8::TIMESTAMPTZ)";

      let kind = customer.kind.as_ref();
      let delivery = customer.delivery.as_ref();
      let params: Params = &[&customer.user_id,
         &customer.name,
         &customer.email,
         &customer.mobile,
         &kind,
         &customer.address,
         &delivery,
         &customer.created_at];

      self.execute_one(sql_text, params).await
   }

   async fn customer(&self, user_id: &str) -> Result<Option<Customer>> {
      let sql_text = "SELECT user_id, name, email, mobile, kind, address, delivery, created_at \
         FROM customers WHERE user_id = $1::VARCHAR";

      let query = self.query_prepared(sql_text, &[&user_id]).await?;

      match query.first() {
         Some(row) => Ok(Some(customer_from_row(row)?)),
         None => Ok(None),
      }
   }

   async fn customer_update(&self, user_id: &str, update: &CustomerUpdate) -> Result<()> {
      let sql_text = "UPDATE customers SET \
         name = COALESCE($2::VARCHAR, name), \
         email = COALESCE($3::VARCHAR, email), \
         mobile = COALESCE($4::VARCHAR, mobile), \
         address = COALESCE($5::VARCHAR, address), \
         delivery = COALESCE($6::VARCHAR, delivery) \
         WHERE user_id = $1::VARCHAR";

      let delivery = update.delivery.map(|delivery| delivery.as_ref().to_string());
      let params: Params = &[&user_id,
         &update.name,
         &update.email,
         &update.mobile,
         &update.address,
         &delivery];

      self.execute_one(sql_text, params).await
   }

   async fn customer_delete(&self, user_id: &str) -> Result<()> {
      let sql_text = "DELETE FROM customers WHERE user_id = $1::VARCHAR";
      self.execute_prepared(sql_text, &[&user_id]).await?;
      Ok(())
   }
}
