/* ===============================================================================
Mobile food ordering core.
Main module. 12 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::{env, sync::Arc};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};

use foodcourt::{cart::CartService, customer::ProfileService, database,
   database::PgStorage, environment, food::FoodService, media::CloudinaryHost,
   orders::OrderService, storage::Storage,
};

// ============================================================================
// [Run!]
// ============================================================================
#[tokio::main]
async fn main() {
   run().await;
}

async fn run() {
   pretty_env_logger::init();

   log::info!("Starting...");

   // Settings from environments
   let vars = environment::Vars::from_env();
   if environment::VARS.set(vars).is_err() {
      log::info!("Something wrong with VARS");
   }

   // Open database
   let database_url = env::var("DATABASE_URL").expect("DATABASE_URL env variable missing");

   let connector = TlsConnector::builder()
   // .add_root_certificate(cert)
   .danger_accept_invalid_certs(true)
   .build()
   .unwrap();
   let connector = MakeTlsConnector::new(connector);

   let pg_config = database_url.parse::<tokio_postgres::Config>().expect("DATABASE_URL env variable wrong");
   let mgr_config = ManagerConfig {recycling_method: RecyclingMethod::Fast};
   let mgr = Manager::from_config(pg_config, connector, mgr_config);
   let pool = Pool::builder(mgr).max_size(16).build().unwrap();

   // Test connection to database
   let test_pool = pool.clone();
   tokio::spawn(async move {
      if let Err(e) = test_pool.get().await {
         log::error!("Database connection error: {}", e);
      }
   });

   let store = PgStorage::new(pool);

   // Check and create tables
   if store.is_tables_exist().await {
      log::info!("Table foods exist, open existing data");
   } else {
      log::info!("Table foods do not exist, create new tables: {}", database::is_success(store.create_tables().await));
   }

   // Services share one store, the transport layer above gets these by clone
   let store: Arc<dyn Storage> = Arc::new(store);
   let foods = FoodService::new(Arc::clone(&store), Arc::new(CloudinaryHost::new()));
   let _carts = CartService::new(Arc::clone(&store));
   let _orders = OrderService::new(Arc::clone(&store));
   let _profiles = ProfileService::new(Arc::clone(&store));

   match foods.active_foods().await {
      Ok(items) => log::info!("Services ready, {} items on the menu", items.len()),
      Err(err) => log::error!("Services ready but the menu is unreachable: {}", err),
   }
}
