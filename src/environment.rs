/* ===============================================================================
Mobile food ordering core.
Global vars, pricing constants. 12 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use once_cell::sync::OnceCell;
use std::env;

// Settings
pub static VARS: OnceCell<Vars> = OnceCell::new();

// Flat fee added to every order
pub const DELIVERY_FEE: f64 = 2.99;

// Sales tax applied to the order subtotal
pub const TAX_RATE: f64 = 0.08;

// Enviroment variables
pub struct Vars {
   // Price suffix
   price_unit: String,

   // Media host for item pictures
   media_upload_url: String,
   media_upload_preset: String,
}

impl Vars {
   pub fn from_env() -> Self {
      Vars {
         price_unit: {
            match env::var("PRICE_UNIT") {
               Ok(s) => s,
               Err(e) => {
                  log::info!("Something wrong with PRICE_UNIT: {}", e);
                  String::default()
               }
            }
         },

         media_upload_url: {
            match env::var("MEDIA_UPLOAD_URL") {
               Ok(s) => s,
               Err(e) => {
                  log::info!("Something wrong with MEDIA_UPLOAD_URL: {}", e);
                  String::default()
               }
            }
         },

         media_upload_preset: {
            match env::var("MEDIA_UPLOAD_PRESET") {
               Ok(s) => s,
               Err(e) => {
                  log::info!("Something wrong with MEDIA_UPLOAD_PRESET: {}", e);
                  String::default()
               }
            }
         },
      }
   }
}

// Price with units or bare number if unit not set
pub fn price_with_unit(price: f64) -> String {
   let unit = VARS.get()
   .map(|vars| vars.price_unit.clone())
   .unwrap_or_default();

   format!("{:.2}{}", price, unit)
}

// Media host endpoint
pub fn media_upload_url() -> String {
   VARS.get()
   .map(|vars| vars.media_upload_url.clone())
   .unwrap_or_default()
}

// Media host unsigned preset
pub fn media_upload_preset() -> String {
   VARS.get()
   .map(|vars| vars.media_upload_preset.clone())
   .unwrap_or_default()
}

// Round to cents, away from zero on halves
pub fn round2(value: f64) -> f64 {
   (value * 100.0).round() / 100.0
}

// Round to display precision of ratings
pub fn round1(value: f64) -> f64 {
   (value * 10.0).round() / 10.0
}
