/* ===============================================================================
Mobile food ordering core.
Menu item, ratings and favorites. 16 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use std::collections::HashSet;
use std::sync::Arc;
use chrono::{DateTime, Utc};
use strum::{AsRefStr, EnumString};
use uuid::Uuid;

use crate::environment as env;
use crate::error::{Error, Result};
use crate::media::MediaHost;
use crate::storage::Storage;

// ============================================================================
// [Menu item]
// ============================================================================

// Fixed set of menu sections
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, EnumString)]
pub enum Category {
   #[strum(to_string = "Appetizer")]
   Appetizer,
   #[strum(to_string = "Main Course")]
   MainCourse,
   #[strum(to_string = "Dessert")]
   Dessert,
   #[strum(to_string = "Beverage")]
   Beverage,
}

#[derive(Debug, Clone)]
pub struct FoodItem {
   pub id: String,
   pub title: String,
   pub descr: String,
   pub price: f64,
   pub prep_time: u32, // minutes
   pub category: Category,
   pub image: String, // hosted URL, empty if none
   pub owner: String, // provider user id
   pub active: bool, // soft delete flag, items are never hard-deleted
   pub favorites: HashSet<String>, // user ids
   pub keywords: Vec<String>, // derived from title and category
   pub rating: f64, // running mean, 0..=5
   pub rating_count: u32,
   pub created_at: DateTime<Utc>,
   pub updated_at: DateTime<Utc>,
}

impl FoodItem {
   pub fn is_favorite(&self, user_id: &str) -> bool {
      self.favorites.contains(user_id)
   }
}

// Lower-cased tokens of title and category, for the keyword search
pub fn keywords_for(title: &str, category: Category) -> Vec<String> {
   title.split_whitespace()
   .chain(category.as_ref().split_whitespace())
   .map(|word| word.to_lowercase())
   .collect()
}

// Fold one more rating into the running mean, kept at display precision
pub fn fold_rating(rating: f64, count: u32, value: f64) -> (f64, u32) {
   let new_count = count + 1;
   let new_rating = (rating * count as f64 + value) / new_count as f64;
   (env::round1(new_rating), new_count)
}

// Payload for a new menu item
pub struct NewFood {
   pub title: String,
   pub descr: String,
   pub price: f64,
   pub prep_time: u32,
   pub category: Category,
   pub image: Option<Vec<u8>>, // raw picture bytes for the media host
}

// Partial update, None leaves the field untouched
#[derive(Default)]
pub struct FoodUpdate {
   pub title: Option<String>,
   pub descr: Option<String>,
   pub price: Option<f64>,
   pub prep_time: Option<u32>,
   pub category: Option<Category>,
   pub image: Option<String>, // already hosted URL
}

// ============================================================================
// [Catalog operations]
// ============================================================================

pub struct FoodService {
   store: Arc<dyn Storage>,
   media: Arc<dyn MediaHost>,
}

impl FoodService {
   pub fn new(store: Arc<dyn Storage>, media: Arc<dyn MediaHost>) -> Self {
      Self { store, media }
   }

   pub async fn create(&self, owner: &str, food: NewFood) -> Result<String> {
      if owner.is_empty() {
         return Err(Error::Validation(String::from("User ID is required")));
      }
      if food.price < 0.0 {
         return Err(Error::Validation(format!("Price cannot be negative, got {}", food.price)));
      }

      // Picture goes to the media host first, only the URL is stored
      let image = match food.image {
         Some(bytes) => {
            let filename = format!("food_{}.jpg", Uuid::new_v4());
            self.media.upload(bytes, &filename).await?
         }
         None => String::default(),
      };

      let now = Utc::now();
      let item = FoodItem {
         id: Uuid::new_v4().to_string(),
         keywords: keywords_for(&food.title, food.category),
         title: food.title,
         descr: food.descr,
         price: food.price,
         prep_time: food.prep_time,
         category: food.category,
         image,
         owner: owner.to_string(),
         active: true,
         favorites: HashSet::new(),
         rating: 0.0,
         rating_count: 0,
         created_at: now,
         updated_at: now,
      };

      self.store.food_insert(&item).await?;
      Ok(item.id)
   }

   pub async fn food(&self, id: &str) -> Result<FoodItem> {
      self.store.food(id)
      .await?
      .ok_or_else(|| Error::not_found("Food item", id))
   }

   pub async fn active_foods(&self) -> Result<Vec<FoodItem>> {
      self.store.foods_active().await
   }

   // Owner-only update, keywords follow the title and category
   pub async fn update(&self, id: &str, user_id: &str, update: FoodUpdate) -> Result<()> {
      let item = self.food(id).await?;
      if item.owner != user_id {
         return Err(Error::Unauthorized(String::from("Only the item owner may update it")));
      }

      let keywords = if update.title.is_some() || update.category.is_some() {
         let title = update.title.as_deref().unwrap_or(&item.title);
         let category = update.category.unwrap_or(item.category);
         Some(keywords_for(title, category))
      } else {
         None
      };

      self.store.food_update(id, &update, keywords).await
   }

   // Soft delete, past orders keep referring to the item
   pub async fn remove(&self, id: &str, user_id: &str) -> Result<()> {
      let item = self.food(id).await?;
      if item.owner != user_id {
         return Err(Error::Unauthorized(String::from("Only the item owner may delete it")));
      }
      self.store.food_set_active(id, false).await
   }

   // Returns the new mean and count
   pub async fn rate(&self, id: &str, value: f64) -> Result<(f64, u32)> {
      if !(1.0..=5.0).contains(&value) {
         return Err(Error::Validation(format!("Rating must be between 1 and 5, got {}", value)));
      }

      // The store folds mean and count in a single atomic update
      self.store.food_rate(id, value).await
   }

   // Flips the user's membership, returns the new state
   pub async fn toggle_favorite(&self, id: &str, user_id: &str) -> Result<bool> {
      if user_id.is_empty() {
         return Err(Error::Validation(String::from("User ID is required")));
      }

      let item = self.food(id).await?;
      let favorite = !item.is_favorite(user_id);
      self.store.food_set_favorite(id, user_id, favorite).await?;
      Ok(favorite)
   }

   pub async fn favorites(&self, user_id: &str) -> Result<Vec<FoodItem>> {
      self.store.foods_favorited(user_id).await
   }

   pub async fn search(&self, pattern: &str) -> Result<Vec<FoodItem>> {
      let tokens: Vec<String> = pattern.split_whitespace()
      .map(|word| word.to_lowercase())
      .collect();

      if tokens.is_empty() {
         return Ok(Vec::new());
      }
      self.store.food_search(&tokens).await
   }
}

// ============================================================================
// [Tests]
// ============================================================================
#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn keywords_from_title_and_category() {
      let keywords = keywords_for("Pad Thai", Category::MainCourse);
      assert_eq!(keywords, vec!["pad", "thai", "main", "course"]);
   }

   #[test]
   fn rating_folds_into_running_mean() {
      // (4.0 * 2 + 5) / 3 = 4.333... rounds to 4.3
      assert_eq!(fold_rating(4.0, 2, 5.0), (4.3, 3));

      // First rating becomes the mean itself
      assert_eq!(fold_rating(0.0, 0, 4.0), (4.0, 1));
   }

   #[test]
   fn rating_stays_in_bounds() {
      let (rating, count) = fold_rating(5.0, 100, 5.0);
      assert_eq!((rating, count), (5.0, 101));
   }
}
