/* ===============================================================================
Mobile food ordering core.
Error taxonomy. 14 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Error)]
pub enum Error {
   #[error("{0}")]
   Validation(String),

   #[error("{0} not found")]
   NotFound(String),

   #[error("Cart is empty")]
   EmptyCart,

   #[error("Order status cannot change from '{from}' to '{to}'")]
   InvalidTransition { from: String, to: String },

   #[error("{0}")]
   Unauthorized(String),

   // Display stays generic for the user, the detail goes to the log only
   #[error("Operation failed, please retry")]
   Persistence(String),
}

impl Error {
   pub fn persistence(detail: String) -> Self {
      log::error!("{}", detail);
      Self::Persistence(detail)
   }

   pub fn not_found(what: &str, id: &str) -> Self {
      Self::NotFound(format!("{} '{}'", what, id))
   }
}
