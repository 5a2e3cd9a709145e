/* ===============================================================================
Mobile food ordering core.
Crate root. 12 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

pub mod environment;
pub mod error;
pub mod food;
pub mod cart;
pub mod orders;
pub mod customer;
pub mod storage;
pub mod database;
pub mod memory;
pub mod media;

pub use error::{Error, Result};
