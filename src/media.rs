/* ===============================================================================
Mobile food ordering core.
Picture hosting. 27 Mar 2023.
----------------------------------------------------------------------------
Licensed under the terms of the GPL version 3.
http://www.gnu.org/licenses/gpl-3.0.html
Copyright (c) 2020-2023 by Artem Khomenko _mag12@yahoo.com.
=============================================================================== */

use async_trait::async_trait;
use reqwest::multipart;

use crate::environment as env;
use crate::error::{Error, Result};

/// Puts a picture somewhere public and returns its URL.
#[async_trait]
pub trait MediaHost: Send + Sync {
   async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String>;
}

// ============================================================================
// [Cloudinary]
// ============================================================================

// Unsigned upload with a preset, the answer carries the public link
pub struct CloudinaryHost {
   client: reqwest::Client,
}

impl CloudinaryHost {
   pub fn new() -> Self {
      Self { client: reqwest::Client::new() }
   }
}

impl Default for CloudinaryHost {
   fn default() -> Self {
      Self::new()
   }
}

#[async_trait]
impl MediaHost for CloudinaryHost {
   async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String> {
      let part = multipart::Part::bytes(bytes)
      .file_name(filename.to_string())
      .mime_str("image/jpeg")
      .map_err(|err| Error::persistence(format!("upload mime: {}", err)))?;

      let form = multipart::Form::new()
      .part("file", part)
      .text("upload_preset", env::media_upload_preset());

      let resp = self.client.post(env::media_upload_url())
      .multipart(form)
      .send()
      .await
      .map_err(|err| Error::persistence(format!("upload send: {}", err)))?;

      if !resp.status().is_success() {
         return Err(Error::persistence(format!("upload status: {}", resp.status())));
      }

      let body: serde_json::Value = resp.json()
      .await
      .map_err(|err| Error::persistence(format!("upload decode: {}", err)))?;

      body.get("secure_url")
      .and_then(|url| url.as_str())
      .map(String::from)
      .ok_or_else(|| Error::persistence(String::from("upload answer without secure_url")))
   }
}
