//! Multipart form parsing for the restaurant create and edit endpoints.
//!
//! Field names follow the browser forms:
//!
//! ```text
//! name, note                   text
//! categories                   repeated text
//! image_1 .. image_5           files, create only
//! deleteImageIds               repeated integer, edit only
//! newImage_1 .. newImage_5     files, edit only
//! ```
//!
//! Unknown fields are ignored.

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use savor_core::image_slots::is_valid_slot;
use savor_core::storage::Upload;
use savor_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::services::{NewRestaurant, RestaurantEdit};

const IMAGE_PREFIX: &str = "image_";
const NEW_IMAGE_PREFIX: &str = "newImage_";

/// Raw contents of a restaurant form.
#[derive(Debug, Default)]
pub struct RestaurantForm {
    pub name: String,
    pub note: Option<String>,
    pub categories: Vec<String>,
    /// `image_N` files keyed by N.
    pub images: Vec<(i32, Upload)>,
    pub delete_image_ids: Vec<DbId>,
    /// `newImage_N` files keyed by N.
    pub new_images: Vec<(i32, Upload)>,
}

impl RestaurantForm {
    /// Drain a multipart body into a form.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(multipart_error)?
        {
            let name = field.name().unwrap_or("").to_string();

            if let Some(slot) = slot_of(&name, IMAGE_PREFIX) {
                let upload = read_upload(field).await?;
                form.images.push((slot, upload));
                continue;
            }
            if let Some(slot) = slot_of(&name, NEW_IMAGE_PREFIX) {
                let upload = read_upload(field).await?;
                form.new_images.push((slot, upload));
                continue;
            }

            match name.as_str() {
                "name" => form.name = read_text(field).await?,
                "note" => form.note = Some(read_text(field).await?),
                "categories" | "categories[]" => form.categories.push(read_text(field).await?),
                "deleteImageIds" | "deleteImageIds[]" => {
                    let raw = read_text(field).await?;
                    form.delete_image_ids.extend(parse_image_id(&raw));
                }
                _ => {} // ignore unknown fields
            }
        }

        Ok(form)
    }

    pub fn into_new_restaurant(self) -> NewRestaurant {
        NewRestaurant {
            name: self.name,
            note: self.note,
            category_names: self.categories,
            images: self.images,
        }
    }

    /// New photos are taken in field order `newImage_1`, `newImage_2`, ...
    pub fn into_edit(mut self) -> RestaurantEdit {
        self.new_images.sort_by_key(|(slot, _)| *slot);
        RestaurantEdit {
            name: self.name,
            note: self.note,
            category_names: self.categories,
            delete_image_ids: self.delete_image_ids,
            new_images: self.new_images.into_iter().map(|(_, upload)| upload).collect(),
        }
    }
}

/// Body-limit failures keep their 413; anything else is a malformed form.
fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(err.body_text())
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(multipart_error)
}

async fn read_upload(field: axum::extract::multipart::Field<'_>) -> AppResult<Upload> {
    let file_name = field.file_name().unwrap_or("upload").to_string();
    let data = field
        .bytes()
        .await
        .map_err(multipart_error)?;
    Ok(Upload::new(file_name, data.to_vec()))
}

/// `image_3` with prefix `image_` gives slot 3. Out-of-range slots are not
/// photo fields.
fn slot_of(field: &str, prefix: &str) -> Option<i32> {
    field
        .strip_prefix(prefix)?
        .parse::<i32>()
        .ok()
        .filter(|slot| is_valid_slot(*slot))
}

/// Keep only positive integer ids; anything else is silently skipped.
fn parse_image_id(raw: &str) -> Option<DbId> {
    raw.trim().parse::<DbId>().ok().filter(|id| *id > 0)
}
