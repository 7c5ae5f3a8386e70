//! Product record and form.

use serde::{Deserialize, Serialize};

use storeroom_core::ProductId;
use storeroom_storage::TableRecord;

use crate::services::ServiceError;

/// Maximum length for a product name.
const MAX_NAME_LENGTH: usize = 100;
/// Maximum length for a product description.
const MAX_DESCRIPTION_LENGTH: usize = 255;

/// A retail product.
///
/// The unit price is carried as `f64`, matching the stored records; order
/// totals convert it to a fixed-point amount at purchase time.
/// `stock_quantity` is the single invariant-bearing field: it never goes
/// negative, and a purchase is only valid while it is positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    /// Unit price in dollars.
    pub price: f64,
    pub stock_quantity: i64,
    pub category: String,
    /// Blob URL of the product image, if one was uploaded.
    pub image_url: Option<String>,
}

impl Product {
    /// Partition label for product records.
    pub const PARTITION: &'static str = "products";

    /// Whether at least one unit is available for purchase.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }
}

impl TableRecord for Product {
    fn partition_key(&self) -> &'static str {
        Self::PARTITION
    }

    fn row_key(&self) -> String {
        self.id.to_string()
    }
}

/// Form input for creating or editing a product.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock_quantity: i64,
    pub category: String,
}

impl ProductForm {
    /// Validate the form fields.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] describing the first offending
    /// field.
    pub fn validate(&self) -> Result<(), ServiceError> {
        if self.name.trim().is_empty() {
            return Err(ServiceError::Validation("product name is required".to_owned()));
        }
        if self.name.len() > MAX_NAME_LENGTH {
            return Err(ServiceError::Validation(format!(
                "product name cannot exceed {MAX_NAME_LENGTH} characters"
            )));
        }
        if self.description.len() > MAX_DESCRIPTION_LENGTH {
            return Err(ServiceError::Validation(format!(
                "description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
        if !self.price.is_finite() || self.price <= 0.0 {
            return Err(ServiceError::Validation(
                "price must be a positive number".to_owned(),
            ));
        }
        if self.stock_quantity < 0 {
            return Err(ServiceError::Validation(
                "stock quantity cannot be negative".to_owned(),
            ));
        }
        Ok(())
    }

    /// Validate and build a fresh [`Product`] with no image.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if a field is malformed.
    pub fn into_product(self) -> Result<Product, ServiceError> {
        self.validate()?;
        Ok(Product {
            id: ProductId::new(),
            name: self.name.trim().to_owned(),
            description: self.description,
            price: self.price,
            stock_quantity: self.stock_quantity,
            category: self.category,
            image_url: None,
        })
    }

    /// Validate and apply the form fields to an existing record, leaving
    /// the id and image URL untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] if a field is malformed.
    pub fn apply(self, product: &mut Product) -> Result<(), ServiceError> {
        self.validate()?;
        product.name = self.name.trim().to_owned();
        product.description = self.description;
        product.price = self.price;
        product.stock_quantity = self.stock_quantity;
        product.category = self.category;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            name: "Anvil".to_owned(),
            description: "Drop-forged".to_owned(),
            price: 200.0,
            stock_quantity: 3,
            category: "Hardware".to_owned(),
        }
    }

    #[test]
    fn valid_form_builds_product() {
        let product = form().into_product().expect("valid form");
        assert!(product.in_stock());
        assert!(product.image_url.is_none());
    }

    #[test]
    fn zero_stock_is_valid_but_not_purchasable() {
        let mut f = form();
        f.stock_quantity = 0;
        let product = f.into_product().expect("valid form");
        assert!(!product.in_stock());
    }

    #[test]
    fn negative_stock_is_rejected() {
        let mut f = form();
        f.stock_quantity = -1;
        assert!(f.into_product().is_err());
    }

    #[test]
    fn non_positive_price_is_rejected() {
        let mut f = form();
        f.price = 0.0;
        assert!(f.validate().is_err());
        f.price = f64::NAN;
        assert!(f.validate().is_err());
    }

    #[test]
    fn apply_preserves_id_and_image() {
        let mut product = form().into_product().expect("valid form");
        let id = product.id;
        product.image_url = Some("memory://productimages/a.png".to_owned());

        let mut edit = form();
        edit.price = 150.0;
        edit.apply(&mut product).expect("valid edit");

        assert_eq!(product.id, id);
        assert_eq!(product.price, 150.0);
        assert!(product.image_url.is_some());
    }
}
