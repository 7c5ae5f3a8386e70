//! Retail service: CRUD, the order workflow, activity feed, documents.
//!
//! Every method performs a small number of sequential storage calls with
//! no cross-call locking. In particular, the purchase path writes the
//! order and then decrements stock as two independent writes; there is no
//! transaction spanning them, and two racing purchases can both observe
//! positive stock. Both gaps are long-standing behavior of this system and
//! are pinned down by the test suite rather than papered over here.

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::{instrument, warn};

use storeroom_core::{CustomerId, Money, OrderId, OrderStatus, ProductId};
use storeroom_storage::{
    ActivityEnvelope, BlobStore, FileStore, Precondition, QueueStore, StorageError, TableStore,
    blob_name_from_url,
};

use crate::models::{Customer, NewCustomer, Order, OrderSnapshot, Product, ProductForm,
    UpdateCustomer};
use crate::services::{ServiceError, Upload};

// Table and storage names
pub const CUSTOMERS_TABLE: &str = "customers";
pub const PRODUCTS_TABLE: &str = "products";
pub const ORDERS_TABLE: &str = "orders";
/// Blob container for product images.
pub const IMAGES_CONTAINER: &str = "productimages";
/// Queue for human-readable activity messages.
pub const ACTIVITY_QUEUE: &str = "retailactivities";
/// File share for policy documents and customer ID images.
pub const DOCUMENTS_SHARE: &str = "documents";
/// File share for supplier contracts.
pub const CONTRACTS_SHARE: &str = "contracts";

/// Completed orders older than this are reported as overdue.
const OVERDUE_AFTER_DAYS: i64 = 30;

/// Shown when the activity queue cannot be read.
const ACTIVITIES_UNAVAILABLE: &str = "Failed to load activities";

/// Summary statistics for the dashboard.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DashboardStats {
    pub total_customers: usize,
    pub total_products: usize,
    pub total_orders: usize,
    /// Units in stock across all products.
    pub available_stock: i64,
    /// Sum of completed order totals.
    pub total_revenue: Money,
}

/// The retail service, generic over its four storage backends.
///
/// Stores are injected at construction; there is no global configuration.
#[derive(Debug, Clone)]
pub struct RetailService<T, B, Q, F> {
    tables: T,
    blobs: B,
    queue: Q,
    files: F,
}

impl<T, B, Q, F> RetailService<T, B, Q, F>
where
    T: TableStore,
    B: BlobStore,
    Q: QueueStore,
    F: FileStore,
{
    /// Create a service over the given stores.
    pub const fn new(tables: T, blobs: B, queue: Q, files: F) -> Self {
        Self {
            tables,
            blobs,
            queue,
            files,
        }
    }

    // -------------------- Customers --------------------

    /// Register a new customer, optionally storing an ID image on the
    /// documents share.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for malformed form input, or a
    /// storage error if a write fails.
    #[instrument(skip_all)]
    pub async fn add_customer(
        &self,
        form: NewCustomer,
        id_image: Option<Upload>,
    ) -> Result<Customer, ServiceError> {
        let mut customer = form.into_customer()?;

        if let Some(image) = id_image.filter(|i| !i.is_empty()) {
            let path = format!("{}-{}", customer.id, image.file_name);
            self.files
                .upload(DOCUMENTS_SHARE, &path, image.bytes)
                .await?;
            customer.id_image_path = Some(path);
        }

        self.tables.insert(CUSTOMERS_TABLE, &customer).await?;
        self.notify(&format!(
            "New customer registered: {}",
            customer.full_name()
        ))
        .await;
        Ok(customer)
    }

    /// All customers.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub async fn customers(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(self
            .tables
            .query(CUSTOMERS_TABLE, Customer::PARTITION)
            .await?)
    }

    /// A single customer by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the customer does not exist.
    pub async fn customer(&self, id: CustomerId) -> Result<Customer, ServiceError> {
        self.find_customer(id)
            .await?
            .ok_or(ServiceError::NotFound("customer"))
    }

    /// Update a customer's mutable contact fields.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the customer does not exist,
    /// or [`ServiceError::Validation`] for malformed input.
    #[instrument(skip(self, update), fields(customer = %id))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        update: UpdateCustomer,
    ) -> Result<Customer, ServiceError> {
        let mut customer = self.customer(id).await?;
        update.apply(&mut customer)?;
        self.tables
            .update(CUSTOMERS_TABLE, &customer, Precondition::Any)
            .await?;
        Ok(customer)
    }

    /// Delete a customer record.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the customer does not exist.
    #[instrument(skip(self), fields(customer = %id))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), ServiceError> {
        let customer = self.customer(id).await?;
        self.tables
            .delete(CUSTOMERS_TABLE, Customer::PARTITION, &id.to_string())
            .await?;
        self.notify(&format!("Customer deleted: {}", customer.full_name()))
            .await;
        Ok(())
    }

    // -------------------- Products --------------------

    /// Add a new product, optionally uploading its image to blob storage.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for malformed form input, or a
    /// storage error if a write fails.
    #[instrument(skip_all)]
    pub async fn add_product(
        &self,
        form: ProductForm,
        image: Option<Upload>,
    ) -> Result<Product, ServiceError> {
        let mut product = form.into_product()?;

        if let Some(image) = image.filter(|i| !i.is_empty()) {
            let url = self
                .blobs
                .upload(IMAGES_CONTAINER, &image.file_name, image.bytes)
                .await?;
            product.image_url = Some(url);
        }

        self.tables.insert(PRODUCTS_TABLE, &product).await?;
        self.notify(&format!("New product added: '{}'", product.name))
            .await;
        Ok(product)
    }

    /// All products.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub async fn products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self
            .tables
            .query(PRODUCTS_TABLE, Product::PARTITION)
            .await?)
    }

    /// A single product by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the product does not exist.
    pub async fn product(&self, id: ProductId) -> Result<Product, ServiceError> {
        self.find_product(id)
            .await?
            .ok_or(ServiceError::NotFound("product"))
    }

    /// Update a product from form fields, optionally replacing its image.
    ///
    /// The stored record is re-read and the form applied to it, so fields
    /// outside the form (id, image URL) survive.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the product does not exist,
    /// or [`ServiceError::Validation`] for malformed input.
    #[instrument(skip(self, form, image), fields(product = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        form: ProductForm,
        image: Option<Upload>,
    ) -> Result<Product, ServiceError> {
        let mut product = self.product(id).await?;
        form.apply(&mut product)?;

        if let Some(image) = image.filter(|i| !i.is_empty()) {
            let url = self
                .blobs
                .upload(IMAGES_CONTAINER, &image.file_name, image.bytes)
                .await?;
            product.image_url = Some(url);
        }

        self.tables
            .update(PRODUCTS_TABLE, &product, Precondition::Any)
            .await?;
        self.notify(&format!("Product updated: '{}'", product.name))
            .await;
        Ok(product)
    }

    /// Delete a product, best-effort removing its image blob first.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the product does not exist.
    #[instrument(skip(self), fields(product = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ServiceError> {
        let product = self.product(id).await?;

        if let Some(name) = product.image_url.as_deref().and_then(blob_name_from_url)
            && let Err(err) = self.blobs.delete(IMAGES_CONTAINER, name).await
        {
            warn!(error = %err, blob = name, "failed to delete product image");
        }

        self.tables
            .delete(PRODUCTS_TABLE, Product::PARTITION, &id.to_string())
            .await?;
        self.notify(&format!("Product deleted: '{}'", product.name))
            .await;
        Ok(())
    }

    // -------------------- Order workflow --------------------

    /// Place an order: one unit of `product_id` for `customer_id`.
    ///
    /// Creates a Completed order with the total fixed at the product's
    /// current price, then decrements stock by exactly one. The two writes
    /// are independent; there is no idempotency key, so repeating the call
    /// places a second order and decrements stock again.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::InvalidOperation`] if either id does not
    /// resolve or the product is out of stock; storage failures propagate
    /// unchanged.
    #[instrument(skip(self), fields(customer = %customer_id, product = %product_id))]
    pub async fn purchase(
        &self,
        customer_id: CustomerId,
        product_id: ProductId,
    ) -> Result<Order, ServiceError> {
        let customer = self.find_customer(customer_id).await?;
        let product = self.find_product(product_id).await?;

        let (Some(customer), Some(mut product)) = (customer, product) else {
            return Err(ServiceError::InvalidOperation("invalid product or customer"));
        };
        if !product.in_stock() {
            return Err(ServiceError::InvalidOperation("invalid product or customer"));
        }

        let total = Money::from_f64(product.price)
            .map_err(|e| ServiceError::Validation(format!("product price: {e}")))?;
        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            customer_id,
            product_id,
            order_date: now,
            total_amount: total,
            status: OrderStatus::Completed,
            snapshot: OrderSnapshot::freeze(&customer, &product, total),
            updated_at: now,
        };

        self.tables.insert(ORDERS_TABLE, &order).await?;

        // Second, independent write: stock decrement. Unconditional; a
        // failure here leaves the order recorded against undecremented
        // stock.
        product.stock_quantity -= 1;
        self.tables
            .update(PRODUCTS_TABLE, &product, Precondition::Any)
            .await?;

        self.notify(&format!(
            "Order placed: {} bought '{}' for {}",
            order.snapshot.full_name, order.snapshot.product_name, order.snapshot.formatted_price
        ))
        .await;
        Ok(order)
    }

    /// Return a completed order, restoring one unit of stock.
    ///
    /// Only `Completed` orders can be returned; the status check is the
    /// sole safeguard against a double increment. If the product has been
    /// deleted since purchase, the stock increment is skipped silently and
    /// the order still becomes `Returned`.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the order does not exist, or
    /// [`ServiceError::InvalidOperation`] if it is not in `Completed`
    /// status.
    #[instrument(skip(self), fields(order = %order_id))]
    pub async fn return_order(&self, order_id: OrderId) -> Result<Order, ServiceError> {
        let mut order = self.order(order_id).await?;

        if !order.status.can_return() {
            return Err(ServiceError::InvalidOperation("order is not active"));
        }

        order.status = OrderStatus::Returned;
        order.updated_at = Utc::now();
        self.tables
            .update(ORDERS_TABLE, &order, Precondition::Any)
            .await?;

        // Restore stock unless the product has been deleted in the meantime.
        match self.find_product(order.product_id).await? {
            Some(mut product) => {
                product.stock_quantity += 1;
                self.tables
                    .update(PRODUCTS_TABLE, &product, Precondition::Any)
                    .await?;
            }
            None => {
                warn!(product = %order.product_id, "returned order references a deleted product; stock not restored");
            }
        }

        self.notify(&format!(
            "Product returned: '{}' by {}",
            order.snapshot.product_name, order.snapshot.full_name
        ))
        .await;
        Ok(order)
    }

    /// A single order by id.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the order does not exist.
    pub async fn order(&self, id: OrderId) -> Result<Order, ServiceError> {
        match self
            .tables
            .get::<Order>(ORDERS_TABLE, Order::PARTITION, &id.to_string())
            .await
        {
            Ok(versioned) => Ok(versioned.into_record()),
            Err(StorageError::NotFound) => Err(ServiceError::NotFound("order")),
            Err(err) => Err(err.into()),
        }
    }

    /// All completed (active) orders.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub async fn completed_orders(&self) -> Result<Vec<Order>, ServiceError> {
        let orders: Vec<Order> = self.tables.query(ORDERS_TABLE, Order::PARTITION).await?;
        Ok(orders
            .into_iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .collect())
    }

    /// Completed orders older than thirty days.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the query fails.
    pub async fn overdue_orders(&self) -> Result<Vec<Order>, ServiceError> {
        let cutoff = Utc::now() - Duration::days(OVERDUE_AFTER_DAYS);
        Ok(self
            .completed_orders()
            .await?
            .into_iter()
            .filter(|o| o.order_date < cutoff)
            .collect())
    }

    /// Administrative delete of an order record.
    ///
    /// Bypasses the workflow entirely: no stock adjustment, no status
    /// check.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the order does not exist.
    #[instrument(skip(self), fields(order = %id))]
    pub async fn delete_order(&self, id: OrderId) -> Result<(), ServiceError> {
        match self
            .tables
            .delete(ORDERS_TABLE, Order::PARTITION, &id.to_string())
            .await
        {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound) => Err(ServiceError::NotFound("order")),
            Err(err) => Err(err.into()),
        }
    }

    // -------------------- Activity tracking --------------------

    /// Send an activity message, discarding any failure.
    ///
    /// Notifications are best effort and must never fail the operation
    /// that emitted them; the send result is logged and dropped.
    pub async fn notify(&self, message: &str) {
        if let Err(err) = self.queue.send(ACTIVITY_QUEUE, message).await {
            warn!(error = %err, "failed to send activity notification");
        }
    }

    /// The most recent activity messages, formatted for display.
    ///
    /// Envelope bodies render as `[timestamp] message`; bodies that fail
    /// to parse are passed through verbatim. A queue outage yields a
    /// single placeholder line rather than an error.
    pub async fn recent_activities(&self, max: usize) -> Vec<String> {
        let bodies = match self.queue.peek(ACTIVITY_QUEUE, max).await {
            Ok(bodies) => bodies,
            Err(err) => {
                warn!(error = %err, "failed to read activity queue");
                return vec![ACTIVITIES_UNAVAILABLE.to_owned()];
            }
        };
        bodies
            .into_iter()
            .map(|body| match serde_json::from_str::<ActivityEnvelope>(&body) {
                Ok(envelope) => {
                    format!("[{}] {}", envelope.timestamp.to_rfc3339(), envelope.message)
                }
                Err(_) => body,
            })
            .collect()
    }

    // -------------------- Documents and contracts --------------------

    /// Upload a policy document to the documents share.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an empty upload, or a
    /// storage error if the write fails.
    pub async fn upload_document(&self, file: Upload) -> Result<(), ServiceError> {
        if file.is_empty() || file.file_name.trim().is_empty() {
            return Err(ServiceError::Validation("invalid file".to_owned()));
        }
        self.files
            .upload(DOCUMENTS_SHARE, &file.file_name, file.bytes)
            .await?;
        self.notify(&format!("Document uploaded: {}", file.file_name))
            .await;
        Ok(())
    }

    /// Names of all uploaded documents.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the listing fails.
    pub async fn documents(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.files.list(DOCUMENTS_SHARE).await?)
    }

    /// Download a document by name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the document does not exist.
    pub async fn download_document(&self, file_name: &str) -> Result<Vec<u8>, ServiceError> {
        match self.files.download(DOCUMENTS_SHARE, file_name).await {
            Ok(bytes) => Ok(bytes),
            Err(StorageError::NotFound) => Err(ServiceError::NotFound("document")),
            Err(err) => Err(err.into()),
        }
    }

    /// Upload a supplier contract to the contracts share.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] for an empty upload, or a
    /// storage error if the write fails.
    pub async fn upload_contract(&self, file: Upload) -> Result<(), ServiceError> {
        if file.is_empty() || file.file_name.trim().is_empty() {
            return Err(ServiceError::Validation("invalid file".to_owned()));
        }
        self.files
            .upload(CONTRACTS_SHARE, &file.file_name, file.bytes)
            .await?;
        Ok(())
    }

    /// Names of all uploaded contracts.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the listing fails.
    pub async fn contracts(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.files.list(CONTRACTS_SHARE).await?)
    }

    /// Download a contract by name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] if the contract does not exist.
    pub async fn download_contract(&self, file_name: &str) -> Result<Vec<u8>, ServiceError> {
        match self.files.download(CONTRACTS_SHARE, file_name).await {
            Ok(bytes) => Ok(bytes),
            Err(StorageError::NotFound) => Err(ServiceError::NotFound("contract")),
            Err(err) => Err(err.into()),
        }
    }

    // -------------------- Dashboard --------------------

    /// Summary statistics across customers, products and completed orders.
    ///
    /// # Errors
    ///
    /// Returns a storage error if a query fails.
    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ServiceError> {
        let customers = self.customers().await?;
        let products = self.products().await?;
        let orders = self.completed_orders().await?;

        let available_stock = products.iter().map(|p| p.stock_quantity).sum();
        let total_revenue = orders
            .iter()
            .map(|o| o.total_amount.amount())
            .sum::<Decimal>();

        Ok(DashboardStats {
            total_customers: customers.len(),
            total_products: products.len(),
            total_orders: orders.len(),
            available_stock,
            total_revenue: Money::new(total_revenue),
        })
    }

    // -------------------- Lookups --------------------

    /// Customer lookup mapping absence to `None`.
    async fn find_customer(&self, id: CustomerId) -> Result<Option<Customer>, ServiceError> {
        match self
            .tables
            .get::<Customer>(CUSTOMERS_TABLE, Customer::PARTITION, &id.to_string())
            .await
        {
            Ok(versioned) => Ok(Some(versioned.into_record())),
            Err(StorageError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Product lookup mapping absence to `None`.
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, ServiceError> {
        match self
            .tables
            .get::<Product>(PRODUCTS_TABLE, Product::PARTITION, &id.to_string())
            .await
        {
            Ok(versioned) => Ok(Some(versioned.into_record())),
            Err(StorageError::NotFound) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
