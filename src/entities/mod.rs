//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod cart_item;
pub mod inventory_import_record;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_variant;
pub mod purchase_order;
pub mod sale;
pub mod sale_detail;
pub mod supplier;

// Re-export specific types to avoid conflicts
pub use cart_item::{Column as CartItemColumn, Entity as CartItem, Model as CartItemModel};
pub use inventory_import_record::{
    Column as InventoryImportRecordColumn, Entity as InventoryImportRecord,
    Model as InventoryImportRecordModel,
};
pub use order::{Column as OrderColumn, Entity as Order, Model as OrderModel};
pub use order_item::{Column as OrderItemColumn, Entity as OrderItem, Model as OrderItemModel};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_variant::{
    Column as ProductVariantColumn, Entity as ProductVariant, Model as ProductVariantModel,
};
pub use purchase_order::{
    Column as PurchaseOrderColumn, Entity as PurchaseOrder, Model as PurchaseOrderModel,
};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use sale_detail::{Column as SaleDetailColumn, Entity as SaleDetail, Model as SaleDetailModel};
pub use supplier::{Column as SupplierColumn, Entity as Supplier, Model as SupplierModel};
