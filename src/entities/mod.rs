pub mod activity_log;
pub mod customer;
pub mod menu_item;
pub mod order;
pub mod order_item;
pub mod payment;

pub use activity_log::Entity as ActivityLog;
pub use customer::Entity as Customer;
pub use menu_item::Entity as MenuItem;
pub use order::Entity as Order;
pub use order_item::Entity as OrderItem;
pub use payment::Entity as Payment;
