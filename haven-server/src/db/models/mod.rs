//! Database Models

// Serde helpers
pub mod serde_helpers;

// Inventory
pub mod ingredient;

// Menu
pub mod menu_item;

// Orders
pub mod order;

// Reservations
pub mod reservation;

// Auth
pub mod user;

// Re-exports
pub use ingredient::{Ingredient, IngredientCreate, IngredientUpdate};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{
    Order, OrderCreate, OrderItem, OrderNotesUpdate, OrderPaymentUpdate, OrderStatus,
    OrderStatusUpdate, OrderType, PaymentMethod, PaymentStatus,
};
pub use reservation::{
    Reservation, ReservationCreate, ReservationStatus, ReservationStatusUpdate,
};
pub use user::{User, UserRole};
