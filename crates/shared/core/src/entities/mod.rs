mod execution_report;
mod fill;
mod order;
mod order_status;
mod order_type;
mod side;

pub use execution_report::{
    ExecutionReport, MSG_DUPLICATE_CLIENT_ORDER_ID, MSG_MISSING_LIMIT_PRICE, MSG_ORDER_NOT_FOUND,
};
pub use fill::Fill;
pub use order::{Order, OrderId};
pub use order_status::OrderStatus;
pub use order_type::OrderType;
pub use side::Side;
