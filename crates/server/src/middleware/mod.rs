mod auth_layer;
mod request_counter;

pub use auth_layer::require_principal;
pub use request_counter::count_requests;
