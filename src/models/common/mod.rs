pub mod pagination;
pub mod response;

pub use pagination::{
    PaginatedResponse, PaginationInfo, PaginationQuery, deserialize_optional_from_str,
};
pub use response::{ApiResponse, FieldErrors};
