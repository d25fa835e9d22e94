//! Dynamic-content completeness analysis.
//!
//! These checks look for pages that arrived intact but whose JavaScript- or
//! AJAX-supplied content never materialised: placeholders still in place,
//! only the first page of a listing, fallback markup, hollow structured data
//! and framework shells.

mod items;
mod lazy;
mod markers;
mod noscript;
mod pagination;
mod rendering;
mod structured;

pub use items::{check_expected_patterns, check_item_count};
pub use lazy::check_lazy_loading;
pub use markers::check_required_markers;
pub use noscript::check_noscript;
pub use pagination::check_pagination;
pub use rendering::{check_content_density, check_embedded_data, check_js_placeholders};
pub use structured::check_structured_data;
