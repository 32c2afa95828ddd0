pub mod handlers;
pub mod header;
pub mod overlay;
pub mod preview_area;
pub mod results;
pub mod upload_section;
pub mod utils;
pub mod widgets;
