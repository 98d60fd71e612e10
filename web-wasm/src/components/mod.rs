//! UIコンポーネント

pub mod field_panel;
pub mod header;
pub mod map_view;
pub mod report_list;
pub mod satellite_images;
pub mod search_bar;
pub mod toast;
