pub mod multi_select;
pub mod price_chart;
pub mod saved_list;
pub mod status_banner;
