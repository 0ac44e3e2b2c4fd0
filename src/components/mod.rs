pub mod ai_panel;
pub mod alert_feed;
pub mod device_table;
pub mod line_chart;

pub use ai_panel::AiPanel;
pub use alert_feed::AlertFeed;
pub use device_table::DeviceTable;
pub use line_chart::LineChartView;
