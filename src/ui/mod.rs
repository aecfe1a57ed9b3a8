pub mod dialogs;
pub mod filter_bar;
pub mod gantt_chart;
pub mod task_table;
pub mod theme;
pub mod toolbar;
